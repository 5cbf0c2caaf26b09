use thiserror::Error;

pub mod cmd;
pub mod dedupe;
pub mod fields;
pub mod github;
pub mod record;
pub mod settings;
pub mod sources;
pub mod stats;

#[remain::sorted]
#[derive(Debug, Error)]
pub enum ImporterError {
    #[error(transparent)]
    CatalogError(#[from] catalog::CatalogError),

    #[error("invalid CRD: {0}")]
    InvalidCrd(String),

    #[error("CRD config item {index}: {reason}")]
    InvalidCrdConfig { index: usize, reason: String },

    #[error("invalid GitHub URL `{0}`: {1}")]
    InvalidGithubUrl(String, String),

    #[error("unable to parse timestamp `{0}`: {1}")]
    InvalidTimestamp(String, chrono::ParseError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not detect GitHub slug for `{0}`")]
    MissingSlug(String),

    #[error(transparent)]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("team `{0}` not found")]
    TeamNotFound(String),

    #[error("toml: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("{0}")]
    Upstream(String),
}

pub type ImporterResult<T> = Result<T, ImporterError>;
