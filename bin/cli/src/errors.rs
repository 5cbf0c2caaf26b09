use thiserror::Error;

#[remain::sorted]
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    CatalogError(#[from] catalog::CatalogError),

    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error(transparent)]
    ImporterError(#[from] importer::ImporterError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
