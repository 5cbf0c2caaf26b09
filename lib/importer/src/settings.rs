use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ImporterResult;

pub const DEFAULT_CONFIG_NAME: &str = "catalog-importer.toml";

pub const CATALOG_IMPORTER_ENV_CONFIG_PATH: &str = "CATALOG_IMPORTER_CONFIG_PATH";

pub const DEFAULT_CATALOG_URLS: [&str; 6] = [
    "https://giantswarm.github.io/cluster-catalog/index.yaml",
    "https://giantswarm.github.io/control-plane-catalog/index.yaml",
    "https://giantswarm.github.io/default-catalog/index.yaml",
    "https://giantswarm.github.io/giantswarm-azure-catalog/index.yaml",
    "https://giantswarm.github.io/giantswarm-catalog/index.yaml",
    "https://giantswarm.github.io/giantswarm-playground-catalog/index.yaml",
];

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    /// GitHub organization owning repositories, teams and users.
    pub github_organization: String,

    /// Namespace of the exported entities.
    pub namespace: String,

    /// App catalogs to scan, in priority order.
    pub catalog_urls: Vec<String>,

    pub chart_component_type: String,

    /// Used when a repository's default branch is not known.
    pub default_branch: String,

    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_organization: "giantswarm".to_string(),
            namespace: "giantswarm".to_string(),
            catalog_urls: DEFAULT_CATALOG_URLS.iter().map(|u| u.to_string()).collect(),
            chart_component_type: "service".to_string(),
            default_branch: "main".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> ImporterResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> ImporterResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Loads settings from the first of: the explicit path, the path in
    /// `CATALOG_IMPORTER_CONFIG_PATH`, `catalog-importer.toml` in the working directory.
    /// Falls back to defaults when none is given.
    pub fn discover(explicit: Option<&Path>) -> ImporterResult<Self> {
        if let Some(path) = explicit {
            debug!("loading settings from {}", path.to_string_lossy());
            return Self::from_path(path);
        }

        if let Ok(path) = env::var(CATALOG_IMPORTER_ENV_CONFIG_PATH) {
            debug!("loading settings from {CATALOG_IMPORTER_ENV_CONFIG_PATH}={path}");
            return Self::from_path(Path::new(&path));
        }

        let local = Path::new(DEFAULT_CONFIG_NAME);
        if local.is_file() {
            debug!("loading settings from {DEFAULT_CONFIG_NAME}");
            return Self::from_path(local);
        }

        debug!("no settings file found, using defaults");
        Ok(Self::default())
    }
}
