use std::fs;
use std::path::PathBuf;

use clap::Parser;
use importer::cmd::appcatalogs;
use importer::settings::Settings;
use importer::sources::helm_index::Index;
use importer::sources::snapshot::{StaticRepositories, TeamsSnapshot};
use tracing::info;

use crate::commands::write_export;
use crate::errors::CliResult;
use crate::fetch::{http_client, load_location};

/// Export apps of the app catalogs as components, and their owning teams as groups
#[derive(Parser, Debug)]
#[command()]
pub(crate) struct AppCatalogsCommand {
    /// Catalog index URL or file. Repeat to read several, first wins. Defaults to the configured
    /// catalogs
    #[arg(long)]
    pub index: Vec<String>,

    /// YAML file with the default branch per repository
    #[arg(long)]
    pub repositories: Option<PathBuf>,

    /// YAML file with the organization's teams and their members
    #[arg(long)]
    pub teams: Option<PathBuf>,
}

pub(crate) fn execute(cmd: AppCatalogsCommand, settings: Settings) -> CliResult<Option<String>> {
    let client = http_client()?;
    let locations = if cmd.index.is_empty() {
        settings.catalog_urls.clone()
    } else {
        cmd.index
    };

    let mut indexes = Vec::with_capacity(locations.len());
    for location in &locations {
        info!("reading catalog {location}");
        indexes.push(Index::from_yaml(&load_location(&client, location)?)?);
    }

    let repositories = match &cmd.repositories {
        Some(path) => StaticRepositories::from_yaml(&fs::read_to_string(path)?)?,
        None => StaticRepositories::default(),
    };
    let teams = match &cmd.teams {
        Some(path) => TeamsSnapshot::from_yaml(&fs::read_to_string(path)?)?,
        None => TeamsSnapshot::default(),
    };

    let report = appcatalogs::invoke(&indexes, &repositories, &teams, &settings)?;

    Ok(Some(format!(
        "{}\n{}\n{}",
        report.stats,
        write_export(&report.components, "components")?,
        write_export(&report.groups, "groups")?
    )))
}
