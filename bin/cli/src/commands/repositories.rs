use std::fs;
use std::path::PathBuf;

use clap::Parser;
use importer::cmd::repositories;
use importer::settings::Settings;
use importer::sources::snapshot::{RepositoriesSnapshot, TeamsSnapshot};

use crate::commands::write_export;
use crate::errors::CliResult;
use crate::fetch::{http_client, load_location};

/// Export the repositories teams maintain as components, and the teams as groups
///
/// The inventory is a YAML document with `lists` (repository lists keyed by owning team slug)
/// and `repositories` (GitHub details keyed by repository name).
#[derive(Parser, Debug)]
#[command()]
pub(crate) struct RepositoriesCommand {
    /// Inventory URL or file, or `-` to read it from standard input
    #[arg(value_name = "INVENTORY")]
    pub location: String,

    /// YAML file with the organization's teams and their members
    #[arg(long)]
    pub teams: Option<PathBuf>,
}

pub(crate) fn execute(cmd: RepositoriesCommand, settings: Settings) -> CliResult<Option<String>> {
    let client = http_client()?;
    let inventory = RepositoriesSnapshot::from_yaml(&load_location(&client, &cmd.location)?)?;
    let teams = match &cmd.teams {
        Some(path) => TeamsSnapshot::from_yaml(&fs::read_to_string(path)?)?,
        None => TeamsSnapshot::default(),
    };

    let report = repositories::invoke(&inventory, &teams, &settings)?;

    Ok(Some(format!(
        "{}\n{}\n{}",
        report.stats,
        write_export(&report.components, "components")?,
        write_export(&report.groups, "groups")?
    )))
}
