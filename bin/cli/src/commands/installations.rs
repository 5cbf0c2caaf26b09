use clap::Parser;
use importer::cmd::installations;
use importer::settings::Settings;
use importer::sources::snapshot::InstallationsSnapshot;

use crate::commands::write_export;
use crate::errors::CliResult;
use crate::fetch::{http_client, load_location};

/// Export installations as resources for internal use
///
/// The file holds `installations`, a list of installation records as found in each
/// installation's `cluster.yaml`.
#[derive(Parser, Debug)]
#[command()]
pub(crate) struct InstallationsCommand {
    /// Installations URL or file, or `-` to read it from standard input
    #[arg(value_name = "INSTALLATIONS")]
    pub location: String,
}

pub(crate) fn execute(cmd: InstallationsCommand, settings: Settings) -> CliResult<Option<String>> {
    let client = http_client()?;
    let snapshot = InstallationsSnapshot::from_yaml(&load_location(&client, &cmd.location)?)?;
    let report = installations::invoke(&snapshot, &settings)?;

    Ok(Some(format!(
        "{}\n{}",
        report.stats,
        write_export(&report.resources, "installations")?
    )))
}
