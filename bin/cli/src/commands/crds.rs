use clap::Parser;
use importer::cmd::crds;
use importer::settings::Settings;
use importer::sources::crd::load_config;

use crate::commands::write_export;
use crate::errors::CliResult;
use crate::fetch::{http_client, load_location, HttpContentSource};

/// Export CRDs as API entities
///
/// The config is a YAML list of items with `url` (GitHub URL of the CRD file), `owner`, and the
/// optional `lifecycle` and `system`.
#[derive(Parser, Debug)]
#[command()]
pub(crate) struct CrdsCommand {
    /// Config file, or `-` to read it from standard input
    #[arg(value_name = "CONFIG")]
    pub location: String,

    /// Namespace of the API entities
    #[arg(long, short)]
    pub namespace: Option<String>,
}

pub(crate) fn execute(cmd: CrdsCommand, mut settings: Settings) -> CliResult<Option<String>> {
    if let Some(namespace) = cmd.namespace {
        settings.namespace = namespace;
    }

    let client = http_client()?;
    let items = load_config(&load_location(&client, &cmd.location)?)?;
    let report = crds::invoke(&items, &HttpContentSource::new(client), &settings);

    Ok(Some(format!(
        "{}\n{}",
        report.stats,
        write_export(&report.apis, "API entities")?
    )))
}
