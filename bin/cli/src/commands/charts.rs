use std::fs;
use std::path::PathBuf;

use clap::Parser;
use importer::cmd::charts::{self, ChartsOptions};
use importer::settings::Settings;
use importer::sources::snapshot::RegistrySnapshot;
use tracing::warn;

use crate::commands::write_export;
use crate::errors::CliResult;

/// Export Helm charts of an OCI registry as components
///
/// Only charts whose audience annotation is `all` are exported.
#[derive(Parser, Debug)]
#[command()]
pub(crate) struct ChartsCommand {
    /// OCI registry host name, e.g. gsoci.azurecr.io
    pub registry: String,

    /// YAML export of the registry's repositories, tags and manifests
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Only read repositories starting with this prefix
    #[arg(long, short, default_value = "")]
    pub prefix: String,

    /// Namespace of the components
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Component type
    #[arg(long = "type", short)]
    pub component_type: Option<String>,

    /// Stop after this many repositories
    #[arg(long, short)]
    pub limit: Option<usize>,
}

pub(crate) fn execute(cmd: ChartsCommand, mut settings: Settings) -> CliResult<Option<String>> {
    if let Some(namespace) = cmd.namespace {
        settings.namespace = namespace;
    }
    if let Some(component_type) = cmd.component_type {
        settings.chart_component_type = component_type;
    }

    let mut registry = RegistrySnapshot::from_yaml(&fs::read_to_string(&cmd.snapshot)?)?;
    if registry.hostname.is_empty() {
        registry.hostname = cmd.registry;
    } else if registry.hostname != cmd.registry {
        warn!(
            "snapshot was taken from {}, not {}",
            registry.hostname, cmd.registry
        );
    }

    let options = ChartsOptions {
        prefix: cmd.prefix,
        limit: cmd.limit.filter(|limit| *limit > 0),
    };
    let report = charts::invoke(&registry, &settings, &options)?;

    Ok(Some(format!(
        "{}\n{}\n\n{}",
        report.read,
        write_export(&report.components, "components")?,
        report.stats.report()
    )))
}
