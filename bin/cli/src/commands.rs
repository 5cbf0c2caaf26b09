use std::path::PathBuf;

use clap::{Parser, Subcommand};
use importer::settings::Settings;

use crate::commands::appcatalogs::AppCatalogsCommand;
use crate::commands::charts::ChartsCommand;
use crate::commands::crds::CrdsCommand;
use crate::commands::installations::InstallationsCommand;
use crate::commands::repositories::RepositoriesCommand;
use crate::commands::users::UsersCommand;
use crate::errors::CliResult;

pub mod appcatalogs;
pub mod charts;
pub mod crds;
pub mod installations;
pub mod repositories;
pub mod users;

#[derive(Debug, Parser)]
#[command(name = "catalog-importer")]
pub struct Opt {
    #[arg(
        long,
        help = "Prints a verbose output during the program execution",
        global = true
    )]
    pub debug: bool,

    #[arg(
        long,
        help = "Settings file. Defaults to $CATALOG_IMPORTER_CONFIG_PATH or ./catalog-importer.toml",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// Directory the catalog files are written to
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[remain::sorted]
#[derive(Debug, Subcommand)]
pub enum Command {
    Appcatalogs(AppCatalogsCommand),
    Charts(ChartsCommand),
    Crds(CrdsCommand),
    Installations(InstallationsCommand),
    Repositories(RepositoriesCommand),
    Users(UsersCommand),
}

/// Loads the settings and applies the global flags on top.
pub(crate) fn settings(opt: &Opt) -> CliResult<Settings> {
    let mut settings = Settings::discover(opt.config.as_deref())?;
    if let Some(output) = &opt.output {
        settings.output_dir = output.clone();
    }

    Ok(settings)
}

/// Writes the export and describes it in one line.
pub(crate) fn write_export(export: &catalog::Export, noun: &str) -> CliResult<String> {
    export.write_file()?;
    Ok(format!(
        "{} {noun} written to file {} with size {} bytes",
        export.entity_count(),
        export.target_path().to_string_lossy(),
        export.byte_len()?
    ))
}
