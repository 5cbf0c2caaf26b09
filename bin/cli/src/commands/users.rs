use std::fs;
use std::path::PathBuf;

use clap::Parser;
use importer::cmd::users::{self, UsersOptions};
use importer::settings::Settings;
use importer::sources::snapshot::{EmployeesSnapshot, TeamsSnapshot};
use importer::sources::TeamDirectory;

use crate::commands::write_export;
use crate::errors::CliResult;

/// Export employees as users, either for customer catalogs or for internal use
#[derive(Parser, Debug)]
#[command()]
pub(crate) struct UsersCommand {
    /// YAML export of the employee directory
    #[arg(long)]
    pub employees: PathBuf,

    /// YAML file with the organization's teams and their members, used for group memberships
    #[arg(long)]
    pub teams: Option<PathBuf>,

    /// Create an internal catalog, which includes email addresses
    #[arg(long, short)]
    pub internal: bool,
}

pub(crate) fn execute(cmd: UsersCommand, settings: Settings) -> CliResult<Option<String>> {
    let employees = EmployeesSnapshot::from_yaml(&fs::read_to_string(&cmd.employees)?)?;
    let teams = match &cmd.teams {
        Some(path) => Some(TeamsSnapshot::from_yaml(&fs::read_to_string(path)?)?),
        None => None,
    };

    let report = users::invoke(
        &employees,
        teams.as_ref().map(|teams| teams as &dyn TeamDirectory),
        &settings,
        &UsersOptions {
            internal: cmd.internal,
        },
    )?;

    Ok(Some(format!(
        "{}\n{}",
        report.stats,
        write_export(&report.users, "users")?
    )))
}
