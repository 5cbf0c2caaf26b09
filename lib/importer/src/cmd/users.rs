use std::collections::BTreeMap;

use catalog::{EntityBuilder, EntityKind, EntityRef, Export, User, DEFAULT_NAMESPACE};
use tracing::{debug, info, warn};

use crate::dedupe::{Deduplicator, ReadStats};
use crate::settings::Settings;
use crate::sources::people::Employee;
use crate::sources::{EmployeeDirectory, TeamDirectory};
use crate::ImporterResult;

pub const USERS_FILE: &str = "users.yaml";

#[derive(Clone, Copy, Debug, Default)]
pub struct UsersOptions {
    /// Builds a catalog for staff: users land in the default namespace and carry their email.
    pub internal: bool,
}

#[derive(Debug)]
pub struct UsersReport {
    pub users: Export,
    pub stats: ReadStats,
}

/// Builds one user per employee with a GitHub handle.
///
/// Group memberships are only filled in when a team directory is given. Errors reading the
/// employee or team directories abort the run.
pub fn invoke(
    employees: &dyn EmployeeDirectory,
    teams: Option<&dyn TeamDirectory>,
    settings: &Settings,
    options: &UsersOptions,
) -> ImporterResult<UsersReport> {
    let memberships = match teams {
        Some(teams) => memberships(teams, &settings.namespace)?,
        None => BTreeMap::new(),
    };

    let namespace = if options.internal {
        DEFAULT_NAMESPACE
    } else {
        settings.namespace.as_str()
    };

    let mut employees = employees.employees()?;
    employees.sort_by_key(|employee| employee.github_handle().map(str::to_lowercase));
    info!("read {} employees", employees.len());

    let mut users = Export::new(settings.output_dir.join(USERS_FILE));
    let mut dedupe = Deduplicator::new();

    for employee in &employees {
        dedupe.record_read();

        let Some(handle) = employee.github_handle() else {
            warn!("employee {} has no GitHub handle", employee.display_name());
            continue;
        };
        let name = handle.to_lowercase();

        if !dedupe.mark_seen(EntityRef::new(EntityKind::User, namespace, &name)) {
            warn!("user {name} already exported, skipping");
            continue;
        }

        let groups = memberships.get(&name).cloned().unwrap_or_default();
        let user = user_from_employee(employee, &name, namespace, groups, options)?;
        users.add_entity(user.to_entity());
        dedupe.record_created();
        debug!("created user {name}");
    }

    Ok(UsersReport {
        users,
        stats: dedupe.stats(),
    })
}

/// Group references per lowercased member login.
fn memberships(
    teams: &dyn TeamDirectory,
    namespace: &str,
) -> ImporterResult<BTreeMap<String, Vec<String>>> {
    let mut memberships: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for team in teams.list_teams()? {
        let group = format!("group:{namespace}/{}", team.slug);
        for login in teams.team_members(&team.slug)? {
            memberships
                .entry(login.to_lowercase())
                .or_default()
                .push(group.clone());
        }
    }

    Ok(memberships)
}

fn user_from_employee(
    employee: &Employee,
    name: &str,
    namespace: &str,
    groups: Vec<String>,
    options: &UsersOptions,
) -> ImporterResult<User> {
    let mut user = User::new(name)?
        .with_namespace(namespace)
        .with_title(employee.display_name())
        .with_description(employee.bio.clone().unwrap_or_default())
        .with_picture_url(employee.picture_url.clone().unwrap_or_default())
        .with_groups(groups);
    if options.internal {
        user = user.with_email(&employee.email);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;
    use tracing_test::traced_test;

    use crate::cmd::users::{invoke, UsersOptions};
    use crate::settings::Settings;
    use crate::sources::snapshot::{EmployeesSnapshot, TeamsSnapshot};
    use crate::sources::TeamDirectory;

    const EMPLOYEES: &str = r#"
employees:
- first_name: Jane
  last_name: Doe
  email: jane@example.com
  github_handle: JDoe
  picture_url: https://example.com/jane.png
  bio: Platform engineer
- first_name: Nobody
  last_name: Known
  email: nobody@example.com
- first_name: Adam
  last_name: Smith
  email: adam@example.com
  github_handle: asmith
- first_name: Jane
  last_name: Again
  email: jane.again@example.com
  github_handle: jdoe
"#;

    const TEAMS: &str = r#"
teams:
- id: 1
  slug: team-atlas
  name: Atlas
  members: [jdoe]
- id: 2
  slug: team-honeybadger
  name: Honey Badger
  members: [JDoe, asmith]
"#;

    fn documents(rendered: &str) -> Vec<serde_yaml::Value> {
        rendered
            .split("---\n")
            .skip(1)
            .map(|doc| serde_yaml::from_str(doc).unwrap())
            .collect()
    }

    #[test_case(false, "giantswarm" ; "customer catalog")]
    #[test_case(true, "default" ; "internal catalog")]
    fn should_place_users_by_audience(internal: bool, namespace: &str) {
        let employees = EmployeesSnapshot::from_yaml(EMPLOYEES).unwrap();
        let report = invoke(
            &employees,
            None,
            &Settings::default(),
            &UsersOptions { internal },
        )
        .unwrap();
        let users = documents(&report.users.render().unwrap());

        assert_eq!(2, users.len());
        let jane = &users[1];
        assert_eq!(jane["metadata"]["name"], "jdoe");
        assert_eq!(jane["spec"]["profile"]["displayName"], "Jane Doe");
        assert_eq!(jane["spec"]["profile"]["picture"], "https://example.com/jane.png");
        assert_eq!(jane["metadata"]["description"], "Platform engineer");
        assert_eq!(
            jane["spec"]["profile"].get("email").is_some(),
            internal
        );
        if internal {
            assert!(jane["metadata"].get("namespace").is_none());
        } else {
            assert_eq!(jane["metadata"]["namespace"], namespace);
        }
    }

    #[traced_test]
    #[test]
    fn should_skip_employees_without_handle() {
        let employees = EmployeesSnapshot::from_yaml(EMPLOYEES).unwrap();
        let report = invoke(&employees, None, &Settings::default(), &UsersOptions::default())
            .unwrap();

        assert!(logs_contain("employee Nobody Known has no GitHub handle"));
        assert!(logs_contain("user jdoe already exported"));
        assert_eq!(4, report.stats.read);
        assert_eq!(2, report.stats.unique);
        assert_eq!(2, report.stats.created);
    }

    #[test]
    fn should_list_team_memberships() {
        let employees = EmployeesSnapshot::from_yaml(EMPLOYEES).unwrap();
        let teams = TeamsSnapshot::from_yaml(TEAMS).unwrap();
        let report = invoke(
            &employees,
            Some(&teams as &dyn TeamDirectory),
            &Settings::default(),
            &UsersOptions::default(),
        )
        .unwrap();
        let users = documents(&report.users.render().unwrap());

        assert_eq!(users[0]["metadata"]["name"], "asmith");
        assert_eq!(users[0]["spec"]["memberOf"][0], "group:giantswarm/team-honeybadger");
        assert_eq!(users[1]["spec"]["memberOf"][0], "group:giantswarm/team-atlas");
        assert_eq!(users[1]["spec"]["memberOf"][1], "group:giantswarm/team-honeybadger");
    }
}
