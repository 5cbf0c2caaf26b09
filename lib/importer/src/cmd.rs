//! Import pipelines, one per command: each reads from its collaborators and returns the
//! populated exports without writing them.

use std::path::PathBuf;

use catalog::{EntityBuilder, Export, Group};
use tracing::error;

use crate::sources::people::Team;
use crate::sources::TeamDirectory;
use crate::ImporterResult;

pub mod appcatalogs;
pub mod charts;
pub mod crds;
pub mod installations;
pub mod repositories;
pub mod users;

/// Builds a group for every team slug found in the directory. Unknown slugs are logged and
/// skipped, other directory errors abort.
pub(crate) fn team_groups(
    slugs: &[String],
    teams: &dyn TeamDirectory,
    namespace: &str,
    target_path: PathBuf,
) -> ImporterResult<Export> {
    let mut groups = Export::new(target_path);
    let all_teams = teams.list_teams()?;

    for slug in slugs {
        let Some(team) = teams.find_team(slug)? else {
            error!("team {slug} not found");
            continue;
        };

        let members = teams.team_members(&team.slug)?;
        let children = all_teams
            .iter()
            .filter(|child| child.parent.as_deref() == Some(team.slug.as_str()))
            .map(|child| child.slug.clone());
        let group = group_from_team(&team, members, namespace)?.with_children(children);
        groups.add_entity(group.to_entity());
    }

    Ok(groups)
}

fn group_from_team(
    team: &Team,
    members: Vec<String>,
    namespace: &str,
) -> ImporterResult<Group> {
    Ok(Group::new(&team.slug)?
        .with_namespace(namespace)
        .with_title(&team.name)
        .with_description(team.description.clone().unwrap_or_default())
        .with_email(team.email.clone().unwrap_or_default())
        .with_picture_url(team.avatar_url())
        .with_grafana_dashboard_selector(
            team.grafana_dashboard_selector.clone().unwrap_or_default(),
        )
        .with_parent(team.parent.clone().unwrap_or_default())
        .with_members(members))
}
