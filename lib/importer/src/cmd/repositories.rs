use std::collections::BTreeSet;

use catalog::annotations::{HELMCHARTS, HELMCHART_APP_VERSIONS, HELMCHART_VERSIONS};
use catalog::{Component, EntityBuilder, EntityKind, EntityLink, EntityRef, Export};
use tracing::{debug, info, warn};

use crate::cmd::charts::HELMCHART_TAG;
use crate::cmd::team_groups;
use crate::dedupe::{Deduplicator, ReadStats};
use crate::fields::{deployment_names, format_team_owner, parse_created};
use crate::github::RepoSlug;
use crate::settings::Settings;
use crate::sources::repositories::{ChartMetadata, RepositoryDetails, RepositoryEntry};
use crate::sources::{RepositoryInventory, TeamDirectory};
use crate::ImporterResult;

pub const COMPONENTS_FILE: &str = "repositories.yaml";

pub const GROUPS_FILE: &str = "teams.yaml";

const LANGUAGE_LABEL: &str = "giantswarm.io/language";

const SERVICE_TYPE: &str = "service";

const SERVICE_DASHBOARD_URL: &str = "https://giantswarm.grafana.net/d/eb617ba1-209a-4d57-9963-1af9a8ddc8d4/general-service-metrics";

#[derive(Debug)]
pub struct RepositoriesReport {
    pub components: Export,
    pub groups: Export,
    pub stats: ReadStats,
    /// Slugs of the teams owning at least one component, sorted.
    pub team_slugs: Vec<String>,
}

/// Builds one component per listed repository and a group for every team owning one.
///
/// Lists are processed in team order. A repository listed by two teams belongs to the first.
/// Repositories GitHub does not know are still exported, without GitHub facts.
pub fn invoke(
    inventory: &dyn RepositoryInventory,
    teams: &dyn TeamDirectory,
    settings: &Settings,
) -> ImporterResult<RepositoriesReport> {
    let mut lists = inventory.lists()?;
    lists.sort_by(|a, b| a.owner_team.cmp(&b.owner_team));

    let mut components = Export::new(settings.output_dir.join(COMPONENTS_FILE));
    let mut dedupe = Deduplicator::new();
    let mut owners = BTreeSet::new();

    for list in &lists {
        info!(
            "processing {} repositories of team {}",
            list.repositories.len(),
            list.owner_team
        );

        for entry in &list.repositories {
            let entity_ref =
                EntityRef::new(EntityKind::Component, &settings.namespace, &entry.name);
            if !dedupe.check_and_mark(entity_ref) {
                warn!("repository {} is listed more than once, skipping", entry.name);
                continue;
            }

            let details = inventory.details(&entry.name)?.unwrap_or_else(|| {
                warn!(
                    "repository {} not found in organization {}",
                    entry.name, settings.github_organization
                );
                RepositoryDetails::default()
            });

            match component_from_repository(entry, &list.owner_team, &details, settings) {
                Ok(component) => {
                    components.add_entity(component.to_entity());
                    owners.insert(list.owner_team.clone());
                    dedupe.record_created();
                    debug!("created component {}", entry.name);
                }
                Err(e) => warn!("could not create component entity for {}: {e}", entry.name),
            }
        }
    }

    let stats = dedupe.stats();
    let team_slugs: Vec<String> = owners.into_iter().collect();
    let groups = team_groups(
        &team_slugs,
        teams,
        &settings.namespace,
        settings.output_dir.join(GROUPS_FILE),
    )?;

    Ok(RepositoriesReport {
        components,
        groups,
        stats,
        team_slugs,
    })
}

fn component_from_repository(
    entry: &RepositoryEntry,
    team: &str,
    details: &RepositoryDetails,
    settings: &Settings,
) -> ImporterResult<Component> {
    let namespace = &settings.namespace;
    let slug = RepoSlug::new(&settings.github_organization, &entry.name);
    let names = deployment_names(&entry.name, &entry.deployment_names);

    let release = details.latest_release();
    let release_time = release
        .and_then(|release| release.created.as_deref())
        .filter(|created| !created.is_empty())
        .map(parse_created)
        .transpose()?;
    let default_branch = if details.default_branch.is_empty() {
        settings.default_branch.clone()
    } else {
        details.default_branch.clone()
    };

    let mut component = Component::new(&entry.name)?
        .with_namespace(namespace)
        .with_description(&details.description)
        .with_type(&entry.component_type)
        .with_lifecycle(&entry.lifecycle)
        .with_owner(format_team_owner(team, namespace))
        .with_system(&entry.system)
        .with_depends_on(details.dependencies(&settings.github_organization, &entry.name))
        .with_github_project_slug(slug.to_string())
        .with_github_team_slug(team)
        .with_readme(details.has_readme)
        .with_default_branch(&default_branch)
        .with_latest_release_tag(release.map(|release| release.tag.as_str()).unwrap_or_default())
        .with_latest_release_time(release_time)
        .with_deployment_names(names.clone())
        .with_kubernetes_id(&entry.kubernetes_id);
    if details.has_circleci {
        component = component.with_circleci_slug(format!("github/{slug}"));
    }

    if let Some(language) = entry.gen.language() {
        component.set_label(LANGUAGE_LABEL, language);
        component.add_tag(format!("language:{language}"));
    }
    for flavor in &entry.gen.flavors {
        component.set_label(format!("giantswarm.io/flavor-{flavor}"), "true");
        component.add_tag(format!("flavor:{flavor}"));
    }
    if details.private {
        component.add_tag("private");
    }
    if default_branch == "master" {
        component.add_tag("defaultbranch:master");
    }
    if release.is_none() {
        component.add_tag("no-releases");
    }

    if !details.helm_charts.is_empty() {
        let charts = &details.helm_charts;
        component.add_tag(HELMCHART_TAG);
        component.set_annotation(HELMCHARTS, join_charts(charts, |chart| chart.name.as_str()));
        component.set_annotation(
            HELMCHART_VERSIONS,
            join_charts(charts, |chart| chart.version.as_str()),
        );
        component.set_annotation(
            HELMCHART_APP_VERSIONS,
            join_charts(charts, |chart| chart.app_version.as_str()),
        );
    }

    if entry.component_type == SERVICE_TYPE {
        component.add_link(service_dashboard_link(&names));
    }

    Ok(component)
}

fn join_charts(charts: &[ChartMetadata], field: impl Fn(&ChartMetadata) -> &str) -> String {
    charts.iter().map(field).collect::<Vec<&str>>().join(",")
}

fn service_dashboard_link(deployment_names: &[String]) -> EntityLink {
    let apps: Vec<String> = deployment_names
        .iter()
        .map(|name| format!("var-app={name}"))
        .collect();

    EntityLink::new(format!(
        "{SERVICE_DASHBOARD_URL}?orgId=1&{}&from=now-24h&to=now",
        apps.join("&")
    ))
    .with_title("General service metrics dashboard")
    .with_icon("dashboard")
    .with_type("grafana-dashboard")
}
