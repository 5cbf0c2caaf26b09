use std::collections::BTreeSet;

use catalog::{Component, EntityBuilder, EntityKind, EntityRef, Export, UNSPECIFIED};
use tag_resolver::latest_by;
use tracing::{debug, info, warn};

use crate::cmd::team_groups;
use crate::dedupe::{Deduplicator, ReadStats};
use crate::fields::{deployment_names, parse_created, resolve_owner, SlugMatcher};
use crate::settings::Settings;
use crate::sources::helm_index::{Entry, Index};
use crate::sources::{RepositoryDirectory, TeamDirectory};
use crate::{ImporterError, ImporterResult};

pub const COMPONENTS_FILE: &str = "components.yaml";

pub const GROUPS_FILE: &str = "groups.yaml";

const APP_COMPONENT_TYPE: &str = "service";

#[derive(Debug)]
pub struct AppCatalogsReport {
    pub components: Export,
    pub groups: Export,
    pub stats: ReadStats,
    /// Team slugs owning at least one app, sorted.
    pub team_slugs: Vec<String>,
}

/// Builds one component per unique app across the given catalogs, plus a group for every team
/// owning one of them.
///
/// Catalogs are scanned in the given order and the first catalog listing an app wins. Apps that
/// cannot be turned into a component are logged and skipped. Team lookups that fail for other
/// reasons than a missing team abort the run.
pub fn invoke(
    indexes: &[Index],
    repositories: &dyn RepositoryDirectory,
    teams: &dyn TeamDirectory,
    settings: &Settings,
) -> ImporterResult<AppCatalogsReport> {
    let matcher = SlugMatcher::github(&settings.github_organization);
    let mut components = Export::new(settings.output_dir.join(COMPONENTS_FILE));
    let mut dedupe = Deduplicator::new();
    let mut owners = BTreeSet::new();

    for index in indexes {
        info!("reading catalog generated at {}", index.generated);

        for (app_name, entries) in &index.entries {
            dedupe.record_read();
            let entity_ref =
                EntityRef::new(EntityKind::Component, &settings.namespace, app_name);
            if dedupe.seen(&entity_ref) {
                debug!("app {app_name} already seen, skipping");
                continue;
            }

            let Some(entry) = latest_by(entries, |entry| entry.version.as_str()) else {
                warn!("app {app_name} has no releases");
                continue;
            };
            dedupe.mark_seen(entity_ref);

            match component_from_entry(entry, &matcher, repositories, settings) {
                Ok(component) => {
                    owners.insert(component.owner());
                    components.add_entity(component.to_entity());
                    dedupe.record_created();
                }
                Err(e) => warn!("could not create component entity for {app_name}: {e}"),
            }
        }
    }

    let stats = dedupe.stats();
    info!("collected {} unique apps in {} entries", stats.unique, stats.read);

    let team_slugs = team_slugs(&owners, &settings.namespace);
    info!("collected {} unique team slugs", team_slugs.len());

    let groups = team_groups(
        &team_slugs,
        teams,
        &settings.namespace,
        settings.output_dir.join(GROUPS_FILE),
    )?;

    Ok(AppCatalogsReport {
        components,
        groups,
        stats,
        team_slugs,
    })
}

fn component_from_entry(
    entry: &Entry,
    matcher: &SlugMatcher,
    repositories: &dyn RepositoryDirectory,
    settings: &Settings,
) -> ImporterResult<Component> {
    let record = entry.to_record();
    let namespace = &settings.namespace;

    let owner = resolve_owner(record.annotations(), namespace);
    let release_time = record.created.as_deref().map(parse_created).transpose()?;
    let slug = matcher
        .detect(&record)
        .ok_or_else(|| ImporterError::MissingSlug(record.name.clone()))?;
    let default_branch = repositories.default_branch(&slug.repository)?;

    let mut component = Component::new(&record.name)?
        .with_namespace(namespace)
        .with_title(&record.name)
        .with_description(&entry.description)
        .with_github_project_slug(slug.to_string())
        .with_latest_release_tag(&entry.version)
        .with_latest_release_time(release_time)
        .with_owner(owner)
        .with_deployment_names(deployment_names(&record.name, &[]))
        .with_type(APP_COMPONENT_TYPE)
        // every app repository is expected to have a README
        .with_readme(true)
        .with_default_branch(
            default_branch.unwrap_or_else(|| settings.default_branch.clone()),
        );
    for keyword in &entry.keywords {
        component.add_tag(keyword);
    }

    Ok(component)
}

/// Team slugs from owner references in `namespace`, without the unspecified placeholder.
fn team_slugs(owners: &BTreeSet<String>, namespace: &str) -> Vec<String> {
    let prefix = format!("group:{namespace}/");
    owners
        .iter()
        .filter_map(|owner| owner.strip_prefix(&prefix))
        .filter(|slug| !slug.is_empty() && *slug != UNSPECIFIED)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::cmd::appcatalogs::invoke;
    use crate::settings::Settings;
    use crate::sources::helm_index::Index;
    use crate::sources::snapshot::{StaticRepositories, TeamsSnapshot};

    const CATALOG_A: &str = r#"
apiVersion: v1
entries:
  foo:
  - name: foo
    version: 1.0.0
    created: "2023-01-01T00:00:00Z"
    description: Foo from catalog A
    home: https://github.com/giantswarm/foo
    annotations:
      application.giantswarm.io/team: honeybadger
  - name: foo
    version: 1.10.0
    created: "2023-02-01T00:00:00Z"
    description: Foo from catalog A
    home: https://github.com/giantswarm/foo
    keywords: [Kubernetes, app_platform]
    annotations:
      io.giantswarm.application.team: team-atlas
      application.giantswarm.io/team: honeybadger
  broken:
  - name: broken
    version: 0.1.0
    created: "2023-01-01T00:00:00Z"
    home: https://example.com/broken
generated: "2023-03-01T00:00:00Z"
"#;

    const CATALOG_B: &str = r#"
apiVersion: v1
entries:
  foo:
  - name: foo
    version: 9.9.9
    created: "2023-05-01T00:00:00Z"
    description: Foo from catalog B
    home: https://github.com/giantswarm/foo
  bar:
  - name: bar
    version: 2.0.0
    created: not-a-date
    home: https://github.com/giantswarm/bar
  baz:
  - name: baz
    version: 0.2.0
    created: ""
    sources: [https://github.com/giantswarm/baz-app/]
    annotations:
      application.giantswarm.io/team: ghost
  empty: []
generated: "2023-03-01T00:00:00Z"
"#;

    const TEAMS: &str = r#"
teams:
- id: 1
  slug: team-atlas
  name: Atlas
  members: [zoe, adam]
"#;

    fn run() -> crate::cmd::appcatalogs::AppCatalogsReport {
        let indexes = vec![
            Index::from_yaml(CATALOG_A).unwrap(),
            Index::from_yaml(CATALOG_B).unwrap(),
        ];
        let repositories =
            StaticRepositories::from_yaml("default_branches:\n  baz-app: master\n").unwrap();
        let teams = TeamsSnapshot::from_yaml(TEAMS).unwrap();
        invoke(&indexes, &repositories, &teams, &Settings::default()).unwrap()
    }

    fn documents(rendered: &str) -> Vec<serde_yaml::Value> {
        rendered
            .split("---\n")
            .skip(1)
            .map(|doc| serde_yaml::from_str(doc).unwrap())
            .collect()
    }

    #[traced_test]
    #[test]
    fn first_catalog_should_win() {
        let report = run();
        let components = documents(&report.components.render().unwrap());

        let foo: Vec<&serde_yaml::Value> = components
            .iter()
            .filter(|doc| doc["metadata"]["name"] == "foo")
            .collect();
        assert_eq!(1, foo.len());
        assert_eq!(foo[0]["metadata"]["description"], "Foo from catalog A");
        assert_eq!(
            foo[0]["metadata"]["annotations"]["giantswarm.io/latest-release-tag"],
            "1.10.0"
        );
        assert_eq!(
            foo[0]["metadata"]["annotations"]["giantswarm.io/latest-release-date"],
            "2023-02-01T00:00:00Z"
        );
        assert_eq!(foo[0]["spec"]["owner"], "group:giantswarm/team-atlas");
        // sorted before normalization
        assert_eq!(foo[0]["metadata"]["tags"][0], "kubernetes");
        assert_eq!(foo[0]["metadata"]["tags"][1], "app-platform");
        assert_eq!(
            foo[0]["metadata"]["annotations"]["backstage.io/techdocs-ref"],
            "url:https://github.com/giantswarm/foo/tree/main"
        );
        assert_eq!(
            foo[0]["metadata"]["annotations"]["giantswarm.io/deployment-names"],
            "foo,foo-app"
        );
    }

    #[traced_test]
    #[test]
    fn record_failures_should_be_skipped() {
        let report = run();
        let names: Vec<String> = documents(&report.components.render().unwrap())
            .iter()
            .map(|doc| doc["metadata"]["name"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(vec!["baz", "foo"], names);
        assert!(logs_contain("could not create component entity for broken"));
        assert!(logs_contain("could not create component entity for bar"));
        assert!(logs_contain("app empty has no releases"));

        assert_eq!(6, report.stats.read);
        assert_eq!(4, report.stats.unique);
        assert_eq!(2, report.stats.created);
    }

    #[traced_test]
    #[test]
    fn missing_teams_should_be_skipped() {
        let report = run();
        assert_eq!(vec!["team-atlas", "team-ghost"], report.team_slugs);
        assert!(logs_contain("team team-ghost not found"));

        let groups = documents(&report.groups.render().unwrap());
        assert_eq!(1, groups.len());
        assert_eq!(groups[0]["metadata"]["name"], "team-atlas");
        assert_eq!(groups[0]["metadata"]["namespace"], "giantswarm");
        assert_eq!(groups[0]["spec"]["profile"]["displayName"], "Atlas");
        assert_eq!(
            groups[0]["spec"]["profile"]["picture"],
            "https://avatars.githubusercontent.com/t/1?s=116&v=4"
        );
        assert_eq!(groups[0]["spec"]["members"][0], "adam");
    }

    #[traced_test]
    #[test]
    fn release_date_should_be_absent_without_created() {
        let report = run();
        let components = documents(&report.components.render().unwrap());
        let baz = components
            .iter()
            .find(|doc| doc["metadata"]["name"] == "baz")
            .unwrap();

        assert!(baz["metadata"]["annotations"]
            .get("giantswarm.io/latest-release-date")
            .is_none());
        assert_eq!(
            baz["metadata"]["annotations"]["github.com/project-slug"],
            "giantswarm/baz-app"
        );
        assert_eq!(
            baz["metadata"]["annotations"]["backstage.io/techdocs-ref"],
            "url:https://github.com/giantswarm/baz-app/tree/master"
        );
        assert_eq!(baz["spec"]["owner"], "group:giantswarm/team-ghost");
    }
}
