//! File-backed collaborators, loaded from YAML exports of the upstream systems.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::sources::installations::Installation;
use crate::sources::oci::ManifestInfo;
use crate::sources::people::{Employee, Team};
use crate::sources::repositories::{RepositoryDetails, RepositoryEntry, RepositoryList};
use crate::sources::{
    ChartRegistry, EmployeeDirectory, InstallationDirectory, RepositoryDirectory,
    RepositoryInventory, TeamDirectory,
};
use crate::{ImporterError, ImporterResult};

/// Contents of an OCI registry: tags and manifests per repository.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub repositories: BTreeMap<String, RepositorySnapshot>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepositorySnapshot {
    pub tags: Vec<String>,
    /// Manifests by tag.
    pub manifests: BTreeMap<String, ManifestInfo>,
}

impl RegistrySnapshot {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn repository(&self, repository: &str) -> ImporterResult<&RepositorySnapshot> {
        self.repositories.get(repository).ok_or_else(|| {
            ImporterError::Upstream(format!(
                "repository {repository} not found in {}",
                self.hostname
            ))
        })
    }
}

impl ChartRegistry for RegistrySnapshot {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn list_repositories(&self, prefix: &str) -> ImporterResult<Vec<String>> {
        Ok(self
            .repositories
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn list_tags(&self, repository: &str) -> ImporterResult<Vec<String>> {
        Ok(self.repository(repository)?.tags.clone())
    }

    fn fetch_manifest(&self, repository: &str, tag: &str) -> ImporterResult<ManifestInfo> {
        self.repository(repository)?
            .manifests
            .get(tag)
            .cloned()
            .ok_or_else(|| ImporterError::Upstream(format!("no manifest for {repository}:{tag}")))
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TeamsSnapshot {
    #[serde(default)]
    pub teams: Vec<TeamSnapshot>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TeamSnapshot {
    #[serde(flatten)]
    pub team: Team,

    #[serde(default)]
    pub members: Vec<String>,
}

impl TeamsSnapshot {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn get(&self, slug: &str) -> Option<&TeamSnapshot> {
        self.teams.iter().find(|entry| entry.team.slug == slug)
    }
}

impl TeamDirectory for TeamsSnapshot {
    fn list_teams(&self) -> ImporterResult<Vec<Team>> {
        Ok(self.teams.iter().map(|entry| entry.team.clone()).collect())
    }

    fn find_team(&self, slug: &str) -> ImporterResult<Option<Team>> {
        Ok(self.get(slug).map(|entry| entry.team.clone()))
    }

    fn team_members(&self, slug: &str) -> ImporterResult<Vec<String>> {
        self.get(slug)
            .map(|entry| entry.members.clone())
            .ok_or_else(|| ImporterError::TeamNotFound(slug.to_string()))
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct EmployeesSnapshot {
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl EmployeesSnapshot {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl EmployeeDirectory for EmployeesSnapshot {
    fn employees(&self) -> ImporterResult<Vec<Employee>> {
        Ok(self.employees.clone())
    }
}

/// Default branches per repository name, with an optional fallback for unlisted ones.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct StaticRepositories {
    #[serde(default)]
    pub default_branches: BTreeMap<String, String>,

    #[serde(skip)]
    fallback: Option<String>,
}

impl StaticRepositories {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn with_fallback(mut self, branch: impl Into<String>) -> Self {
        self.fallback = Some(branch.into());
        self
    }
}

impl RepositoryDirectory for StaticRepositories {
    fn default_branch(&self, repository: &str) -> ImporterResult<Option<String>> {
        Ok(self
            .default_branches
            .get(repository)
            .or(self.fallback.as_ref())
            .cloned())
    }
}

/// Repository lists by owning team slug, and details by repository name.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepositoriesSnapshot {
    pub lists: BTreeMap<String, Vec<RepositoryEntry>>,
    pub repositories: BTreeMap<String, RepositoryDetails>,
}

impl RepositoriesSnapshot {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl RepositoryInventory for RepositoriesSnapshot {
    fn lists(&self) -> ImporterResult<Vec<RepositoryList>> {
        Ok(self
            .lists
            .iter()
            .map(|(team, repositories)| RepositoryList {
                owner_team: team.clone(),
                repositories: repositories.clone(),
            })
            .collect())
    }

    fn details(&self, repository: &str) -> ImporterResult<Option<RepositoryDetails>> {
        Ok(self.repositories.get(repository).cloned())
    }
}

impl RepositoryDirectory for RepositoriesSnapshot {
    fn default_branch(&self, repository: &str) -> ImporterResult<Option<String>> {
        Ok(self
            .repositories
            .get(repository)
            .map(|details| details.default_branch.clone())
            .filter(|branch| !branch.is_empty()))
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct InstallationsSnapshot {
    #[serde(default)]
    pub installations: Vec<Installation>,
}

impl InstallationsSnapshot {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        let snapshot: Self = serde_yaml::from_str(content)?;
        Ok(Self {
            installations: snapshot
                .installations
                .into_iter()
                .map(Installation::with_region_fallback)
                .collect(),
        })
    }
}

impl InstallationDirectory for InstallationsSnapshot {
    fn installations(&self) -> ImporterResult<Vec<Installation>> {
        Ok(self.installations.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::sources::snapshot::{
        EmployeesSnapshot, InstallationsSnapshot, RegistrySnapshot, RepositoriesSnapshot,
        StaticRepositories, TeamsSnapshot,
    };
    use crate::sources::{
        ChartRegistry, EmployeeDirectory, InstallationDirectory, RepositoryDirectory,
        RepositoryInventory, TeamDirectory,
    };
    use crate::ImporterError;

    #[test]
    fn registry_should_filter_by_prefix() {
        let registry = RegistrySnapshot::from_yaml(
            r#"
hostname: gsoci.azurecr.io
repositories:
  charts/giantswarm/foo:
    tags: [1.0.0]
    manifests:
      1.0.0:
        config:
          name: foo
  giantswarm/bar:
    tags: []
"#,
        )
        .unwrap();

        assert_eq!("gsoci.azurecr.io", registry.hostname());
        assert_eq!(
            vec!["charts/giantswarm/foo"],
            registry.list_repositories("charts/").unwrap()
        );
        assert_eq!(2, registry.list_repositories("").unwrap().len());
        assert_eq!(
            Some("foo"),
            registry
                .fetch_manifest("charts/giantswarm/foo", "1.0.0")
                .unwrap()
                .config["name"]
                .as_str()
        );
        assert!(registry.fetch_manifest("charts/giantswarm/foo", "2.0.0").is_err());
        assert!(registry.list_tags("unknown").is_err());
    }

    #[test]
    fn teams_should_resolve_by_slug() {
        let teams = TeamsSnapshot::from_yaml(
            r#"
teams:
- id: 7
  slug: team-honeybadger
  name: Honey Badger
  members: [alice, bob]
"#,
        )
        .unwrap();

        let team = teams.find_team("team-honeybadger").unwrap().unwrap();
        assert_eq!(7, team.id);
        assert_eq!("Honey Badger", team.name);
        assert_eq!(vec!["alice", "bob"], teams.team_members("team-honeybadger").unwrap());
        assert_eq!(None, teams.find_team("team-unknown").unwrap());
        assert!(matches!(
            teams.team_members("team-unknown"),
            Err(ImporterError::TeamNotFound(_))
        ));
    }

    #[test]
    fn employees_should_load() {
        let employees = EmployeesSnapshot::from_yaml(
            r#"
employees:
- first_name: Jane
  last_name: Doe
  email: jane@example.com
  github_handle: JDoe
"#,
        )
        .unwrap();

        let employees = employees.employees().unwrap();
        assert_eq!(1, employees.len());
        assert_eq!(Some("JDoe"), employees[0].github_handle());
    }

    #[test]
    fn repositories_should_use_fallback() {
        let repositories = StaticRepositories::from_yaml("default_branches:\n  foo: master\n")
            .unwrap()
            .with_fallback("main");

        assert_eq!(Some("master".to_string()), repositories.default_branch("foo").unwrap());
        assert_eq!(Some("main".to_string()), repositories.default_branch("bar").unwrap());
        assert_eq!(
            None,
            StaticRepositories::default().default_branch("bar").unwrap()
        );
    }

    #[test]
    fn repository_lists_should_be_ordered_by_team() {
        let snapshot = RepositoriesSnapshot::from_yaml(
            r#"
lists:
  team-zeta:
  - name: foo
  team-atlas:
  - name: bar
    componentType: service
    gen:
      flavours: [app]
      language: go
repositories:
  bar:
    defaultBranch: master
  foo: {}
"#,
        )
        .unwrap();

        let lists = snapshot.lists().unwrap();
        assert_eq!(2, lists.len());
        assert_eq!("team-atlas", lists[0].owner_team);
        assert_eq!("service", lists[0].repositories[0].component_type);
        assert_eq!(vec!["app"], lists[0].repositories[0].gen.flavors);
        assert!(snapshot.details("unknown").unwrap().is_none());

        assert_eq!(Some("master".to_string()), snapshot.default_branch("bar").unwrap());
        assert_eq!(None, snapshot.default_branch("foo").unwrap());
    }

    #[test]
    fn installations_should_load_with_region_fallback() {
        let snapshot = InstallationsSnapshot::from_yaml(
            r#"
installations:
- codename: gauss
  provider: aws
  aws:
    region: eu-central-1
"#,
        )
        .unwrap();

        let installations = snapshot.installations().unwrap();
        assert_eq!("eu-central-1", installations[0].region);
    }
}
