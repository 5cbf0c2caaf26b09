//! Team-maintained repository lists and the GitHub facts about each listed repository.

use serde::Deserialize;

use crate::github::GITHUB_URL;

const GENERIC_LANGUAGE: &str = "generic";

/// Repositories owned by one team.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepositoryList {
    /// Team slug, taken from the list's file name.
    pub owner_team: String,
    pub repositories: Vec<RepositoryEntry>,
}

/// One entry of a team's repository list.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryEntry {
    pub name: String,
    pub component_type: String,
    /// Replaces the names derived from the repository name.
    pub deployment_names: Vec<String>,
    pub system: String,
    pub lifecycle: String,
    /// Workload name in Kubernetes when it differs from the repository name.
    pub kubernetes_id: String,
    pub gen: RepositoryGen,
}

/// Settings of the repository generator.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepositoryGen {
    #[serde(rename = "flavours")]
    pub flavors: Vec<String>,
    pub language: String,
}

impl RepositoryGen {
    /// `None` when unset or generic.
    pub fn language(&self) -> Option<&str> {
        Some(self.language.as_str())
            .filter(|language| !language.is_empty() && *language != GENERIC_LANGUAGE)
    }
}

/// What GitHub knows about a repository.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryDetails {
    pub description: String,
    pub private: bool,
    pub default_branch: String,
    #[serde(rename = "circleci")]
    pub has_circleci: bool,
    #[serde(rename = "readme")]
    pub has_readme: bool,
    pub latest_release: Option<Release>,
    /// Charts found in the repository's `helm` directory.
    pub helm_charts: Vec<ChartMetadata>,
    /// Package names from the repository's software bill of materials.
    pub packages: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Release {
    pub tag: String,
    pub created: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartMetadata {
    pub name: String,
    pub version: String,
    pub app_version: String,
}

impl RepositoryDetails {
    /// The latest release, if it has a tag.
    pub fn latest_release(&self) -> Option<&Release> {
        self.latest_release
            .as_ref()
            .filter(|release| !release.tag.is_empty())
    }

    /// Other repositories of `organization` this one depends on, sorted and unique.
    ///
    /// Packages look like `github.com/<organization>/<repository>/<path>`.
    pub fn dependencies(&self, organization: &str, own_name: &str) -> Vec<String> {
        let host = GITHUB_URL.trim_start_matches("https://");
        let prefix = format!("{host}{organization}/");

        let mut names: Vec<String> = self
            .packages
            .iter()
            .filter_map(|package| package.strip_prefix(&prefix))
            .filter_map(|remainder| remainder.split('/').next())
            .filter(|name| !name.is_empty() && *name != own_name)
            .map(String::from)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use crate::sources::repositories::{RepositoryDetails, RepositoryGen};

    #[test_case("go" => Some("go".to_string()); "go")]
    #[test_case("generic" => None; "generic")]
    #[test_case("" => None; "unset")]
    fn should_resolve_language(language: &str) -> Option<String> {
        RepositoryGen {
            language: language.to_string(),
            ..Default::default()
        }
        .language()
        .map(String::from)
    }

    #[test]
    fn dependencies_should_keep_organization_repositories() {
        let details = RepositoryDetails {
            packages: vec![
                "github.com/giantswarm/microerror".to_string(),
                "github.com/giantswarm/k8sclient/v7/pkg/k8sclient".to_string(),
                "github.com/giantswarm/k8sclient/v7/pkg/k8srestconfig".to_string(),
                "github.com/giantswarm/foo/cmd".to_string(),
                "github.com/spf13/cobra".to_string(),
                "golang.org/x/oauth2".to_string(),
            ],
            ..Default::default()
        };

        assert_eq!(
            vec!["k8sclient", "microerror"],
            details.dependencies("giantswarm", "foo")
        );
    }

    #[test]
    fn untagged_release_should_be_absent() {
        let details: RepositoryDetails =
            serde_yaml::from_str("latestRelease:\n  tag: \"\"\n").unwrap();
        assert!(details.latest_release().is_none());
    }
}
