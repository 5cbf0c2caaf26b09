//! Upstream data: the documents the importer reads and the collaborators that serve them.

use crate::ImporterResult;

pub mod crd;
pub mod helm_index;
pub mod installations;
pub mod oci;
pub mod people;
pub mod repositories;
pub mod snapshot;

use installations::Installation;
use oci::ManifestInfo;
use people::{Employee, Team};
use repositories::{RepositoryDetails, RepositoryList};

/// An OCI registry holding Helm charts.
pub trait ChartRegistry {
    /// Registry host name, e.g. `gsoci.azurecr.io`.
    fn hostname(&self) -> &str;

    /// Repository names starting with `prefix`.
    fn list_repositories(&self, prefix: &str) -> ImporterResult<Vec<String>>;

    fn list_tags(&self, repository: &str) -> ImporterResult<Vec<String>>;

    fn fetch_manifest(&self, repository: &str, tag: &str) -> ImporterResult<ManifestInfo>;
}

/// Teams of the organization.
pub trait TeamDirectory {
    fn list_teams(&self) -> ImporterResult<Vec<Team>>;

    /// `Ok(None)` when no team has this slug.
    fn find_team(&self, slug: &str) -> ImporterResult<Option<Team>>;

    /// Login names of the team's members.
    fn team_members(&self, slug: &str) -> ImporterResult<Vec<String>>;
}

pub trait EmployeeDirectory {
    fn employees(&self) -> ImporterResult<Vec<Employee>>;
}

pub trait RepositoryDirectory {
    /// `Ok(None)` when the default branch is unknown.
    fn default_branch(&self, repository: &str) -> ImporterResult<Option<String>>;
}

/// The repository lists teams maintain, and GitHub's facts about the listed repositories.
pub trait RepositoryInventory {
    fn lists(&self) -> ImporterResult<Vec<RepositoryList>>;

    /// `Ok(None)` when the organization has no such repository.
    fn details(&self, repository: &str) -> ImporterResult<Option<RepositoryDetails>>;
}

pub trait InstallationDirectory {
    fn installations(&self) -> ImporterResult<Vec<Installation>>;
}

/// Fetches documents by URL.
pub trait ContentSource {
    fn fetch(&self, url: &str) -> ImporterResult<String>;
}
