use std::fmt::{Display, Formatter};

use crate::{ImporterError, ImporterResult};

pub const GITHUB_URL: &str = "https://github.com/";

const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com/";

/// "<organization>/<repository>"
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RepoSlug {
    pub organization: String,
    pub repository: String,
}

impl RepoSlug {
    pub fn new(organization: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            repository: repository.into(),
        }
    }
}

impl Display for RepoSlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.repository)
    }
}

/// A single file in a GitHub repository.
#[derive(Clone, Debug, PartialEq)]
pub struct GithubFileLocation {
    pub owner: String,
    pub repo: String,
    pub git_ref: String,
    pub path: String,
}

impl GithubFileLocation {
    pub fn raw_url(&self) -> String {
        format!(
            "https://{RAW_CONTENT_HOST}{}/{}/{}/{}",
            self.owner, self.repo, self.git_ref, self.path
        )
    }
}

/// Splits a GitHub file URL into its parts.
///
/// Supports `https://github.com/<owner>/<repo>/blob/<ref>/<path>` and
/// `https://raw.githubusercontent.com/<owner>/<repo>/<ref>/<path>`.
pub fn parse_github_url(url: &str) -> ImporterResult<GithubFileLocation> {
    let invalid = |reason: &str| ImporterError::InvalidGithubUrl(url.to_string(), reason.to_string());

    let trimmed = url.trim();
    let trimmed = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    if let Some(remainder) = trimmed.strip_prefix(RAW_CONTENT_HOST) {
        let parts: Vec<&str> = remainder.splitn(4, '/').collect();
        let [owner, repo, git_ref, path] = parts[..] else {
            return Err(invalid("expected owner/repo/ref/path"));
        };
        if owner.is_empty() || repo.is_empty() || path.is_empty() {
            return Err(invalid("owner, repo and path must not be empty"));
        }
        return Ok(GithubFileLocation {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.to_string(),
            path: path.to_string(),
        });
    }

    if let Some(remainder) = trimmed.strip_prefix("github.com/") {
        let parts: Vec<&str> = remainder.splitn(5, '/').collect();
        let [owner, repo, kind, git_ref, path] = parts[..] else {
            return Err(invalid("expected owner/repo/blob/ref/path"));
        };
        if kind != "blob" {
            return Err(invalid("expected 'blob' in path"));
        }
        if owner.is_empty() || repo.is_empty() || path.is_empty() {
            return Err(invalid("owner, repo and path must not be empty"));
        }
        return Ok(GithubFileLocation {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.to_string(),
            path: path.to_string(),
        });
    }

    Err(invalid("must be github.com or raw.githubusercontent.com"))
}
