use serde::Deserialize;

/// A GitHub team.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Team {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub grafana_dashboard_selector: Option<String>,
    /// Mailing list of the team.
    pub email: Option<String>,
    /// Slug of the parent team.
    pub parent: Option<String>,
}

impl Team {
    pub fn avatar_url(&self) -> String {
        format!(
            "https://avatars.githubusercontent.com/t/{}?s=116&v=4",
            self.id
        )
    }
}

/// A person as listed by the HR system.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Employee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub github_handle: Option<String>,
    pub picture_url: Option<String>,
    pub bio: Option<String>,
}

impl Employee {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The GitHub handle, `None` when missing or blank.
    pub fn github_handle(&self) -> Option<&str> {
        self.github_handle
            .as_deref()
            .map(str::trim)
            .filter(|handle| !handle.is_empty())
    }
}
