//! Resolves single output values from the loosely structured metadata of a [`SourceRecord`].

use std::str::FromStr;

use catalog::default_owner;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};
use tracing::warn;

use crate::github::{RepoSlug, GITHUB_URL};
use crate::record::SourceRecord;
use crate::{ImporterError, ImporterResult};

const TEAM_PREFIX: &str = "team-";

const APP_SUFFIX: &str = "-app";

/// The current and the legacy key of one annotation. The current key wins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnotationKeys {
    pub current: &'static str,
    pub legacy: &'static str,
}

impl AnnotationKeys {
    pub fn candidates(&self) -> [&'static str; 2] {
        [self.current, self.legacy]
    }
}

pub const TEAM: AnnotationKeys = AnnotationKeys {
    current: "io.giantswarm.application.team",
    legacy: "application.giantswarm.io/team",
};

pub const AUDIENCE: AnnotationKeys = AnnotationKeys {
    current: "io.giantswarm.application.audience",
    legacy: "application.giantswarm.io/audience",
};

pub const MANAGED: AnnotationKeys = AnnotationKeys {
    current: "io.giantswarm.application.managed",
    legacy: "application.giantswarm.io/managed",
};

/// Returns the first candidate key holding a value, along with that value.
///
/// Null values and empty strings count as absent.
pub fn resolve_annotation<'a>(
    annotations: &'a Map<String, Value>,
    keys: &AnnotationKeys,
) -> Option<(&'static str, &'a Value)> {
    keys.candidates().into_iter().find_map(|key| {
        annotations
            .get(key)
            .filter(|value| is_present(value))
            .map(|value| (key, value))
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Turns a team name into an owner reference, adding the `team-` prefix when missing.
///
/// `format_team_owner("honeybadger", "giantswarm")` gives `group:giantswarm/team-honeybadger`.
/// A blank team gives the namespace's unspecified group.
pub fn format_team_owner(team: &str, namespace: &str) -> String {
    let team = team.trim();
    if team.is_empty() {
        default_owner(namespace)
    } else if team.starts_with(TEAM_PREFIX) {
        format!("group:{namespace}/{team}")
    } else {
        format!("group:{namespace}/{TEAM_PREFIX}{team}")
    }
}

/// Owner reference from the team annotation, or the namespace's unspecified group.
pub fn resolve_owner(annotations: Option<&Map<String, Value>>, namespace: &str) -> String {
    annotations
        .and_then(|annotations| resolve_annotation(annotations, &TEAM))
        .and_then(|(_, value)| value.as_str())
        .map(|team| format_team_owner(team, namespace))
        .unwrap_or_else(|| default_owner(namespace))
}

/// Who an artifact is meant for.
#[derive(AsRefStr, Clone, Copy, Debug, Default, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Audience {
    /// Everyone, including customers.
    #[default]
    All,
    /// Giant Swarm staff only.
    GiantSwarm,
}

/// Resolves the audience annotation. Unknown values are reported and fall back to
/// [`Audience::All`].
pub fn resolve_audience(annotations: Option<&Map<String, Value>>, context: &str) -> Audience {
    let Some((key, value)) =
        annotations.and_then(|annotations| resolve_annotation(annotations, &AUDIENCE))
    else {
        return Audience::default();
    };

    match value.as_str().map(Audience::from_str) {
        Some(Ok(audience)) => audience,
        _ => {
            warn!(
                "'{key}' annotation value '{}' is not a valid audience for {context}",
                display_value(value)
            );
            Audience::default()
        }
    }
}

/// Parses booleans the way Go's `strconv.ParseBool` does, and accepts native booleans.
pub fn parse_bool_permissive(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Resolves the managed flag. Values that are not booleans are reported and read as `false`.
pub fn resolve_managed(annotations: Option<&Map<String, Value>>, context: &str) -> bool {
    let Some((key, value)) =
        annotations.and_then(|annotations| resolve_annotation(annotations, &MANAGED))
    else {
        return false;
    };

    parse_bool_permissive(value).unwrap_or_else(|| {
        warn!(
            "'{key}' annotation value '{}' is not a valid boolean for {context}",
            display_value(value)
        );
        false
    })
}

/// Only charts whose audience annotation says `all` are published.
pub fn should_include_chart(configuration: &Map<String, Value>) -> bool {
    configuration
        .get(crate::record::ANNOTATIONS_KEY)
        .and_then(Value::as_object)
        .and_then(|annotations| resolve_annotation(annotations, &AUDIENCE))
        .and_then(|(_, value)| value.as_str())
        == Some(Audience::All.as_ref())
}

/// Finds the GitHub repository of a record among its candidate URLs.
#[derive(Clone, Debug)]
pub struct SlugMatcher {
    organization: String,
    prefix: String,
}

impl SlugMatcher {
    pub fn github(organization: &str) -> Self {
        Self {
            organization: organization.to_string(),
            prefix: format!("{GITHUB_URL}{organization}/"),
        }
    }

    /// Checks home, then sources, then urls. The first URL under the organization naming a
    /// repository decides.
    pub fn detect(&self, record: &SourceRecord) -> Option<RepoSlug> {
        record
            .candidate_urls()
            .filter(|url| url.starts_with(&self.prefix))
            .find_map(|url| self.slug_from_url(url))
    }

    /// Only the first path segment after the organization is kept, so links into a repository
    /// resolve to the repository itself.
    pub fn slug_from_url(&self, url: &str) -> Option<RepoSlug> {
        let remainder = url.strip_prefix(&self.prefix)?;
        let remainder = remainder.strip_suffix('/').unwrap_or(remainder);
        let repository = remainder.split('/').next().unwrap_or_default();
        if repository.is_empty() {
            return None;
        }

        Some(RepoSlug::new(&self.organization, repository))
    }
}

/// Names a deployment of `name` may have. Explicit overrides win; otherwise the name without and
/// with the `-app` suffix.
pub fn deployment_names(name: &str, overrides: &[String]) -> Vec<String> {
    if !overrides.is_empty() {
        return overrides.to_vec();
    }

    let base = name.strip_suffix(APP_SUFFIX).unwrap_or(name);
    vec![base.to_string(), format!("{base}{APP_SUFFIX}")]
}

/// Application charts, and charts without a type, produce a workload. Library charts do not.
pub fn is_chart_deployable(chart_type: &str) -> bool {
    chart_type.is_empty() || chart_type == "application"
}

pub fn parse_created(value: &str) -> ImporterResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| ImporterError::InvalidTimestamp(value.to_string(), e))
}
