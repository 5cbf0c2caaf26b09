use serde_json::{Map, Value};

/// Key of the annotation sub-map inside a record's configuration.
pub const ANNOTATIONS_KEY: &str = "annotations";

/// One artifact as reported by an upstream source, before any field has been resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceRecord {
    /// Logical name the artifact is known by in its source.
    pub name: String,

    pub tags: Vec<String>,

    /// Creation time as reported upstream. Parsed later, since it may be malformed.
    pub created: Option<String>,

    /// Free-form metadata. May carry an `annotations` map using either key vocabulary.
    pub configuration: Map<String, Value>,

    pub home: Option<String>,
    pub sources: Vec<String>,
    pub urls: Vec<String>,
}

impl SourceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn annotations(&self) -> Option<&Map<String, Value>> {
        self.configuration
            .get(ANNOTATIONS_KEY)
            .and_then(Value::as_object)
    }

    /// String configuration value, `None` when missing, empty or not a string.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.configuration
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Candidate source locations in priority order: home, then sources, then urls.
    pub fn candidate_urls(&self) -> impl Iterator<Item = &str> {
        self.home
            .iter()
            .chain(self.sources.iter())
            .chain(self.urls.iter())
            .map(String::as_str)
    }
}

/// Collects string items of a JSON array, ignoring anything else.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
