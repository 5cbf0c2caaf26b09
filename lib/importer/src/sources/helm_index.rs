//! Giant Swarm app catalogs, which are Helm repository indexes with conventional metadata.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::record::{SourceRecord, ANNOTATIONS_KEY};
use crate::ImporterResult;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(default)]
    pub api_version: String,

    /// Releases per app name.
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<Entry>>,

    #[serde(default)]
    pub generated: String,
}

impl Index {
    pub fn from_yaml(content: &str) -> ImporterResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// One release of an app.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Entry {
    pub annotations: BTreeMap<String, String>,
    pub api_version: String,
    pub app_version: String,
    pub created: String,
    pub description: String,
    pub digest: String,
    pub home: String,
    pub icon: String,
    pub keywords: Vec<String>,
    pub name: String,
    pub sources: Vec<String>,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub urls: Vec<String>,
    pub version: String,
}

impl Entry {
    pub fn to_record(&self) -> SourceRecord {
        let mut configuration = Map::new();
        let fields = [
            ("appVersion", &self.app_version),
            ("description", &self.description),
            ("icon", &self.icon),
            ("type", &self.chart_type),
            ("version", &self.version),
        ];
        for (key, value) in fields {
            if !value.is_empty() {
                configuration.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if !self.keywords.is_empty() {
            configuration.insert(
                "keywords".to_string(),
                Value::Array(self.keywords.iter().cloned().map(Value::String).collect()),
            );
        }
        configuration.insert(
            ANNOTATIONS_KEY.to_string(),
            Value::Object(
                self.annotations
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        );

        SourceRecord {
            name: self.name.clone(),
            tags: if self.version.is_empty() {
                vec![]
            } else {
                vec![self.version.clone()]
            },
            created: Some(self.created.clone()).filter(|created| !created.is_empty()),
            configuration,
            home: Some(self.home.clone()).filter(|home| !home.is_empty()),
            sources: self.sources.clone(),
            urls: self.urls.clone(),
        }
    }
}
