use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::record::{string_list, SourceRecord};

/// Manifest annotation holding the image creation time.
pub const CREATED_ANNOTATION: &str = "org.opencontainers.image.created";

/// What the importer reads from one OCI artifact: the chart config blob and the manifest
/// annotations.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ManifestInfo {
    /// The Helm chart config blob, i.e. the `Chart.yaml` content as JSON.
    #[serde(default)]
    pub config: Map<String, Value>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl ManifestInfo {
    pub fn created(&self) -> Option<&str> {
        self.annotations
            .get(CREATED_ANNOTATION)
            .map(String::as_str)
            .filter(|created| !created.is_empty())
    }

    pub fn to_record(&self, repository: &str, tag: &str) -> SourceRecord {
        SourceRecord {
            name: repository.to_string(),
            tags: vec![tag.to_string()],
            created: self.created().map(String::from),
            configuration: self.config.clone(),
            home: self
                .config
                .get("home")
                .and_then(Value::as_str)
                .filter(|home| !home.is_empty())
                .map(String::from),
            sources: string_list(self.config.get("sources")),
            urls: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::sources::oci::ManifestInfo;

    #[test]
    fn should_convert_to_record() {
        let manifest: ManifestInfo = serde_yaml::from_str(
            r#"
config:
  name: foo
  home: https://github.com/giantswarm/foo
  sources: [https://github.com/giantswarm/foo-src, 42]
  version: 1.0.0
annotations:
  org.opencontainers.image.created: "2024-05-06T07:08:09Z"
"#,
        )
        .unwrap();

        let record = manifest.to_record("charts/giantswarm/foo", "1.0.0");
        assert_eq!("charts/giantswarm/foo", record.name);
        assert_eq!(vec!["1.0.0"], record.tags);
        assert_eq!(Some("2024-05-06T07:08:09Z"), record.created.as_deref());
        assert_eq!(Some("https://github.com/giantswarm/foo"), record.home.as_deref());
        assert_eq!(vec!["https://github.com/giantswarm/foo-src"], record.sources);
        assert_eq!(Some(&json!("1.0.0")), record.configuration.get("version"));
    }

    #[test]
    fn empty_created_should_be_absent() {
        let mut manifest = ManifestInfo::default();
        manifest
            .annotations
            .insert("org.opencontainers.image.created".to_string(), String::new());
        assert_eq!(None, manifest.created());
    }
}
