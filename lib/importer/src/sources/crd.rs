use catalog::DEFAULT_LIFECYCLE;
use serde::Deserialize;

use crate::{ImporterError, ImporterResult};

const CRD_KIND: &str = "CustomResourceDefinition";

/// One CRD to publish, as listed in the CRD config file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrdConfigItem {
    /// GitHub URL of the CRD manifest.
    pub url: String,

    /// Owner entity reference.
    pub owner: String,

    pub lifecycle: String,

    pub system: String,
}

/// Parses the CRD config list, checking required fields and applying defaults.
pub fn load_config(content: &str) -> ImporterResult<Vec<CrdConfigItem>> {
    let mut items: Vec<CrdConfigItem> = serde_yaml::from_str(content)?;
    for (i, item) in items.iter_mut().enumerate() {
        let invalid = |reason: &str| ImporterError::InvalidCrdConfig {
            index: i + 1,
            reason: reason.to_string(),
        };
        if item.url.is_empty() {
            return Err(invalid("url is required"));
        }
        if item.owner.is_empty() {
            return Err(invalid("owner is required"));
        }
        if item.lifecycle.is_empty() {
            item.lifecycle = DEFAULT_LIFECYCLE.to_string();
        }
    }

    Ok(items)
}

/// The parts of a CRD manifest an API entity is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct CrdMetadata {
    /// Full CRD name, e.g. `apps.application.giantswarm.io`.
    pub name: String,
    pub kind: String,
    pub group: String,
    /// Schema description of the first version, if any.
    pub description: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CrdManifest {
    kind: String,
    metadata: CrdManifestMetadata,
    spec: CrdManifestSpec,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CrdManifestMetadata {
    name: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CrdManifestSpec {
    group: String,
    names: CrdNames,
    versions: Vec<CrdVersion>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CrdNames {
    kind: String,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CrdVersion {
    schema: CrdSchema,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CrdSchema {
    #[serde(rename = "openAPIV3Schema")]
    open_api_v3_schema: CrdOpenApiSchema,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CrdOpenApiSchema {
    description: String,
}

impl CrdMetadata {
    pub fn parse(content: &str) -> ImporterResult<Self> {
        let manifest: CrdManifest = serde_yaml::from_str(content)?;
        if manifest.kind != CRD_KIND {
            return Err(ImporterError::InvalidCrd(format!(
                "expected kind {CRD_KIND}, got '{}'",
                manifest.kind
            )));
        }
        if manifest.metadata.name.is_empty() {
            return Err(ImporterError::InvalidCrd(
                "missing metadata.name".to_string(),
            ));
        }
        if manifest.spec.names.kind.is_empty() {
            return Err(ImporterError::InvalidCrd(
                "missing spec.names.kind".to_string(),
            ));
        }

        let description = manifest
            .spec
            .versions
            .into_iter()
            .next()
            .map(|version| version.schema.open_api_v3_schema.description)
            .filter(|description| !description.is_empty());

        Ok(Self {
            name: manifest.metadata.name,
            kind: manifest.spec.names.kind,
            group: manifest.spec.group,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::sources::crd::{load_config, CrdMetadata};
    use crate::ImporterError;

    #[test]
    fn should_load_config_with_defaults() {
        let items = load_config(
            r#"
- url: https://github.com/giantswarm/apiextensions-application/blob/main/config/crd/application.giantswarm.io_apps.yaml
  owner: group:default/team-honeybadger
  system: app-platform
- url: https://github.com/giantswarm/foo/blob/main/crd.yaml
  owner: group:default/team-atlas
  lifecycle: experimental
"#,
        )
        .unwrap();

        assert_eq!(2, items.len());
        assert_eq!("production", items[0].lifecycle);
        assert_eq!("app-platform", items[0].system);
        assert_eq!("experimental", items[1].lifecycle);
        assert_eq!("", items[1].system);
    }

    #[test]
    fn should_reject_items_without_owner() {
        let result = load_config(
            r#"
- url: https://github.com/giantswarm/foo/blob/main/crd.yaml
  owner: group:default/team-atlas
- url: https://github.com/giantswarm/bar/blob/main/crd.yaml
"#,
        );

        assert!(matches!(
            result,
            Err(ImporterError::InvalidCrdConfig { index: 2, .. })
        ));
    }

    #[test]
    fn should_reject_items_without_url() {
        let result = load_config("- owner: group:default/team-atlas\n");
        assert!(matches!(
            result,
            Err(ImporterError::InvalidCrdConfig { index: 1, .. })
        ));
    }

    #[test]
    fn should_parse_crd_metadata() {
        let metadata = CrdMetadata::parse(
            r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: apps.application.giantswarm.io
spec:
  group: application.giantswarm.io
  names:
    kind: App
    plural: apps
  versions:
  - name: v1alpha1
    schema:
      openAPIV3Schema:
        description: App represents a managed app.
"#,
        )
        .unwrap();

        assert_eq!("apps.application.giantswarm.io", metadata.name);
        assert_eq!("App", metadata.kind);
        assert_eq!("application.giantswarm.io", metadata.group);
        assert_eq!(
            Some("App represents a managed app.".to_string()),
            metadata.description
        );
    }

    #[test]
    fn should_reject_other_kinds() {
        let result = CrdMetadata::parse("kind: Deployment\nmetadata:\n  name: foo\n");
        assert!(matches!(result, Err(ImporterError::InvalidCrd(_))));
    }

    #[test]
    fn should_require_names_kind() {
        let result = CrdMetadata::parse(
            "kind: CustomResourceDefinition\nmetadata:\n  name: foos.example.com\n",
        );
        assert!(matches!(result, Err(ImporterError::InvalidCrd(_))));
    }
}
