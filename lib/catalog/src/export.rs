use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entity::Entity;
use crate::CatalogResult;

const HEADER: &str = "#\n# This file was generated automatically. PLEASE DO NOT MODIFY IT BY HAND!\n#\n\n";

const SEPARATOR: &str = "---\n";

/// Collects finalized entities and renders them as one multi-document YAML file.
///
/// Entities are ordered by apiVersion, kind, namespace and name. The document is rebuilt on every
/// read, so repeated reads of an unchanged collection are byte-identical.
#[derive(Debug, Default)]
pub struct Export {
    target_path: PathBuf,
    collection: Vec<Entity>,
}

impl Export {
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: target_path.into(),
            collection: vec![],
        }
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.collection.push(entity);
    }

    pub fn entity_count(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn render(&self) -> CatalogResult<String> {
        let mut entities: Vec<&Entity> = self.collection.iter().collect();
        entities.sort_by(|a, b| {
            a.api_version
                .cmp(&b.api_version)
                .then_with(|| a.kind.as_ref().cmp(b.kind.as_ref()))
                .then_with(|| a.metadata.namespace.cmp(&b.metadata.namespace))
                .then_with(|| a.metadata.name.cmp(&b.metadata.name))
        });

        let mut output = String::from(HEADER);
        for entity in entities {
            output.push_str(SEPARATOR);
            output.push_str(&serde_yaml::to_string(entity)?);
        }

        Ok(output)
    }

    /// Size in bytes of the rendered document.
    pub fn byte_len(&self) -> CatalogResult<usize> {
        Ok(self.render()?.len())
    }

    /// Renders the collection and writes it to the target path, creating parent directories.
    pub fn write_file(&self) -> CatalogResult<()> {
        let content = self.render()?;
        if let Some(parent) = self.target_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.target_path, content)?;
        debug!(
            "wrote {} entities to {}",
            self.collection.len(),
            self.target_path.to_string_lossy()
        );

        Ok(())
    }
}

impl Display for Export {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self.render().map_err(|_| std::fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::{Api, Component, EntityBuilder, Export, Group, User};

    const HEADER: &str =
        "#\n# This file was generated automatically. PLEASE DO NOT MODIFY IT BY HAND!\n#\n\n";

    fn names_in_order(rendered: &str) -> Vec<String> {
        rendered
            .split("---\n")
            .skip(1)
            .map(|doc| {
                let value: serde_yaml::Value = serde_yaml::from_str(doc).unwrap();
                format!(
                    "{}/{}",
                    value["kind"].as_str().unwrap(),
                    value["metadata"]["name"].as_str().unwrap()
                )
            })
            .collect()
    }

    #[test]
    fn empty_export_should_only_contain_header() {
        let export = Export::new("out.yaml");
        assert_eq!(HEADER, export.render().unwrap());
        assert_eq!(HEADER.len(), export.byte_len().unwrap());
        assert!(export.is_empty());
    }

    #[test]
    fn should_sort_entities() {
        let mut export = Export::new("out.yaml");
        export.add_entity(Component::new("zeta").unwrap().to_entity());
        export.add_entity(User::new("bob").unwrap().to_entity());
        export.add_entity(
            Component::new("beta")
                .unwrap()
                .with_namespace("giantswarm")
                .to_entity(),
        );
        export.add_entity(Component::new("alpha").unwrap().to_entity());
        export.add_entity(Api::new("crd").unwrap().to_entity());
        export.add_entity(Group::new("team-a").unwrap().to_entity());

        let rendered = export.render().unwrap();
        assert!(rendered.starts_with(HEADER));
        assert_eq!(
            vec![
                "API/crd",
                "Component/alpha",
                "Component/zeta",
                "Component/beta",
                "Group/team-a",
                "User/bob",
            ],
            names_in_order(&rendered)
        );
    }

    #[test]
    fn reads_should_be_idempotent() {
        let mut export = Export::new("out.yaml");
        let mut component = Component::new("foo").unwrap().with_type("service");
        component.add_tag("My furious tag 1");
        export.add_entity(component.to_entity());
        export.add_entity(Component::new("bar").unwrap().to_entity());

        let first = export.to_string();
        assert_eq!(first.len(), export.byte_len().unwrap());
        assert_eq!(first, export.to_string());
        assert_eq!(first, export.render().unwrap());
        assert!(first.contains("- my-furious-tag-1\n"));
    }

    #[test]
    fn should_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("components.yaml");

        let mut export = Export::new(&path);
        export.add_entity(Component::new("foo").unwrap().to_entity());
        export.write_file().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(export.render().unwrap(), content);
        assert_eq!(1, export.entity_count());
    }
}
