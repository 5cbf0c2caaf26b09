use std::collections::BTreeMap;

use crate::entity::{namespace_for_output, non_empty, Entity, EntityLink, EntityMetadata};

/// Free-form additions callers make to an entity before it is finalized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decorations {
    pub tags: Vec<String>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub links: Vec<EntityLink>,
}

impl Decorations {
    /// Builds the metadata block shared by every kind.
    ///
    /// Tags are sorted before they are normalized, annotations start as a copy of the explicit
    /// ones so callers can layer computed values on top.
    pub(crate) fn metadata(
        &self,
        name: &str,
        namespace: &str,
        title: Option<&String>,
        description: Option<&String>,
    ) -> EntityMetadata {
        let mut tags = self.tags.clone();
        tags.sort();

        let mut metadata = EntityMetadata {
            name: name.to_string(),
            namespace: namespace_for_output(namespace),
            title: title.cloned(),
            description: description.cloned(),
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            tags,
            links: self.links.clone(),
        };
        metadata.normalize_tags();
        metadata
    }
}

/// Shared mutation operations of the per-kind entity builders.
pub trait EntityBuilder {
    fn decorations_mut(&mut self) -> &mut Decorations;

    /// Freezes the builder into an entity. Never mutates the builder, so repeated calls produce
    /// identical entities.
    fn to_entity(&self) -> Entity;

    /// Appends a tag. Duplicates are kept.
    fn add_tag(&mut self, tag: impl Into<String>)
    where
        Self: Sized,
    {
        self.decorations_mut().tags.push(tag.into());
    }

    fn add_link(&mut self, link: EntityLink)
    where
        Self: Sized,
    {
        self.decorations_mut().links.push(link);
    }

    /// Sets an annotation, replacing any previous value for the key.
    fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.decorations_mut()
            .annotations
            .insert(key.into(), value.into());
    }

    fn set_label(&mut self, key: impl Into<String>, value: impl Into<String>)
    where
        Self: Sized,
    {
        self.decorations_mut().labels.insert(key.into(), value.into());
    }
}

/// Overrides `target` only when `value` is not empty.
pub(crate) fn override_non_empty(target: &mut String, value: impl Into<String>) {
    if let Some(value) = non_empty(value) {
        *target = value;
    }
}
