use crate::builder::{override_non_empty, Decorations, EntityBuilder};
use crate::entity::{
    default_owner, non_empty, Entity, EntityKind, EntitySpec, ResourceSpec, API_VERSION,
    DEFAULT_NAMESPACE, UNSPECIFIED,
};
use crate::{CatalogError, CatalogResult};

/// Infrastructure a component needs at runtime, such as a database or a bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    name: String,
    namespace: String,
    title: Option<String>,
    description: Option<String>,
    resource_type: String,
    owner: Option<String>,
    system: Option<String>,
    /// Full entity references, written as given but sorted.
    depends_on: Vec<String>,
    decorations: Decorations,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> CatalogResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }

        Ok(Self {
            name,
            namespace: DEFAULT_NAMESPACE.to_string(),
            title: None,
            description: None,
            resource_type: UNSPECIFIED.to_string(),
            owner: None,
            system: None,
            depends_on: vec![],
            decorations: Decorations::default(),
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        override_non_empty(&mut self.namespace, namespace);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        override_non_empty(&mut self.resource_type, resource_type);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        if let Some(owner) = non_empty(owner) {
            self.owner = Some(owner);
        }
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = non_empty(system);
        self
    }

    pub fn with_depends_on<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = refs.into_iter().map(Into::into).collect();
        self
    }
}

impl EntityBuilder for Resource {
    fn decorations_mut(&mut self) -> &mut Decorations {
        &mut self.decorations
    }

    fn to_entity(&self) -> Entity {
        let metadata = self.decorations.metadata(
            &self.name,
            &self.namespace,
            self.title.as_ref(),
            self.description.as_ref(),
        );

        let mut depends_on = self.depends_on.clone();
        depends_on.sort();

        Entity {
            api_version: API_VERSION.to_string(),
            kind: EntityKind::Resource,
            metadata,
            spec: EntitySpec::Resource(ResourceSpec {
                owner: self
                    .owner
                    .clone()
                    .unwrap_or_else(|| default_owner(&self.namespace)),
                resource_type: self.resource_type.clone(),
                system: self.system.clone(),
                depends_on,
            }),
        }
    }
}
