use crate::builder::{override_non_empty, Decorations, EntityBuilder};
use crate::entity::{
    default_owner, non_empty, ApiSpec, Entity, EntityKind, EntitySpec, API_VERSION,
    DEFAULT_LIFECYCLE, DEFAULT_NAMESPACE, UNSPECIFIED,
};
use crate::{CatalogError, CatalogResult};

/// An interface some component provides, described by its definition document.
#[derive(Clone, Debug, PartialEq)]
pub struct Api {
    name: String,
    namespace: String,
    title: Option<String>,
    description: Option<String>,
    api_type: String,
    lifecycle: String,
    owner: Option<String>,
    system: Option<String>,
    definition: String,
    decorations: Decorations,
}

impl Api {
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
            api_type: UNSPECIFIED.to_string(),
            lifecycle: DEFAULT_LIFECYCLE.to_string(),
            owner: None,
            system: None,
            definition: String::new(),
            decorations: Decorations::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn with_type(mut self, api_type: impl Into<String>) -> Self {
        override_non_empty(&mut self.api_type, api_type);
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: impl Into<String>) -> Self {
        override_non_empty(&mut self.lifecycle, lifecycle);
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

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }
}

impl EntityBuilder for Api {
    fn decorations_mut(&mut self) -> &mut Decorations {
        &mut self.decorations
    }

    fn to_entity(&self) -> Entity {
        Entity {
            api_version: API_VERSION.to_string(),
            kind: EntityKind::Api,
            metadata: self.decorations.metadata(
                &self.name,
                &self.namespace,
                self.title.as_ref(),
                self.description.as_ref(),
            ),
            spec: EntitySpec::Api(ApiSpec {
                api_type: self.api_type.clone(),
                lifecycle: self.lifecycle.clone(),
                owner: self
                    .owner
                    .clone()
                    .unwrap_or_else(|| default_owner(&self.namespace)),
                system: self.system.clone(),
                definition: self.definition.clone(),
            }),
        }
    }
}
