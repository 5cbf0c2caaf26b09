use crate::annotations::GRAFANA_DASHBOARD_SELECTOR;
use crate::builder::{override_non_empty, Decorations, EntityBuilder};
use crate::entity::{
    non_empty, Entity, EntityKind, EntitySpec, GroupProfile, GroupSpec, API_VERSION,
    DEFAULT_NAMESPACE,
};
use crate::{CatalogError, CatalogResult};

/// Every group is a team.
const GROUP_TYPE: &str = "team";

/// A team or other organizational unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    name: String,
    namespace: String,
    title: Option<String>,
    description: Option<String>,
    email: Option<String>,
    picture_url: Option<String>,
    grafana_dashboard_selector: Option<String>,
    children: Vec<String>,
    parent: Option<String>,
    members: Vec<String>,
    decorations: Decorations,
}

impl Group {
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
            email: None,
            picture_url: None,
            grafana_dashboard_selector: None,
            children: vec![],
            parent: None,
            members: vec![],
            decorations: Decorations::default(),
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        override_non_empty(&mut self.namespace, namespace);
        self
    }

    /// Also used as the profile display name.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(description);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_empty(email);
        self
    }

    pub fn with_picture_url(mut self, url: impl Into<String>) -> Self {
        self.picture_url = non_empty(url);
        self
    }

    pub fn with_grafana_dashboard_selector(mut self, selector: impl Into<String>) -> Self {
        self.grafana_dashboard_selector = non_empty(selector);
        self
    }

    /// Names of the groups directly below this one.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = non_empty(parent);
        self
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }
}

impl EntityBuilder for Group {
    fn decorations_mut(&mut self) -> &mut Decorations {
        &mut self.decorations
    }

    fn to_entity(&self) -> Entity {
        let mut metadata = self.decorations.metadata(
            &self.name,
            &self.namespace,
            self.title.as_ref(),
            self.description.as_ref(),
        );
        if let Some(selector) = &self.grafana_dashboard_selector {
            metadata
                .annotations
                .insert(GRAFANA_DASHBOARD_SELECTOR.to_string(), selector.clone());
        }

        let mut children = self.children.clone();
        children.sort();
        let mut members = self.members.clone();
        members.sort();

        Entity {
            api_version: API_VERSION.to_string(),
            kind: EntityKind::Group,
            metadata,
            spec: EntitySpec::Group(GroupSpec {
                group_type: GROUP_TYPE.to_string(),
                profile: GroupProfile {
                    display_name: self.title.clone(),
                    email: self.email.clone(),
                    picture: self.picture_url.clone(),
                },
                children,
                parent: self.parent.clone(),
                members,
            }),
        }
    }
}
