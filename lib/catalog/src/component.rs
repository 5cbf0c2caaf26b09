use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::annotations::{
    CIRCLECI_PROJECT_SLUG, DEPLOYMENT_NAMES, GITHUB_PROJECT_SLUG, GITHUB_TEAM_SLUG, KUBERNETES_ID,
    LATEST_RELEASE_DATE, LATEST_RELEASE_TAG, SOURCE_LOCATION, TECHDOCS_REF,
};
use crate::builder::{override_non_empty, Decorations, EntityBuilder};
use crate::entity::{
    default_owner, non_empty, ComponentSpec, Entity, EntityKind, EntitySpec, API_VERSION,
    DEFAULT_LIFECYCLE, DEFAULT_NAMESPACE, UNSPECIFIED,
};
use crate::{CatalogError, CatalogResult};

/// Component type that gets a `backstage.io/kubernetes-id` annotation.
const SERVICE_TYPE: &str = "service";

/// A piece of software, such as a service, library or chart, on its way to becoming a
/// `Component` entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    name: String,
    namespace: String,
    title: Option<String>,
    description: Option<String>,
    component_type: String,
    lifecycle: String,
    /// Full entity reference. Falls back to the namespace's unspecified group.
    owner: Option<String>,
    system: Option<String>,
    depends_on: Vec<String>,

    /// "<organization>/<repository>"
    github_project_slug: Option<String>,
    github_team_slug: Option<String>,
    has_readme: bool,
    default_branch: Option<String>,
    latest_release_tag: Option<String>,
    latest_release_time: Option<DateTime<FixedOffset>>,
    circleci_slug: Option<String>,
    deployment_names: Vec<String>,
    kubernetes_id: Option<String>,

    decorations: Decorations,
}

impl Component {
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
            component_type: UNSPECIFIED.to_string(),
            lifecycle: DEFAULT_LIFECYCLE.to_string(),
            owner: None,
            system: None,
            depends_on: vec![],
            github_project_slug: None,
            github_team_slug: None,
            has_readme: false,
            default_branch: None,
            latest_release_tag: None,
            latest_release_time: None,
            circleci_slug: None,
            deployment_names: vec![],
            kubernetes_id: None,
            decorations: Decorations::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The owner reference that will be written, with the default applied.
    pub fn owner(&self) -> String {
        self.owner
            .clone()
            .unwrap_or_else(|| default_owner(&self.namespace))
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

    pub fn with_type(mut self, component_type: impl Into<String>) -> Self {
        override_non_empty(&mut self.component_type, component_type);
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

    /// Names of the components this one depends on, without the `component:` prefix.
    pub fn with_depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_github_project_slug(mut self, slug: impl Into<String>) -> Self {
        self.github_project_slug = non_empty(slug);
        self
    }

    pub fn with_github_team_slug(mut self, slug: impl Into<String>) -> Self {
        self.github_team_slug = non_empty(slug);
        self
    }

    pub fn with_readme(mut self, has_readme: bool) -> Self {
        self.has_readme = has_readme;
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = non_empty(branch);
        self
    }

    pub fn with_latest_release_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_release_tag = non_empty(tag);
        self
    }

    pub fn with_latest_release_time(mut self, time: Option<DateTime<FixedOffset>>) -> Self {
        self.latest_release_time = time;
        self
    }

    pub fn with_circleci_slug(mut self, slug: impl Into<String>) -> Self {
        self.circleci_slug = non_empty(slug);
        self
    }

    pub fn with_deployment_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deployment_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Only used for components of type `service`.
    pub fn with_kubernetes_id(mut self, id: impl Into<String>) -> Self {
        self.kubernetes_id = non_empty(id);
        self
    }
}

impl EntityBuilder for Component {
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

        let annotations = &mut metadata.annotations;
        if let Some(slug) = &self.github_project_slug {
            annotations.insert(GITHUB_PROJECT_SLUG.to_string(), slug.clone());
            annotations.insert(
                SOURCE_LOCATION.to_string(),
                format!("url:https://github.com/{slug}"),
            );
            if let Some(branch) = self.default_branch.as_ref().filter(|_| self.has_readme) {
                annotations.insert(
                    TECHDOCS_REF.to_string(),
                    format!("url:https://github.com/{slug}/tree/{branch}"),
                );
            }
        }
        if let Some(slug) = &self.github_team_slug {
            annotations.insert(GITHUB_TEAM_SLUG.to_string(), slug.clone());
        }
        if let Some(tag) = &self.latest_release_tag {
            annotations.insert(LATEST_RELEASE_TAG.to_string(), tag.clone());
        }
        if let Some(time) = &self.latest_release_time {
            annotations.insert(
                LATEST_RELEASE_DATE.to_string(),
                time.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        if let Some(slug) = &self.circleci_slug {
            annotations.insert(CIRCLECI_PROJECT_SLUG.to_string(), slug.clone());
        }
        if !self.deployment_names.is_empty() {
            let mut names = self.deployment_names.clone();
            names.sort();
            annotations.insert(DEPLOYMENT_NAMES.to_string(), names.join(","));
        }
        if self.component_type == SERVICE_TYPE {
            let id = self.kubernetes_id.as_ref().unwrap_or(&self.name);
            annotations.insert(KUBERNETES_ID.to_string(), id.clone());
        }

        let mut depends_on = self.depends_on.clone();
        depends_on.sort();

        Entity {
            api_version: API_VERSION.to_string(),
            kind: EntityKind::Component,
            metadata,
            spec: EntitySpec::Component(ComponentSpec {
                component_type: self.component_type.clone(),
                lifecycle: self.lifecycle.clone(),
                owner: self.owner(),
                system: self.system.clone(),
                depends_on: depends_on
                    .into_iter()
                    .map(|name| format!("component:{name}"))
                    .collect(),
            }),
        }
    }
}
