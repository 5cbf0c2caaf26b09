use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub const API_VERSION: &str = "backstage.io/v1alpha1";

pub const DEFAULT_NAMESPACE: &str = "default";

pub const DEFAULT_LIFECYCLE: &str = "production";

/// Placeholder for types and owners nobody declared.
pub const UNSPECIFIED: &str = "unspecified";

/// High-level entity type.
#[remain::sorted]
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Deserialize,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub enum EntityKind {
    #[serde(rename = "API")]
    #[strum(serialize = "API")]
    Api,
    Component,
    Group,
    Resource,
    User,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// An entity in the software catalog.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Version of the specification format for this particular entity.
    pub api_version: String,

    pub kind: EntityKind,

    pub metadata: EntityMetadata,

    pub spec: EntitySpec,
}

impl Entity {
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(
            self.kind,
            self.metadata
                .namespace
                .as_deref()
                .unwrap_or(DEFAULT_NAMESPACE),
            &self.metadata.name,
        )
    }
}

/// Fields common to all kinds of entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EntityMetadata {
    /// Must be unique within the catalog for any given namespace + kind pair.
    pub name: String,

    /// Left out when the entity lives in the default namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Display name, presented in user interfaces instead of `name` when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Identifying key/value pairs.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Non-identifying auxiliary key/value pairs.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<EntityLink>,
}

impl EntityMetadata {
    /// Tags may only use the characters a-z, 0-9, and -
    pub fn normalize_tags(&mut self) {
        for tag in self.tags.iter_mut() {
            *tag = normalize_tag(tag);
        }
    }
}

/// Lowercases the tag and rewrites every character outside `[a-z0-9-]` to `-`.
///
/// "My furious tag 1" becomes "my-furious-tag-1".
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect()
}

/// Link to external information that is related to the entity.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EntityLink {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Semantic key that represents a visual icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

impl EntityLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = non_empty(icon);
        self
    }

    pub fn with_type(mut self, link_type: impl Into<String>) -> Self {
        self.link_type = non_empty(link_type);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntitySpec {
    Api(ApiSpec),
    Component(ComponentSpec),
    Group(GroupSpec),
    Resource(ResourceSpec),
    User(UserSpec),
}

// https://backstage.io/docs/features/software-catalog/descriptor-format/#kind-component
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    pub component_type: String,

    pub lifecycle: String,

    /// Entity reference to the owner of the component.
    pub owner: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Entity references to the components this component depends on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    pub owner: String,

    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

// https://backstage.io/docs/features/software-catalog/descriptor-format#kind-api
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiSpec {
    /// Type of API definition, e.g. "openapi", "grpc" or "crd".
    #[serde(rename = "type")]
    pub api_type: String,

    pub lifecycle: String,

    pub owner: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The API definition itself. For CRDs this is the full manifest.
    pub definition: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSpec {
    #[serde(rename = "type")]
    pub group_type: String,

    #[serde(skip_serializing_if = "GroupProfile::is_empty")]
    pub profile: GroupProfile,

    /// Required by the catalog, so written even when empty.
    pub children: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl GroupProfile {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.picture.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    #[serde(skip_serializing_if = "UserProfile::is_empty")]
    pub profile: UserProfile,

    /// Required by the catalog, so written even when empty.
    pub member_of: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.picture.is_none()
    }
}

/// Identifies one entity by kind, namespace and name.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, namespace: &str, name: &str) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}/{}",
            self.kind.as_ref().to_lowercase(),
            self.namespace,
            self.name
        )
    }
}

/// Owner reference used when nobody claimed an entity.
pub fn default_owner(namespace: &str) -> String {
    format!("group:{namespace}/{UNSPECIFIED}")
}

pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub(crate) fn namespace_for_output(namespace: &str) -> Option<String> {
    if namespace == DEFAULT_NAMESPACE {
        None
    } else {
        Some(namespace.to_string())
    }
}
