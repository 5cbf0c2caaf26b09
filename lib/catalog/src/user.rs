use crate::builder::{override_non_empty, Decorations, EntityBuilder};
use crate::entity::{
    non_empty, Entity, EntityKind, EntitySpec, UserProfile, UserSpec, API_VERSION,
    DEFAULT_NAMESPACE,
};
use crate::{CatalogError, CatalogResult};

/// A person, usually keyed by their GitHub handle.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    name: String,
    namespace: String,
    title: Option<String>,
    description: Option<String>,
    email: Option<String>,
    picture_url: Option<String>,
    /// Group entity references.
    groups: Vec<String>,
    decorations: Decorations,
}

impl User {
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
            groups: vec![],
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

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

impl EntityBuilder for User {
    fn decorations_mut(&mut self) -> &mut Decorations {
        &mut self.decorations
    }

    fn to_entity(&self) -> Entity {
        let mut member_of = self.groups.clone();
        member_of.sort();

        Entity {
            api_version: API_VERSION.to_string(),
            kind: EntityKind::User,
            metadata: self.decorations.metadata(
                &self.name,
                &self.namespace,
                self.title.as_ref(),
                self.description.as_ref(),
            ),
            spec: EntitySpec::User(UserSpec {
                profile: UserProfile {
                    display_name: self.title.clone(),
                    email: self.email.clone(),
                    picture: self.picture_url.clone(),
                },
                member_of,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CatalogError, EntityBuilder, User};

    #[test]
    fn should_reject_empty_name() {
        assert!(matches!(User::new(""), Err(CatalogError::EmptyName)));
    }

    #[test]
    fn should_build_user_with_sorted_groups() {
        let user = User::new("jdoe")
            .unwrap()
            .with_title("Jane Doe")
            .with_email("jane@example.com")
            .with_groups(["group:default/team-zeta", "group:default/team-atlas"]);

        let yaml = serde_yaml::to_string(&user.to_entity()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["kind"], "User");
        assert!(value["metadata"].get("namespace").is_none());
        assert_eq!(value["metadata"]["title"], "Jane Doe");
        assert_eq!(value["spec"]["profile"]["displayName"], "Jane Doe");
        assert_eq!(value["spec"]["profile"]["email"], "jane@example.com");
        assert_eq!(value["spec"]["memberOf"][0], "group:default/team-atlas");
        assert_eq!(value["spec"]["memberOf"][1], "group:default/team-zeta");
    }

    #[test]
    fn should_always_write_member_of() {
        let user = User::new("jdoe").unwrap();
        let yaml = serde_yaml::to_string(&user.to_entity()).unwrap();
        assert!(yaml.contains("memberOf: []"));
    }
}
