// https://backstage.io/docs/features/software-catalog/descriptor-format

use thiserror::Error;

pub mod annotations;
mod api;
mod builder;
mod component;
mod entity;
mod export;
mod group;
mod resource;
mod user;

pub use api::Api;
pub use builder::{Decorations, EntityBuilder};
pub use component::Component;
pub use entity::{
    default_owner, normalize_tag, ApiSpec, ComponentSpec, Entity, EntityKind, EntityLink,
    EntityMetadata, EntityRef, EntitySpec, GroupProfile, GroupSpec, ResourceSpec, UserProfile,
    UserSpec, API_VERSION, DEFAULT_LIFECYCLE, DEFAULT_NAMESPACE, UNSPECIFIED,
};
pub use export::Export;
pub use group::Group;
pub use resource::Resource;
pub use user::User;

#[remain::sorted]
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml serialize error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
