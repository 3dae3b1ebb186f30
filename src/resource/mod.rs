//! Typed SCIM resource documents.
//!
//! The two resource kinds, [`User`] and [`Group`], are plain serde structs using the SCIM
//! attribute names on the wire. [`ScimResource`] is the abstraction the generic service
//! layer is written against: it exposes the server-managed fields (`id`, `meta`) and the
//! uniqueness key of each kind.
//!
//! # Key Components
//!
//! * [`User`] / [`Group`] - resource documents
//! * [`Member`] - weak reference from a group to a user or group id
//! * [`Meta`] - server-stamped metadata
//! * [`ListQuery`] / [`ListResponse`] - pagination request and response envelope
//! * [`collection`] - shared handling of multi-valued attributes

pub mod collection;
pub mod group;
pub mod list;
pub mod meta;
pub mod user;

pub use collection::CollectionEntry;
pub use group::{Group, Member};
pub use list::{ListQuery, ListResponse};
pub use meta::Meta;
pub use user::{Address, MultiValuedAttribute, Name, User};

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// The kinds of resource exposed by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Group,
}

impl ResourceKind {
    /// Resource type name used in `meta.resourceType`.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::User => "User",
            ResourceKind::Group => "Group",
        }
    }

    /// Endpoint segment used in `meta.location`.
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::User => "Users",
            ResourceKind::Group => "Groups",
        }
    }

    /// Core schema URI of the kind.
    pub fn schema(self) -> &'static str {
        match self {
            ResourceKind::User => "urn:ietf:params:scim:schemas:core:2.0:User",
            ResourceKind::Group => "urn:ietf:params:scim:schemas:core:2.0:Group",
        }
    }

    /// Name of the attribute that must be unique across all resources of the kind.
    pub fn unique_attribute(self) -> &'static str {
        match self {
            ResourceKind::User => "userName",
            ResourceKind::Group => "displayName",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts the type name or the endpoint name, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "users" => Ok(ResourceKind::User),
            "group" | "groups" => Ok(ResourceKind::Group),
            _ => Err(format!("Unsupported resource type: {}", s)),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of every resource kind.
pub trait ScimResource:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    const KIND: ResourceKind;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Value of the uniqueness key (`userName` or `displayName`).
    fn unique_key(&self) -> &str;

    fn meta(&self) -> Option<&Meta>;

    fn set_meta(&mut self, meta: Meta);
}

/// Canonical form of a resource id: a UUID in lowercase hyphenated notation.
///
/// Returns `None` for anything that is not a UUID, which callers treat as "no such
/// resource" rather than as a client error.
pub fn normalize_id(raw: &str) -> Option<String> {
    uuid::Uuid::parse_str(raw.trim())
        .ok()
        .map(|id| id.hyphenated().to_string())
}
