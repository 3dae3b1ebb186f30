//! The Group resource (RFC 7643 Section 4.2).

use crate::resource::collection::CollectionEntry;
use crate::resource::{Meta, ResourceKind, ScimResource};
use serde::{Deserialize, Deserializer, Serialize};

fn default_group_schemas() -> Vec<String> {
    vec![ResourceKind::Group.schema().to_string()]
}

fn default_member_type() -> Option<String> {
    Some(Member::USER_TYPE.to_string())
}

/// An explicit `"members": null` means no members.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Member>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Member>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A directory group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default = "default_group_schemas")]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Group {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            schemas: default_group_schemas(),
            id: None,
            external_id: None,
            display_name: display_name.into(),
            members: Vec::new(),
            meta: None,
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Whether a member with the given `value` is present.
    pub fn has_member(&self, value: &str) -> bool {
        self.members.iter().any(|m| m.value == value)
    }
}

impl ScimResource for Group {
    const KIND: ResourceKind = ResourceKind::Group;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn unique_key(&self) -> &str {
        &self.display_name
    }

    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn set_meta(&mut self, meta: Meta) {
        self.meta = Some(meta);
    }
}

/// A weak reference from a group to a user (or group) id.
///
/// Nothing enforces that `value` points at an existing resource. `display` is filled in
/// from the referenced user's `userName` when the caller leaves it out and the reference
/// resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(
        rename = "type",
        default = "default_member_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_type: Option<String>,
    #[serde(
        rename = "$ref",
        alias = "ref",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<String>,
}

impl Member {
    pub const USER_TYPE: &'static str = "User";

    /// A user member with no display label yet.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: None,
            member_type: default_member_type(),
            reference: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

impl CollectionEntry for Member {
    fn key(&self) -> Option<&str> {
        Some(&self.value)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name.to_ascii_lowercase().as_str() {
            "value" => Some(self.value.clone()),
            "display" => self.display.clone(),
            "type" => self.member_type.clone(),
            "$ref" | "ref" => self.reference.clone(),
            _ => None,
        }
    }
}
