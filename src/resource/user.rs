//! The User resource (RFC 7643 Section 4.1).

use crate::resource::collection::CollectionEntry;
use crate::resource::group::Member;
use crate::resource::{Meta, ResourceKind, ScimResource};
use serde::{Deserialize, Serialize};

fn default_user_schemas() -> Vec<String> {
    vec![ResourceKind::User.schema().to_string()]
}

fn default_active() -> bool {
    true
}

/// A directory user.
///
/// Only `userName` is required. Unknown attributes in a payload (including `password`,
/// which the directory never stores) are ignored on decode.
///
/// ```rust
/// use scim_directory::resource::User;
///
/// let user: User = serde_json::from_str(r#"{"userName": "alice@example.com"}"#).unwrap();
/// assert!(user.active);
/// assert!(user.id.is_none());
/// assert_eq!(user.schemas, vec!["urn:ietf:params:scim:schemas:core:2.0:User"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default = "default_user_schemas")]
    pub schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ims: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    /// Groups the user belongs to. Read-only: dropped on create and replace, ignored by patch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Member>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entitlements: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x509_certificates: Vec<MultiValuedAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl User {
    /// A minimal active user with the given `userName`.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            schemas: default_user_schemas(),
            id: None,
            external_id: None,
            user_name: user_name.into(),
            name: None,
            display_name: None,
            nick_name: None,
            profile_url: None,
            title: None,
            user_type: None,
            preferred_language: None,
            locale: None,
            timezone: None,
            active: true,
            emails: Vec::new(),
            phone_numbers: Vec::new(),
            ims: Vec::new(),
            photos: Vec::new(),
            addresses: Vec::new(),
            groups: Vec::new(),
            entitlements: Vec::new(),
            roles: Vec::new(),
            x509_certificates: Vec::new(),
            meta: None,
        }
    }

    /// Builder-style helper adding one email.
    pub fn with_email(mut self, value: impl Into<String>, email_type: Option<&str>) -> Self {
        let mut email = MultiValuedAttribute::new(value);
        email.value_type = email_type.map(str::to_string);
        self.emails.push(email);
        self
    }
}

impl ScimResource for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn unique_key(&self) -> &str {
        &self.user_name
    }

    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn set_meta(&mut self, meta: Meta) {
        self.meta = Some(meta);
    }
}

/// The components of a user's real name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,
}

impl Name {
    /// Mutable slot of a component by its attribute name, compared case-insensitively.
    pub fn component_mut(&mut self, attribute: &str) -> Option<&mut Option<String>> {
        let slot = match attribute.to_ascii_lowercase().as_str() {
            "formatted" => &mut self.formatted,
            "familyname" => &mut self.family_name,
            "givenname" => &mut self.given_name,
            "middlename" => &mut self.middle_name,
            "honorificprefix" => &mut self.honorific_prefix,
            "honorificsuffix" => &mut self.honorific_suffix,
            _ => return None,
        };
        Some(slot)
    }

    pub fn is_empty(&self) -> bool {
        *self == Name::default()
    }
}

/// A generic multi-valued attribute entry (emails, phoneNumbers, roles, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiValuedAttribute {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

impl MultiValuedAttribute {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display: None,
            value_type: None,
            primary: false,
        }
    }
}

impl CollectionEntry for MultiValuedAttribute {
    fn key(&self) -> Option<&str> {
        Some(&self.value)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name.to_ascii_lowercase().as_str() {
            "value" => Some(self.value.clone()),
            "display" => self.display.clone(),
            "type" => self.value_type.clone(),
            "primary" => Some(self.primary.to_string()),
            _ => None,
        }
    }
}

/// A physical mailing address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

impl CollectionEntry for Address {
    // addresses have no natural key, so no de-duplication applies
    fn key(&self) -> Option<&str> {
        None
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name.to_ascii_lowercase().as_str() {
            "formatted" => self.formatted.clone(),
            "streetaddress" => self.street_address.clone(),
            "locality" => self.locality.clone(),
            "region" => self.region.clone(),
            "postalcode" => self.postal_code.clone(),
            "country" => self.country.clone(),
            "type" => self.address_type.clone(),
            "primary" => Some(self.primary.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_profile_round_trip() {
        let payload = json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
            "userName": "bjensen",
            "externalId": "ext-1",
            "name": {"givenName": "Barbara", "familyName": "Jensen"},
            "emails": [{"value": "bjensen@example.com", "type": "work", "primary": true}],
            "addresses": [{"locality": "Hollywood", "postalCode": "91608", "type": "home"}],
            "x509Certificates": [{"value": "MIIDQzCC"}],
            "active": false,
            "password": "t1meMa$heen"
        });

        let user: User = serde_json::from_value(payload).unwrap();
        assert_eq!(user.name.as_ref().unwrap().given_name.as_deref(), Some("Barbara"));
        assert!(user.emails[0].primary);
        assert_eq!(user.addresses[0].postal_code.as_deref(), Some("91608"));
        assert!(!user.active);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("phoneNumbers").is_none());
        assert_eq!(json["x509Certificates"][0]["value"], "MIIDQzCC");
        assert_eq!(json["emails"][0]["type"], "work");
    }

    #[test]
    fn test_missing_user_name_is_rejected() {
        let result: Result<User, _> = serde_json::from_value(json!({"displayName": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_name_component_lookup() {
        let mut name = Name::default();
        *name.component_mut("GIVENNAME").unwrap() = Some("Ann".to_string());
        assert_eq!(name.given_name.as_deref(), Some("Ann"));
        assert!(name.component_mut("nickname").is_none());
        assert!(!name.is_empty());
    }

    #[test]
    fn test_entry_attributes() {
        let email = MultiValuedAttribute::new("a@example.com");
        assert_eq!(email.attribute("Value").as_deref(), Some("a@example.com"));
        assert_eq!(email.attribute("primary").as_deref(), Some("false"));
        assert!(email.attribute("type").is_none());
    }
}
