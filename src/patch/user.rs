//! Patch primitives of the User resource.

use crate::patch::interpreter::Patchable;
use crate::patch::path::ValueFilter;
use crate::patch::{MergeMode, scalar_bool, scalar_text};
use crate::resource::collection::{append_unique, decode_entries, remove_matching};
use crate::resource::{CollectionEntry, Name, User};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

impl Patchable for User {
    const MULTI_VALUED: &'static [&'static str] = &[
        "emails",
        "phoneNumbers",
        "ims",
        "photos",
        "addresses",
        "groups",
        "entitlements",
        "roles",
        "x509Certificates",
    ];

    fn merge_attribute(&mut self, name: &str, value: &Value, mode: MergeMode) -> Vec<String> {
        match name.to_ascii_lowercase().as_str() {
            "username" => {
                // required, so null never clears it
                if let Some(text) = scalar_text(value) {
                    self.user_name = text;
                }
            }
            "active" => match scalar_bool(value) {
                Some(active) => self.active = active,
                None if value.is_null() => {}
                None => warn!("Ignoring non-boolean 'active' value {}", value),
            },
            "displayname" => set_optional(&mut self.display_name, name, value, mode),
            "externalid" => set_optional(&mut self.external_id, name, value, mode),
            "nickname" => set_optional(&mut self.nick_name, name, value, mode),
            "profileurl" => set_optional(&mut self.profile_url, name, value, mode),
            "title" => set_optional(&mut self.title, name, value, mode),
            "usertype" => set_optional(&mut self.user_type, name, value, mode),
            "preferredlanguage" => set_optional(&mut self.preferred_language, name, value, mode),
            "locale" => set_optional(&mut self.locale, name, value, mode),
            "timezone" => set_optional(&mut self.timezone, name, value, mode),
            "name" => merge_name(&mut self.name, value, mode),
            "emails" => replace_collection(&mut self.emails, name, value, mode),
            "phonenumbers" => replace_collection(&mut self.phone_numbers, name, value, mode),
            "ims" => replace_collection(&mut self.ims, name, value, mode),
            "photos" => replace_collection(&mut self.photos, name, value, mode),
            "addresses" => replace_collection(&mut self.addresses, name, value, mode),
            "entitlements" => replace_collection(&mut self.entitlements, name, value, mode),
            "roles" => replace_collection(&mut self.roles, name, value, mode),
            "x509certificates" => {
                replace_collection(&mut self.x509_certificates, name, value, mode)
            }
            "id" | "meta" | "schemas" | "groups" => {
                debug!("Ignoring patch of read-only attribute '{}'", name)
            }
            _ => debug!("Ignoring unknown User attribute '{}'", name),
        }
        Vec::new()
    }

    fn add_to_collection(&mut self, name: &str, value: &Value) -> Vec<String> {
        match name.to_ascii_lowercase().as_str() {
            "emails" => append(&mut self.emails, name, value),
            "phonenumbers" => append(&mut self.phone_numbers, name, value),
            "ims" => append(&mut self.ims, name, value),
            "photos" => append(&mut self.photos, name, value),
            "addresses" => append(&mut self.addresses, name, value),
            "entitlements" => append(&mut self.entitlements, name, value),
            "roles" => append(&mut self.roles, name, value),
            "x509certificates" => append(&mut self.x509_certificates, name, value),
            _ => debug!("Ignoring add to '{}'", name),
        }
        Vec::new()
    }

    fn remove_from_collection(&mut self, name: &str, filter: &ValueFilter) -> usize {
        let (attribute, literal) = (filter.attribute.as_str(), filter.value.as_str());
        match name.to_ascii_lowercase().as_str() {
            "emails" => remove_matching(&mut self.emails, attribute, literal),
            "phonenumbers" => remove_matching(&mut self.phone_numbers, attribute, literal),
            "ims" => remove_matching(&mut self.ims, attribute, literal),
            "photos" => remove_matching(&mut self.photos, attribute, literal),
            "addresses" => remove_matching(&mut self.addresses, attribute, literal),
            "entitlements" => remove_matching(&mut self.entitlements, attribute, literal),
            "roles" => remove_matching(&mut self.roles, attribute, literal),
            "x509certificates" => remove_matching(&mut self.x509_certificates, attribute, literal),
            _ => {
                debug!("Ignoring filtered remove on '{}'", name);
                0
            }
        }
    }
}

fn set_optional(slot: &mut Option<String>, name: &str, value: &Value, mode: MergeMode) {
    match value {
        Value::Null => {
            if mode == MergeMode::Replace {
                *slot = None;
            }
        }
        other => match scalar_text(other) {
            Some(text) => *slot = Some(text),
            None => warn!("Ignoring non-scalar value for '{}'", name),
        },
    }
}

// Non-null components override, null or absent components are kept.
fn merge_name(slot: &mut Option<Name>, value: &Value, mode: MergeMode) {
    match value {
        Value::Null => {
            if mode == MergeMode::Replace {
                *slot = None;
            }
        }
        Value::Object(fields) => {
            let name = slot.get_or_insert_with(Name::default);
            for (component, value) in fields {
                let Some(target) = name.component_mut(component) else {
                    debug!("Ignoring unknown name component '{}'", component);
                    continue;
                };
                if let Some(text) = scalar_text(value) {
                    *target = Some(text);
                }
            }
            if name.is_empty() {
                *slot = None;
            }
        }
        other => warn!("Ignoring non-object value for 'name': {}", other),
    }
}

fn replace_collection<T: DeserializeOwned>(
    target: &mut Vec<T>,
    name: &str,
    value: &Value,
    mode: MergeMode,
) {
    if value.is_null() {
        if mode == MergeMode::Replace {
            target.clear();
        }
        return;
    }
    *target = decode_entries(name, value);
}

fn append<T: DeserializeOwned + CollectionEntry>(target: &mut Vec<T>, name: &str, value: &Value) {
    append_unique(target, decode_entries(name, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{PatchOperation, apply, apply_all};
    use crate::resolver::NoopResolver;
    use crate::resource::{Member, MultiValuedAttribute};
    use serde_json::json;

    fn alice() -> User {
        let mut user = User::new("alice").with_email("alice@work.example", Some("work"));
        user.display_name = Some("Alice".to_string());
        user.name = Some(Name {
            given_name: Some("Alice".to_string()),
            family_name: Some("Liddell".to_string()),
            ..Name::default()
        });
        user
    }

    #[tokio::test]
    async fn test_no_path_add_merges_name_fieldwise() {
        let op = PatchOperation::add(
            None,
            json!({"name": {"givenName": "Alicia", "familyName": null}, "title": "CTO"}),
        );
        let user = apply(alice(), &op, &NoopResolver).await;

        let name = user.name.unwrap();
        assert_eq!(name.given_name.as_deref(), Some("Alicia"));
        assert_eq!(name.family_name.as_deref(), Some("Liddell"));
        assert_eq!(user.title.as_deref(), Some("CTO"));
    }

    #[tokio::test]
    async fn test_null_handling_depends_on_mode() {
        let add = PatchOperation::add(None, json!({"displayName": null, "emails": null}));
        let user = apply(alice(), &add, &NoopResolver).await;
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert_eq!(user.emails.len(), 1);

        let replace = PatchOperation::replace(
            None,
            json!({"displayName": null, "emails": null, "userName": null, "active": null}),
        );
        let user = apply(alice(), &replace, &NoopResolver).await;
        assert!(user.display_name.is_none());
        assert!(user.emails.is_empty());
        assert_eq!(user.user_name, "alice");
        assert!(user.active);
    }

    #[tokio::test]
    async fn test_collection_add_and_filtered_remove() {
        let ops = vec![
            PatchOperation::add(
                Some("emails"),
                json!([
                    {"value": "alice@home.example", "type": "home"},
                    {"value": "alice@work.example", "type": "work"}
                ]),
            ),
            PatchOperation::add(Some("phoneNumbers"), json!({"value": "555-0100"})),
        ];
        let user = apply_all(alice(), &ops, &NoopResolver).await;
        assert_eq!(user.emails.len(), 2);
        assert_eq!(user.phone_numbers[0].value, "555-0100");

        let remove = PatchOperation::remove(r#"emails[type eq "work"]"#);
        let user = apply(user, &remove, &NoopResolver).await;
        let values: Vec<_> = user.emails.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["alice@home.example"]);
    }

    #[tokio::test]
    async fn test_paths_and_coercion() {
        let ops = vec![
            PatchOperation::replace(Some("active"), json!("False")),
            PatchOperation::replace(Some("name.middleName"), json!("P.")),
            PatchOperation::replace(Some("externalId"), json!(42)),
            PatchOperation::replace(Some("USERNAME"), json!("alice2")),
        ];
        let user = apply_all(alice(), &ops, &NoopResolver).await;
        assert!(!user.active);
        assert_eq!(user.name.unwrap().middle_name.as_deref(), Some("P."));
        assert_eq!(user.external_id.as_deref(), Some("42"));
        assert_eq!(user.user_name, "alice2");
    }

    #[tokio::test]
    async fn test_stringified_fragment() {
        let op = PatchOperation::replace(None, json!("{\"nickName\": \"Al\"}"));
        let user = apply(alice(), &op, &NoopResolver).await;
        assert_eq!(user.nick_name.as_deref(), Some("Al"));
    }

    #[tokio::test]
    async fn test_read_only_attributes_are_ignored() {
        let mut user = alice();
        user.id = Some("fixed".to_string());
        user.groups.push(Member::new("g1"));

        let op = PatchOperation::replace(
            None,
            json!({"id": "other", "groups": [], "meta": {"resourceType": "Group"}}),
        );
        let patched = apply(user.clone(), &op, &NoopResolver).await;
        assert_eq!(patched, user);

        let op = PatchOperation::add(Some("groups"), json!({"value": "g2"}));
        assert_eq!(apply(user.clone(), &op, &NoopResolver).await, user);
    }

    #[tokio::test]
    async fn test_unscoped_remove_is_inert() {
        let op = PatchOperation::remove("emails");
        let user = apply(alice(), &op, &NoopResolver).await;
        assert_eq!(
            user.emails,
            vec![MultiValuedAttribute {
                value_type: Some("work".to_string()),
                ..MultiValuedAttribute::new("alice@work.example")
            }]
        );
    }
}
