//! Patch primitives of the Group resource.

use crate::patch::interpreter::Patchable;
use crate::patch::path::ValueFilter;
use crate::patch::{MergeMode, scalar_text};
use crate::resource::collection::{append_unique, decode_entries, dedup, remove_matching};
use crate::resource::{Group, Member};
use log::{debug, warn};
use serde_json::Value;

impl Patchable for Group {
    const MULTI_VALUED: &'static [&'static str] = &["members"];

    fn merge_attribute(&mut self, name: &str, value: &Value, mode: MergeMode) -> Vec<String> {
        match name.to_ascii_lowercase().as_str() {
            "displayname" => {
                if let Some(text) = scalar_text(value) {
                    self.display_name = text;
                }
            }
            "externalid" => match value {
                Value::Null if mode == MergeMode::Replace => self.external_id = None,
                Value::Null => {}
                other => match scalar_text(other) {
                    Some(text) => self.external_id = Some(text),
                    None => warn!("Ignoring non-scalar value for 'externalId'"),
                },
            },
            "members" => {
                if value.is_null() {
                    if mode == MergeMode::Replace {
                        self.members.clear();
                    }
                    return Vec::new();
                }
                self.members = dedup(decode_entries::<Member>(name, value));
                return self.members.iter().map(|m| m.value.clone()).collect();
            }
            "id" | "meta" | "schemas" => {
                debug!("Ignoring patch of read-only attribute '{}'", name)
            }
            _ => debug!("Ignoring unknown Group attribute '{}'", name),
        }
        Vec::new()
    }

    fn add_to_collection(&mut self, name: &str, value: &Value) -> Vec<String> {
        if !name.eq_ignore_ascii_case("members") {
            debug!("Ignoring add to '{}'", name);
            return Vec::new();
        }
        append_unique(&mut self.members, decode_entries(name, value))
    }

    fn remove_from_collection(&mut self, name: &str, filter: &ValueFilter) -> usize {
        if !name.eq_ignore_ascii_case("members") {
            debug!("Ignoring filtered remove on '{}'", name);
            return 0;
        }
        remove_matching(&mut self.members, &filter.attribute, &filter.value)
    }

    fn members_mut(&mut self) -> Option<&mut Vec<Member>> {
        Some(&mut self.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{PatchOperation, apply};
    use crate::resolver::NoopResolver;
    use serde_json::json;

    #[test]
    fn test_merge_members_reports_all_values() {
        let mut group = Group::new("Eng");
        let introduced = group.merge_attribute(
            "members",
            &json!([{"value": "a"}, {"value": "b"}, {"value": "a"}]),
            MergeMode::Add,
        );
        assert_eq!(introduced, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(group.members.len(), 2);
    }

    #[tokio::test]
    async fn test_display_name_and_external_id() {
        let mut group = Group::new("Eng");
        group.external_id = Some("ext".to_string());

        let op = PatchOperation::replace(None, json!({"displayName": null, "externalId": null}));
        let group = apply(group, &op, &NoopResolver).await;
        assert_eq!(group.display_name, "Eng");
        assert!(group.external_id.is_none());

        let op = PatchOperation::replace(Some("displayName"), json!("Platform"));
        let group = apply(group, &op, &NoopResolver).await;
        assert_eq!(group.display_name, "Platform");
    }

    #[tokio::test]
    async fn test_remove_by_display() {
        let group = Group::new("Eng")
            .with_member(Member::new("a").with_display("alice"))
            .with_member(Member::new("b").with_display("bob"));

        let op = PatchOperation::remove(r#"members[display eq "bob"]"#);
        let group = apply(group, &op, &NoopResolver).await;
        assert!(group.has_member("a"));
        assert!(!group.has_member("b"));
    }

    #[tokio::test]
    async fn test_replace_members_with_null_clears() {
        let group = Group::new("Eng").with_member(Member::new("a"));
        let op = PatchOperation::replace(Some("members"), Value::Null);
        let group = apply(group, &op, &NoopResolver).await;
        assert!(group.members.is_empty());
    }
}
