//! Shared handling of multi-valued attributes.
//!
//! Every entry type of a multi-valued attribute implements [`CollectionEntry`], which is
//! all the patch engine needs to append idempotently and to evaluate a
//! `collection[attr eq "literal"]` filter.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

/// An entry of a multi-valued attribute.
pub trait CollectionEntry {
    /// Relationship key used for de-duplication, if the entry type has one.
    fn key(&self) -> Option<&str>;

    /// Text value of a sub-attribute, for filter evaluation. Names are matched
    /// case-insensitively.
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Decode a patch value into collection entries.
///
/// Accepts a single object or an array of objects. Entries that do not decode are skipped
/// with a warning rather than failing the whole operation.
pub fn decode_entries<T: DeserializeOwned>(attribute: &str, value: &Value) -> Vec<T> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        Value::Null => Vec::new(),
        other => {
            warn!("Ignoring non-object value for '{}': {}", attribute, other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed '{}' entry {}: {}", attribute, item, e);
                None
            }
        })
        .collect()
}

/// Append `entries`, skipping any whose key is already present.
///
/// Returns the keys of the entries actually appended.
pub fn append_unique<T: CollectionEntry>(target: &mut Vec<T>, entries: Vec<T>) -> Vec<String> {
    let mut seen: HashSet<String> = target
        .iter()
        .filter_map(|e| e.key().map(str::to_string))
        .collect();
    let mut appended = Vec::new();

    for entry in entries {
        if let Some(key) = entry.key() {
            if !seen.insert(key.to_string()) {
                continue;
            }
            appended.push(key.to_string());
        }
        target.push(entry);
    }

    appended
}

/// Drop later entries sharing a key with an earlier one, preserving order.
pub fn dedup<T: CollectionEntry>(entries: Vec<T>) -> Vec<T> {
    let mut deduped = Vec::with_capacity(entries.len());
    append_unique(&mut deduped, entries);
    deduped
}

/// Remove every entry whose `attribute` equals `literal`. Returns how many were removed.
pub fn remove_matching<T: CollectionEntry>(
    target: &mut Vec<T>,
    attribute: &str,
    literal: &str,
) -> usize {
    let before = target.len();
    target.retain(|entry| entry.attribute(attribute).as_deref() != Some(literal));
    before - target.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Member, MultiValuedAttribute};
    use serde_json::json;

    #[test]
    fn test_decode_single_and_array() {
        let single: Vec<Member> = decode_entries("members", &json!({"value": "u1"}));
        assert_eq!(single.len(), 1);

        let many: Vec<Member> = decode_entries(
            "members",
            &json!([{"value": "u1"}, {"display": "no value"}, {"value": "u2"}]),
        );
        let values: Vec<_> = many.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["u1", "u2"]);

        let scalar: Vec<Member> = decode_entries("members", &json!("u1"));
        assert!(scalar.is_empty());
    }

    #[test]
    fn test_append_unique_is_idempotent() {
        let mut members = vec![Member::new("a")];
        let appended = append_unique(
            &mut members,
            vec![Member::new("a"), Member::new("b"), Member::new("b")],
        );
        assert_eq!(appended, vec!["b".to_string()]);
        assert_eq!(members.len(), 2);

        let again = append_unique(&mut members, vec![Member::new("b")]);
        assert!(again.is_empty());
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let deduped = dedup(vec![
            Member::new("a").with_display("first"),
            Member::new("a").with_display("second"),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].display.as_deref(), Some("first"));
    }

    #[test]
    fn test_remove_matching() {
        let mut members = vec![Member::new("A"), Member::new("B"), Member::new("C")];
        assert_eq!(remove_matching(&mut members, "value", "B"), 1);
        assert_eq!(remove_matching(&mut members, "value", "B"), 0);
        let values: Vec<_> = members.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["A", "C"]);

        let mut emails = vec![
            MultiValuedAttribute {
                value_type: Some("work".to_string()),
                ..MultiValuedAttribute::new("w@example.com")
            },
            MultiValuedAttribute::new("h@example.com"),
        ];
        assert_eq!(remove_matching(&mut emails, "type", "work"), 1);
        assert_eq!(emails[0].value, "h@example.com");
    }
}
