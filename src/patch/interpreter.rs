//! Patch interpreter.
//!
//! [`apply`] maps one parsed operation onto the [`Patchable`] primitives of a resource:
//!
//! | op      | target            | effect                                       |
//! |---------|-------------------|----------------------------------------------|
//! | add     | none              | merge each fragment key, `null` ignored      |
//! | replace | none              | merge each fragment key, `null` clears       |
//! | add     | attribute         | merge that attribute                         |
//! | replace | attribute         | merge that attribute                         |
//! | add     | collection        | append entries not already present           |
//! | replace | collection        | replace the collection wholesale             |
//! | remove  | filtered          | drop every matching entry                    |
//!
//! Every other combination is a no-op for that operation.

use crate::patch::path::{PathExpression, ValueFilter};
use crate::patch::{MergeMode, PatchOpKind, PatchOperation, fragment};
use crate::resolver::{ReferenceResolver, enrich_members};
use crate::resource::{Member, ScimResource};
use log::{debug, warn};
use serde_json::{Map, Value};

/// Attribute-level mutation primitives of a resource kind.
///
/// Attribute names are matched case-insensitively. Each method returns what it changed
/// so the interpreter can decide on follow-up work (member enrichment).
pub trait Patchable: ScimResource {
    /// Names of the multi-valued attributes of this kind.
    const MULTI_VALUED: &'static [&'static str];

    /// Set or merge one top-level attribute. Returns the ids of members it introduced.
    fn merge_attribute(&mut self, name: &str, value: &Value, mode: MergeMode) -> Vec<String>;

    /// Append entries to a multi-valued attribute, skipping ones already present.
    /// Returns the ids of members it introduced.
    fn add_to_collection(&mut self, name: &str, value: &Value) -> Vec<String>;

    /// Remove entries of a multi-valued attribute matching `filter`. Returns the count.
    fn remove_from_collection(&mut self, name: &str, filter: &ValueFilter) -> usize;

    /// The member list, for kinds that have one.
    fn members_mut(&mut self) -> Option<&mut Vec<Member>> {
        None
    }
}

/// Apply one operation to `resource`, returning the updated document.
///
/// Members introduced by the operation that carry no `display` are enriched through
/// `resolver`.
pub async fn apply<T, R>(mut resource: T, operation: &PatchOperation, resolver: &R) -> T
where
    T: Patchable,
    R: ReferenceResolver,
{
    let path = match PathExpression::parse(operation.path.as_deref(), T::MULTI_VALUED) {
        Ok(path) => path,
        Err(e) => {
            warn!(
                "Ignoring {} operation on {}: malformed path {:?}: {}",
                operation.op,
                T::KIND,
                operation.path.as_deref().unwrap_or_default(),
                e
            );
            return resource;
        }
    };

    debug!("Applying {} '{}' to {}", operation.op, path, T::KIND);
    let introduced = match operation.op {
        PatchOpKind::Add => apply_set(&mut resource, &path, operation.value.as_ref(), MergeMode::Add),
        PatchOpKind::Replace => apply_set(
            &mut resource,
            &path,
            operation.value.as_ref(),
            MergeMode::Replace,
        ),
        PatchOpKind::Remove => {
            apply_remove(&mut resource, &path);
            Vec::new()
        }
    };

    if !introduced.is_empty() {
        if let Some(members) = resource.members_mut() {
            enrich_members(members, Some(&introduced), resolver).await;
        }
    }

    resource
}

/// Apply `operations` in order, each seeing the effect of the previous ones.
pub async fn apply_all<T, R>(resource: T, operations: &[PatchOperation], resolver: &R) -> T
where
    T: Patchable,
    R: ReferenceResolver,
{
    let mut resource = resource;
    for operation in operations {
        resource = apply(resource, operation, resolver).await;
    }
    resource
}

fn apply_set<T: Patchable>(
    resource: &mut T,
    path: &PathExpression,
    value: Option<&Value>,
    mode: MergeMode,
) -> Vec<String> {
    match path {
        PathExpression::Empty => {
            let Some(fields) = value.and_then(fragment) else {
                warn!("Ignoring {:?} without path: value is not an object", mode);
                return Vec::new();
            };
            merge_fragment(resource, &fields, mode)
        }
        PathExpression::Attribute(name) => {
            let Some(value) = value_or_null(value, mode) else {
                return Vec::new();
            };
            resource.merge_attribute(name, &value, mode)
        }
        PathExpression::SubAttribute {
            attribute,
            sub_attribute,
        } => {
            if is_multi_valued::<T>(attribute) {
                debug!("Ignoring sub-attribute path into collection '{}'", attribute);
                return Vec::new();
            }
            let Some(value) = value_or_null(value, mode) else {
                return Vec::new();
            };
            let mut nested = Map::new();
            nested.insert(sub_attribute.clone(), value);
            resource.merge_attribute(attribute, &Value::Object(nested), mode)
        }
        PathExpression::Collection(name) => {
            let Some(value) = value_or_null(value, mode) else {
                return Vec::new();
            };
            match mode {
                MergeMode::Add => resource.add_to_collection(name, &value),
                MergeMode::Replace => resource.merge_attribute(name, &value, mode),
            }
        }
        PathExpression::Filtered { collection, .. } => {
            debug!(
                "Filtered path on '{}' is only supported by remove, ignoring",
                collection
            );
            Vec::new()
        }
    }
}

fn apply_remove<T: Patchable>(resource: &mut T, path: &PathExpression) {
    match path {
        PathExpression::Filtered { collection, filter } => {
            let removed = resource.remove_from_collection(collection, filter);
            debug!(
                "Removed {} entries from '{}' where {} eq {:?}",
                removed, collection, filter.attribute, filter.value
            );
        }
        other => debug!("Unscoped remove of '{}' is not supported, ignoring", other),
    }
}

fn merge_fragment<T: Patchable>(
    resource: &mut T,
    fields: &Map<String, Value>,
    mode: MergeMode,
) -> Vec<String> {
    let mut introduced = Vec::new();
    for (name, value) in fields {
        introduced.extend(resource.merge_attribute(name, value, mode));
    }
    introduced
}

// A missing value means null for replace and nothing to do for add.
fn value_or_null(value: Option<&Value>, mode: MergeMode) -> Option<Value> {
    match (value, mode) {
        (Some(value), _) => Some(value.clone()),
        (None, MergeMode::Replace) => Some(Value::Null),
        (None, MergeMode::Add) => None,
    }
}

fn is_multi_valued<T: Patchable>(name: &str) -> bool {
    T::MULTI_VALUED.iter().any(|m| m.eq_ignore_ascii_case(name))
}
