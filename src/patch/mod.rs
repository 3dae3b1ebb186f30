//! SCIM PATCH (RFC 7644 Section 3.5.2).
//!
//! A [`PatchRequest`] carries an ordered list of [`PatchOperation`]s. Each operation's path
//! is parsed by [`PathExpression::parse`] and the operation is then applied by the
//! [`interpreter`] to a typed resource through the [`Patchable`] trait. Failures local to
//! one operation (a malformed path, a value of the wrong shape) degrade to a no-op for
//! that operation and never abort the request.
//!
//! # Example
//!
//! ```rust
//! use scim_directory::patch::{PatchOpKind, PatchRequest};
//!
//! let request: PatchRequest = serde_json::from_str(r#"{
//!     "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
//!     "Operations": [
//!         {"op": "Add", "path": "members", "value": [{"value": "u1"}]},
//!         {"op": "remove", "path": "members[value eq \"u2\"]"}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(request.operations.len(), 2);
//! assert_eq!(request.operations[0].op, PatchOpKind::Add);
//! ```

pub mod group;
pub mod interpreter;
pub mod path;
pub mod user;

pub use interpreter::{Patchable, apply, apply_all};
pub use path::{PathError, PathExpression, ValueFilter};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

fn default_patch_schemas() -> Vec<String> {
    vec![PatchRequest::SCHEMA.to_string()]
}

/// PatchOp message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    #[serde(default = "default_patch_schemas")]
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", alias = "operations")]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: default_patch_schemas(),
            operations,
        }
    }
}

/// One add/replace/remove instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOpKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: Option<&str>, value: Value) -> Self {
        Self {
            op: PatchOpKind::Add,
            path: path.map(str::to_string),
            value: Some(value),
        }
    }

    pub fn replace(path: Option<&str>, value: Value) -> Self {
        Self {
            op: PatchOpKind::Replace,
            path: path.map(str::to_string),
            value: Some(value),
        }
    }

    pub fn remove(path: &str) -> Self {
        Self {
            op: PatchOpKind::Remove,
            path: Some(path.to_string()),
            value: None,
        }
    }
}

/// The operation verb. Parsed case-insensitively, rendered in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    Add,
    Replace,
    Remove,
}

impl FromStr for PatchOpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(PatchOpKind::Add),
            "replace" => Ok(PatchOpKind::Replace),
            "remove" => Ok(PatchOpKind::Remove),
            _ => Err(format!("Unsupported PATCH operation: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for PatchOpKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PatchOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatchOpKind::Add => "add",
            PatchOpKind::Replace => "replace",
            PatchOpKind::Remove => "remove",
        };
        f.write_str(s)
    }
}

/// How a value is merged into an existing attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Explicit `null` leaves the attribute untouched.
    Add,
    /// Explicit `null` clears optional attributes.
    Replace,
}

/// Text form of a scalar. Numbers and booleans are rendered, containers yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Boolean form of a scalar, accepting `"true"`/`"false"` in any case.
pub fn scalar_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// The partial document carried by a no-path add/replace.
///
/// Some clients send the object serialized as a JSON string; that form is parsed too.
pub fn fragment(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(raw) => match serde_json::from_str(raw) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}
