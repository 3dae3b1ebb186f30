//! Resource metadata.
//!
//! `meta` is entirely server-managed: whatever a client sends is discarded and replaced
//! by the service on every write.

use crate::resource::ResourceKind;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// SCIM `meta` attribute (RFC 7643 Section 3.1).
///
/// Timestamps are optional on the wire so that client payloads carrying a partial `meta`
/// still decode; every stored resource has both set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Meta {
    /// Metadata for a resource created at `now`.
    pub fn for_creation(kind: ResourceKind, location: String, now: DateTime<Utc>) -> Self {
        Self {
            resource_type: kind.as_str().to_string(),
            created: Some(now),
            last_modified: Some(now),
            location: Some(location),
        }
    }

    /// Metadata after a modification at `now`.
    ///
    /// `created` is carried over untouched. `lastModified` never moves backwards, so a
    /// clock step between two writes cannot make it decrease.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        let last_modified = match self.last_modified {
            Some(previous) if previous > now => previous,
            _ => now,
        };

        Self {
            resource_type: self.resource_type.clone(),
            created: self.created.or(Some(now)),
            last_modified: Some(last_modified),
            location: self.location.clone(),
        }
    }
}

/// Current time at millisecond precision, the resolution timestamps are rendered with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
