//! Pagination request and the SCIM ListResponse envelope.

use crate::config::ServiceConfig;
use serde::{Deserialize, Serialize};

/// Paging parameters of a list request, as received from the caller.
///
/// Values are kept signed so that out-of-range input (`startIndex=0`, `count=-5`) can be
/// normalised instead of rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

impl ListQuery {
    pub fn new(start_index: Option<i64>, count: Option<i64>) -> Self {
        Self { start_index, count }
    }

    /// Parse raw query-string values. Unparseable values count as absent.
    pub fn from_params(start_index: Option<&str>, count: Option<&str>) -> Self {
        Self {
            start_index: start_index.and_then(|s| s.trim().parse().ok()),
            count: count.and_then(|s| s.trim().parse().ok()),
        }
    }

    /// 1-based start index, clamped to at least 1.
    pub fn start_index(&self) -> usize {
        self.start_index
            .map(|start| usize::try_from(start.max(1)).unwrap_or(usize::MAX))
            .unwrap_or(1)
    }

    /// Page size after clamping negatives to zero and applying the configured default and
    /// ceiling.
    pub fn count(&self, config: &ServiceConfig) -> usize {
        let requested = self
            .count
            .map(|count| usize::try_from(count.max(0)).unwrap_or(usize::MAX));
        config.effective_count(requested)
    }
}

/// SCIM ListResponse (RFC 7644 Section 3.4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub schemas: Vec<String>,
    pub total_results: usize,
    pub start_index: usize,
    pub items_per_page: usize,
    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";

    /// Build a page; `itemsPerPage` is the number of resources actually returned.
    pub fn new(resources: Vec<T>, total_results: usize, start_index: usize) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            total_results,
            start_index,
            items_per_page: resources.len(),
            resources,
        }
    }
}
