//! Core operation handler infrastructure
//!
//! This module contains the request and response types and the dispatcher that routes a
//! request to the service of its resource kind.

use crate::config::ServiceConfig;
use crate::error::ScimStatus;
use crate::resource::{ListQuery, ResourceKind};
use crate::service::Directory;
use crate::storage::StorageProvider;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Framework-agnostic operation handler for directory operations
///
/// This handler provides a structured interface for performing SCIM operations
/// without being tied to any specific transport layer.
pub struct ScimOperationHandler<S> {
    pub(super) directory: Directory<S>,
}

/// Structured request for directory operations
#[derive(Debug, Clone, PartialEq)]
pub struct ScimOperationRequest {
    /// The type of operation to perform
    pub operation: ScimOperationType,
    /// The resource kind targeted
    pub resource_type: ResourceKind,
    /// Resource ID for operations that target a specific resource
    pub resource_id: Option<String>,
    /// Payload for create/replace (a resource) and patch (a PatchOp message)
    pub data: Option<Value>,
    /// Pagination for list operations
    pub query: Option<ListQuery>,
    /// Request ID for tracing and correlation
    pub request_id: Option<String>,
}

/// Types of operations supported by the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScimOperationType {
    /// List resources with pagination
    List,
    /// Get a specific resource by ID
    Get,
    /// Create a new resource
    Create,
    /// Replace a resource wholesale
    Replace,
    /// Apply a PatchOp message to a resource
    Patch,
    /// Delete a resource
    Delete,
}

/// Structured response from directory operations
#[derive(Debug, Clone, PartialEq)]
pub struct ScimOperationResponse {
    /// Outcome status
    pub status: ScimStatus,
    /// Resource, list response or SCIM error body. Absent for deletes.
    pub body: Option<Value>,
    /// Request ID for tracing
    pub request_id: String,
}

impl ScimOperationResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl<S: StorageProvider + Clone> ScimOperationHandler<S> {
    /// Create a new operation handler over a directory.
    pub fn new(directory: Directory<S>) -> Self {
        Self { directory }
    }

    /// Create a handler with a fresh directory over `storage`.
    pub fn with_storage(storage: S, config: ServiceConfig) -> Self {
        Self::new(Directory::new(storage, config))
    }

    /// Handle a structured request.
    ///
    /// Failures are rendered as a SCIM error body with the matching status; this never
    /// returns an error itself.
    pub async fn handle_operation(&self, request: ScimOperationRequest) -> ScimOperationResponse {
        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(
            "Operation handler processing {:?} for {} (request: '{}')",
            request.operation, request.resource_type, request_id
        );

        let result = match request.resource_type {
            ResourceKind::User => {
                super::handlers::dispatch(self.directory.users(), request, &request_id).await
            }
            ResourceKind::Group => {
                super::handlers::dispatch(self.directory.groups(), request, &request_id).await
            }
        };

        match &result {
            Ok(response) => {
                debug!(
                    "Operation handler completed with {} (request: '{}')",
                    response.status, request_id
                );
            }
            Err(e) => {
                warn!("Operation handler failed: {} (request: '{}')", e, request_id);
            }
        }

        result.unwrap_or_else(|e| super::errors::create_error_response(e, request_id))
    }

    /// Get access to the underlying directory.
    pub fn directory(&self) -> &Directory<S> {
        &self.directory
    }
}
