//! Builder methods for ScimOperationRequest

use crate::operation_handler::core::{ScimOperationRequest, ScimOperationType};
use crate::resource::{ListQuery, ResourceKind};
use serde_json::Value;

impl ScimOperationRequest {
    fn new(
        operation: ScimOperationType,
        resource_type: ResourceKind,
        resource_id: Option<String>,
        data: Option<Value>,
    ) -> Self {
        Self {
            operation,
            resource_type,
            resource_id,
            data,
            query: None,
            request_id: None,
        }
    }

    /// Create a new list operation request.
    pub fn list(resource_type: ResourceKind) -> Self {
        Self::new(ScimOperationType::List, resource_type, None, None)
    }

    /// Create a new get operation request.
    pub fn get(resource_type: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self::new(
            ScimOperationType::Get,
            resource_type,
            Some(resource_id.into()),
            None,
        )
    }

    /// Create a new create operation request.
    pub fn create(resource_type: ResourceKind, data: Value) -> Self {
        Self::new(ScimOperationType::Create, resource_type, None, Some(data))
    }

    /// Create a new replace operation request.
    pub fn replace(
        resource_type: ResourceKind,
        resource_id: impl Into<String>,
        data: Value,
    ) -> Self {
        Self::new(
            ScimOperationType::Replace,
            resource_type,
            Some(resource_id.into()),
            Some(data),
        )
    }

    /// Create a new patch operation request. `data` is a PatchOp message.
    pub fn patch(resource_type: ResourceKind, resource_id: impl Into<String>, data: Value) -> Self {
        Self::new(
            ScimOperationType::Patch,
            resource_type,
            Some(resource_id.into()),
            Some(data),
        )
    }

    /// Create a new delete operation request.
    pub fn delete(resource_type: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self::new(
            ScimOperationType::Delete,
            resource_type,
            Some(resource_id.into()),
            None,
        )
    }

    /// Set pagination parameters.
    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the request ID.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
