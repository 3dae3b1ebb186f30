//! Operation handlers
//!
//! - CRUD operations (create, get, replace, patch, delete)
//! - Query operations (list)

pub mod crud;
pub mod query;

use crate::error::ScimResult;
use crate::operation_handler::core::{
    ScimOperationRequest, ScimOperationResponse, ScimOperationType,
};
use crate::service::ResourceService;

/// Route a request to the handler of its operation type.
pub async fn dispatch<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    match request.operation {
        ScimOperationType::List => query::handle_list(service, request, request_id).await,
        ScimOperationType::Get => crud::handle_get(service, request, request_id).await,
        ScimOperationType::Create => crud::handle_create(service, request, request_id).await,
        ScimOperationType::Replace => crud::handle_replace(service, request, request_id).await,
        ScimOperationType::Patch => crud::handle_patch(service, request, request_id).await,
        ScimOperationType::Delete => crud::handle_delete(service, request, request_id).await,
    }
}
