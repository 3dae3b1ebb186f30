//! Query operation handlers

use crate::error::{ScimResult, ScimStatus};
use crate::operation_handler::core::{ScimOperationRequest, ScimOperationResponse};
use crate::service::ResourceService;

/// Handle list operations. A request without a query lists the first default-sized page.
pub async fn handle_list<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    let query = request.query.unwrap_or_default();
    let page = service.list(query).await?;
    super::crud::respond(ScimStatus::Ok, &page, request_id)
}
