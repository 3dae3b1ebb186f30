//! Error responses for operation handlers

use crate::error::ScimError;
use crate::operation_handler::core::ScimOperationResponse;
use log::error;

/// Create an error response from a ScimError.
///
/// The body is a SCIM error message whose `status` matches the response status.
pub fn create_error_response(error: ScimError, request_id: String) -> ScimOperationResponse {
    let status = error.status();
    if status.code() >= 500 {
        error!("Internal failure (request: '{}'): {}", request_id, error);
    }

    let body = serde_json::to_value(error.to_response()).ok();
    ScimOperationResponse {
        status,
        body,
        request_id,
    }
}
