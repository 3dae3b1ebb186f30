//! CRUD operation handlers
//!
//! This module contains handlers for Create, Get, Replace, Patch and Delete operations,
//! plus the payload decoding they share.

use crate::error::{ScimError, ScimResult, ScimStatus};
use crate::operation_handler::core::{ScimOperationRequest, ScimOperationResponse};
use crate::patch::PatchRequest;
use crate::resource::ScimResource;
use crate::service::ResourceService;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Handle create operations.
pub async fn handle_create<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    let data = request.data.ok_or_else(|| {
        ScimError::invalid_request("Missing data for create operation".to_string())
    })?;
    let kind = <R::Resource as ScimResource>::KIND;
    let resource: R::Resource = decode_payload(data, kind.as_str())?;

    let created = service.create(resource).await?;
    respond(ScimStatus::Created, &created, request_id)
}

/// Handle get operations.
pub async fn handle_get<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    let resource_id = require_id(&request, "get")?;

    match service.get_by_id(&resource_id).await? {
        Some(resource) => respond(ScimStatus::Ok, &resource, request_id),
        None => Err(ScimError::resource_not_found(
            <R::Resource as ScimResource>::KIND.as_str(),
            resource_id,
        )),
    }
}

/// Handle replace operations.
pub async fn handle_replace<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    let resource_id = require_id(&request, "replace")?;
    let data = request.data.ok_or_else(|| {
        ScimError::invalid_request("Missing data for replace operation".to_string())
    })?;
    let kind = <R::Resource as ScimResource>::KIND;
    let resource: R::Resource = decode_payload(data, kind.as_str())?;

    let replaced = service.replace(&resource_id, resource).await?;
    respond(ScimStatus::Ok, &replaced, request_id)
}

/// Handle patch operations.
pub async fn handle_patch<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    let resource_id = require_id(&request, "patch")?;
    let data = request.data.ok_or_else(|| {
        ScimError::invalid_request("Missing data for patch operation".to_string())
    })?;
    let patch: PatchRequest = decode_payload(data, "PatchOp")?;

    let patched = service.patch(&resource_id, &patch).await?;
    respond(ScimStatus::Ok, &patched, request_id)
}

/// Handle delete operations.
pub async fn handle_delete<R: ResourceService>(
    service: &R,
    request: ScimOperationRequest,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    let resource_id = require_id(&request, "delete")?;

    if service.delete(&resource_id).await? {
        Ok(ScimOperationResponse {
            status: ScimStatus::NoContent,
            body: None,
            request_id: request_id.to_string(),
        })
    } else {
        Err(ScimError::resource_not_found(
            <R::Resource as ScimResource>::KIND.as_str(),
            resource_id,
        ))
    }
}

fn require_id(request: &ScimOperationRequest, operation: &str) -> ScimResult<String> {
    request.resource_id.clone().ok_or_else(|| {
        ScimError::invalid_request(format!("Missing resource_id for {} operation", operation))
    })
}

fn decode_payload<T: DeserializeOwned>(data: Value, what: &str) -> ScimResult<T> {
    serde_json::from_value(data)
        .map_err(|e| ScimError::invalid_request(format!("Invalid {} payload: {}", what, e)))
}

pub(super) fn respond<T: Serialize>(
    status: ScimStatus,
    body: &T,
    request_id: &str,
) -> ScimResult<ScimOperationResponse> {
    Ok(ScimOperationResponse {
        status,
        body: Some(serde_json::to_value(body)?),
        request_id: request_id.to_string(),
    })
}
