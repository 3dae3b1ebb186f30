//! Error types for directory service operations.
//!
//! Only existence and uniqueness failures are explicit outcomes of the service layer.
//! Malformed identifiers and malformed PATCH paths are absorbed lower down (as not-found
//! and no-op respectively) and never reach this type.

use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for directory service operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Resource not found errors
    #[error("{resource_type} with ID {id} not found")]
    ResourceNotFound { resource_type: String, id: String },

    /// Uniqueness violation on the resource's uniqueness key
    #[error("{resource_type} with {attribute} {value} already exists")]
    Conflict {
        resource_type: String,
        attribute: String,
        value: String,
    },

    /// Invalid request format or parameters
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Errors from the storage backend
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScimError {
    /// Create a resource not found error
    pub fn resource_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create a uniqueness conflict error
    pub fn conflict(
        resource_type: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// The response status this error maps to at the transport boundary.
    pub fn status(&self) -> ScimStatus {
        match self {
            ScimError::ResourceNotFound { .. } => ScimStatus::NotFound,
            ScimError::Conflict { .. } => ScimStatus::Conflict,
            ScimError::InvalidRequest { .. } => ScimStatus::BadRequest,
            ScimError::Storage(e) if e.is_conflict() => ScimStatus::Conflict,
            ScimError::Storage(_) | ScimError::Json(_) => ScimStatus::InternalServerError,
        }
    }

    /// Render this error as a SCIM error body.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_string(), self.status())
    }
}

/// Outcome status of an operation, as exposed to the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScimStatus {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    Conflict,
    InternalServerError,
}

impl ScimStatus {
    /// Numeric HTTP status code.
    pub fn code(self) -> u16 {
        match self {
            ScimStatus::Ok => 200,
            ScimStatus::Created => 201,
            ScimStatus::NoContent => 204,
            ScimStatus::BadRequest => 400,
            ScimStatus::NotFound => 404,
            ScimStatus::Conflict => 409,
            ScimStatus::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self.code() < 300
    }
}

impl fmt::Display for ScimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// SCIM error body (RFC 7644 Section 3.12).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub schemas: Vec<String>,
    pub detail: String,
    /// Status code rendered as a decimal string, e.g. `"404"`
    pub status: String,
}

impl ErrorResponse {
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:api:messages:2.0:Error";

    pub fn new(detail: impl Into<String>, status: ScimStatus) -> Self {
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            detail: detail.into(),
            status: status.to_string(),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = ScimError::resource_not_found("Group", "g-1");
        assert_eq!(error.to_string(), "Group with ID g-1 not found");
        assert_eq!(error.status(), ScimStatus::NotFound);
    }

    #[test]
    fn test_conflict_message() {
        let error = ScimError::conflict("User", "userName", "alice");
        assert!(error.to_string().contains("already exists"));
        assert_eq!(error.status().code(), 409);
    }

    #[test]
    fn test_storage_conflict_maps_to_409() {
        let error = ScimError::from(StorageError::unique_violation("User", "a", "1"));
        assert_eq!(error.status(), ScimStatus::Conflict);

        let error = ScimError::from(StorageError::internal("boom"));
        assert_eq!(error.status(), ScimStatus::InternalServerError);
    }

    #[test]
    fn test_error_response_body() {
        let body = ScimError::resource_not_found("User", "x").to_response();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "404");
        assert_eq!(json["schemas"][0], ErrorResponse::SCHEMA);
        assert_eq!(json["detail"], "User with ID x not found");
    }
}
