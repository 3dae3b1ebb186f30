//! Framework-agnostic operation handler.
//!
//! This module is the boundary an HTTP (or any other) transport talks to. It decodes
//! payloads, calls the User or Group service and maps every outcome to a status:
//! Created 201, OK 200, NoContent 204, BadRequest 400, NotFound 404, Conflict 409 and
//! InternalServerError 500. Failures carry a SCIM error body.
//!
//! # Key Types
//!
//! - [`ScimOperationHandler`] - Main handler for processing operations
//! - [`ScimOperationRequest`] - Structured request with builder constructors
//! - [`ScimOperationResponse`] - Status plus JSON body
//!
//! # Examples
//!
//! ```rust
//! use scim_directory::config::ServiceConfig;
//! use scim_directory::error::ScimStatus;
//! use scim_directory::operation_handler::{ScimOperationHandler, ScimOperationRequest};
//! use scim_directory::resource::ResourceKind;
//! use scim_directory::storage::InMemoryStorage;
//! use serde_json::json;
//!
//! # async fn example() {
//! let handler = ScimOperationHandler::with_storage(InMemoryStorage::new(), ServiceConfig::default());
//!
//! let request = ScimOperationRequest::create(ResourceKind::User, json!({"userName": "bjensen"}));
//! let response = handler.handle_operation(request).await;
//! assert_eq!(response.status, ScimStatus::Created);
//! # }
//! ```

mod builders;
mod core;
mod errors;
mod handlers;

// Re-export all public types and functions
pub use self::core::{
    ScimOperationHandler, ScimOperationRequest, ScimOperationResponse, ScimOperationType,
};

// Re-export error utilities for advanced usage
pub use errors::create_error_response;
