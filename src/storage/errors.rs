//! Storage-specific error types for pure data operations.
//!
//! These errors describe failures of the persistence layer only. They carry no
//! SCIM semantics; the service layer decides how each one surfaces to callers.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The secondary uniqueness index already holds the given value for another record.
    UniqueViolation {
        resource_type: String,
        value: String,
        existing_id: String,
    },

    /// A record with the same primary identifier already exists.
    DuplicateId { resource_type: String, id: String },

    /// Serialization or deserialization error.
    Serialization { message: String },

    /// Generic internal storage error.
    Internal {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::UniqueViolation {
                resource_type,
                value,
                existing_id,
            } => {
                write!(
                    f,
                    "Unique key '{}' already used by {}/{}",
                    value, resource_type, existing_id
                )
            }
            StorageError::DuplicateId { resource_type, id } => {
                write!(f, "Resource already exists: {}/{}", resource_type, id)
            }
            StorageError::Serialization { message } => {
                write!(f, "Serialization error: {}", message)
            }
            StorageError::Internal { message, .. } => {
                write!(f, "Internal storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Internal { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl StorageError {
    /// Create a new UniqueViolation error.
    pub fn unique_violation(
        resource_type: impl Into<String>,
        value: impl Into<String>,
        existing_id: impl Into<String>,
    ) -> Self {
        Self::UniqueViolation {
            resource_type: resource_type.into(),
            value: value.into(),
            existing_id: existing_id.into(),
        }
    }

    /// Create a new DuplicateId error.
    pub fn duplicate_id(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create a new Serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error reports a uniqueness conflict of any kind.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::UniqueViolation { .. } | StorageError::DuplicateId { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_display() {
        let error = StorageError::unique_violation("User", "alice", "u-1");
        assert_eq!(error.to_string(), "Unique key 'alice' already used by User/u-1");
        assert!(error.is_conflict());
    }

    #[test]
    fn test_internal_is_not_conflict() {
        let error = StorageError::internal("disk on fire");
        assert!(!error.is_conflict());
        assert!(error.to_string().contains("disk on fire"));
    }
}
