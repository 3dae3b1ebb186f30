//! Service configuration.
//!
//! [`ServiceConfig`] controls how `meta.location` is rendered and how list pagination
//! behaves. Use [`ServiceConfig::builder`] for anything beyond the defaults.
//!
//! ```rust
//! use scim_directory::config::ServiceConfig;
//!
//! let config = ServiceConfig::builder()
//!     .base_location("https://scim.example.com/scim/v2")
//!     .default_count(50)
//!     .max_count(200)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.location("Users", "123"),
//!     "https://scim.example.com/scim/v2/Users/123"
//! );
//! ```

use crate::error::ScimError;

/// Default page size when a list request carries no `count`.
pub const DEFAULT_COUNT: usize = 100;

/// Configuration shared by the user and group services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Prefix placed before `/{endpoint}/{id}` in `meta.location`.
    /// Empty by default, which yields locations such as `/Users/123`.
    pub base_location: String,

    /// Page size used when a list request omits `count`.
    pub default_count: usize,

    /// Upper bound applied to any requested page size.
    pub max_count: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_location: String::new(),
            default_count: DEFAULT_COUNT,
            max_count: None,
        }
    }
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Canonical location of a resource.
    pub fn location(&self, endpoint: &str, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_location.trim_end_matches('/'),
            endpoint,
            id
        )
    }

    /// Page size after applying the default and the configured ceiling.
    pub fn effective_count(&self, requested: Option<usize>) -> usize {
        let count = requested.unwrap_or(self.default_count);
        match self.max_count {
            Some(max) => count.min(max),
            None => count,
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    base_location: Option<String>,
    default_count: Option<usize>,
    max_count: Option<usize>,
}

impl ServiceConfigBuilder {
    pub fn base_location(mut self, base_location: impl Into<String>) -> Self {
        self.base_location = Some(base_location.into());
        self
    }

    pub fn default_count(mut self, count: usize) -> Self {
        self.default_count = Some(count);
        self
    }

    pub fn max_count(mut self, count: usize) -> Self {
        self.max_count = Some(count);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScimError::InvalidRequest`] when the default page size exceeds the maximum.
    pub fn build(self) -> Result<ServiceConfig, ScimError> {
        let defaults = ServiceConfig::default();
        let config = ServiceConfig {
            base_location: self.base_location.unwrap_or(defaults.base_location),
            default_count: self.default_count.unwrap_or(defaults.default_count),
            max_count: self.max_count,
        };

        if let Some(max) = config.max_count {
            if config.default_count > max {
                return Err(ScimError::invalid_request(format!(
                    "default_count {} exceeds max_count {}",
                    config.default_count, max
                )));
            }
        }

        Ok(config)
    }
}
