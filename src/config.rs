//! Configuration for the legacy group compatibility layer.
//!
//! All conventions that the user-core layer historically kept in process-wide
//! constants (primary domain name, domain separator, SQL wildcard, SCIM
//! endpoint, attribute schema mapping) are carried here as plain values and
//! handed to the components that need them.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_group_compat::config::CompatConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CompatConfig::from_json_str(r#"{
//!     "primaryDomain": "PRIMARY",
//!     "scimBaseUrl": "https://id.example.com/t/acme/scim2"
//! }"#)?;
//! assert_eq!(config.domain_separator, '/');
//!
//! let config = CompatConfig::builder()
//!     .with_primary_domain("LOCAL")
//!     .with_listener_order(10)
//!     .build()?;
//! assert_eq!(config.primary_domain, "LOCAL");
//! # Ok(())
//! # }
//! ```

use crate::schema::{SchemaMapping, default_group_attribute_schema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the primary user-store domain.
pub const PRIMARY_DEFAULT_DOMAIN_NAME: &str = "PRIMARY";

/// Default separator between a domain qualifier and a name.
pub const DOMAIN_SEPARATOR: char = '/';

/// Default wildcard used when building legacy store search patterns.
pub const SQL_FILTERING_DELIMITER: &str = "%";

/// Default execution order of the compatibility hook.
pub const DEFAULT_LISTENER_ORDER: i32 = 1;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Settings shared by the normalizer, schema resolver, location builder and engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompatConfig {
    /// Name of the primary user-store domain; never used as a name qualifier
    pub primary_domain: String,
    /// Separator between domain and name, e.g. `SECONDARY/admins`
    pub domain_separator: char,
    /// Wildcard used in legacy store search patterns
    pub search_wildcard: String,
    /// SCIM 2.0 endpoint that group locations are built from
    pub scim_base_url: String,
    /// Ordered schema-key to logical-attribute mapping used for filtering
    pub group_attribute_schema: Vec<SchemaMapping>,
    /// Execution order override for the hook
    pub listener_order: Option<i32>,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            primary_domain: PRIMARY_DEFAULT_DOMAIN_NAME.to_string(),
            domain_separator: DOMAIN_SEPARATOR,
            search_wildcard: SQL_FILTERING_DELIMITER.to_string(),
            scim_base_url: "https://localhost:9443/scim2".to_string(),
            group_attribute_schema: default_group_attribute_schema(),
            listener_order: None,
        }
    }
}

impl CompatConfig {
    /// Create a new builder starting from the defaults.
    pub fn builder() -> CompatConfigBuilder {
        CompatConfigBuilder::new()
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: CompatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.primary_domain.trim().is_empty() {
            return Err(ConfigurationError::Validation {
                message: "Primary domain name cannot be empty".to_string(),
            });
        }

        if self.domain_separator.is_whitespace() {
            return Err(ConfigurationError::Validation {
                message: "Domain separator cannot be whitespace".to_string(),
            });
        }

        if self.search_wildcard.trim().is_empty() {
            return Err(ConfigurationError::Validation {
                message: "Search wildcard cannot be empty".to_string(),
            });
        }

        if self.scim_base_url.trim().is_empty() {
            return Err(ConfigurationError::Validation {
                message: "SCIM base URL cannot be empty".to_string(),
            });
        }

        for mapping in &self.group_attribute_schema {
            if mapping.schema_key.trim().is_empty() || mapping.attribute_name.trim().is_empty() {
                return Err(ConfigurationError::Validation {
                    message: format!(
                        "Group attribute schema entries need both a key and a name: {:?}",
                        mapping
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Fluent builder for [`CompatConfig`].
#[derive(Debug, Clone, Default)]
pub struct CompatConfigBuilder {
    config: CompatConfig,
}

impl CompatConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.primary_domain = domain.into();
        self
    }

    pub fn with_domain_separator(mut self, separator: char) -> Self {
        self.config.domain_separator = separator;
        self
    }

    pub fn with_search_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.config.search_wildcard = wildcard.into();
        self
    }

    pub fn with_scim_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.scim_base_url = url.into();
        self
    }

    /// Replace the attribute schema mapping. Order matters: later entries win
    /// when two map to the same attribute name.
    pub fn with_group_attribute_schema(mut self, mappings: Vec<SchemaMapping>) -> Self {
        self.config.group_attribute_schema = mappings;
        self
    }

    pub fn with_listener_order(mut self, order: i32) -> Self {
        self.config.listener_order = Some(order);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<CompatConfig, ConfigurationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
