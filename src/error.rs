//! Error types for legacy group compatibility operations.
//!
//! Errors are split by layer: [`GatewayError`] is raised by legacy metadata
//! stores, [`CompatError`] is what the enrichment engine surfaces to its
//! caller. "Not found" is never an error at either layer; lookups model it
//! with `Option` or an empty collection.

use crate::gateway::GatewayError;

/// Main error type for group enrichment operations.
///
/// Every variant carries the tenant it happened in plus the name, id or
/// attribute being resolved, so a caller can report it without extra context.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    /// The legacy metadata store failed while resolving a group.
    #[error("Error occurred while getting the {operation} of group: {subject} in tenant: {tenant_id}")]
    LookupFailed {
        tenant_id: String,
        /// Group name, group id or user-store domain being resolved
        subject: String,
        /// What was being fetched, e.g. "group id" or "group attributes"
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// The filter attribute was blank.
    #[error("Group attribute cannot be empty (tenant: {tenant_id})")]
    InvalidAttribute { tenant_id: String },

    /// No schema key maps to the filter attribute.
    #[error("No scim schema to attribute mapping for attribute: {attribute} for tenant: {tenant_id}")]
    NoSchemaMapping { attribute: String, tenant_id: String },

    /// Compound filters cannot be translated to a legacy store search.
    #[error("OperationalCondition filtering is not supported by userstore: {user_store}")]
    UnsupportedFilter { user_store: String },

    /// The expression operator has no search-pattern equivalent.
    #[error("Filter operation '{operation}' is not supported for attribute '{attribute}'")]
    UnsupportedFilterOperation { operation: String, attribute: String },
}

impl CompatError {
    /// Wrap a gateway failure with the lookup context.
    pub(crate) fn lookup_failed(
        tenant_id: impl Into<String>,
        subject: impl Into<String>,
        operation: &'static str,
        source: GatewayError,
    ) -> Self {
        CompatError::LookupFailed {
            tenant_id: tenant_id.into(),
            subject: subject.into(),
            operation,
            source,
        }
    }
}

/// Result type for enrichment operations.
pub type CompatResult<T> = Result<T, CompatError>;
