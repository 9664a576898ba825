//! Contract of the legacy SCIM group metadata store.
//!
//! User stores without native group ids keep SCIM metadata (id, created and
//! last-modified timestamps, location) in a side table keyed by tenant and
//! domain-qualified group name. [`LegacyGroupGateway`] is the read-only view
//! of that table the enrichment engine needs.
//!
//! Implementations are blocking: every call completes before it returns and
//! no retries are expected. A lookup that finds nothing returns `None` or an
//! empty collection, never an error.

use crate::schema::{CREATED_URI, ID_URI, LAST_MODIFIED_URI, LOCATION_URI};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by legacy metadata stores.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The backing store could not be reached.
    #[error("Legacy group store unavailable: {message}")]
    Unavailable { message: String },

    /// The search could not be executed.
    #[error("Invalid legacy group query: {message}")]
    InvalidQuery { message: String },

    /// Any other store failure.
    #[error("Legacy group store error: {message}")]
    Internal { message: String },
}

/// SCIM attributes of one group, keyed by schema URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAttributeSet(BTreeMap<String, String>);

impl LegacyAttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn id(&self) -> Option<&str> {
        self.get(ID_URI)
    }

    pub fn created(&self) -> Option<&str> {
        self.get(CREATED_URI)
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.get(LAST_MODIFIED_URI)
    }

    /// Whether the store holds a location. Only its presence matters; the
    /// location itself is always rebuilt from the id.
    pub fn has_location(&self) -> bool {
        self.contains_key(LOCATION_URI)
    }
}

/// Read access to the legacy group metadata table. All calls are tenant scoped.
pub trait LegacyGroupGateway {
    /// Id of the group stored under `group_name`.
    fn lookup_id_by_name(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<Option<String>, GatewayError>;

    /// Qualified name of the group with `group_id`.
    fn lookup_name_by_id(
        &self,
        tenant_id: &str,
        group_id: &str,
    ) -> Result<Option<String>, GatewayError>;

    /// All SCIM attributes of `group_name`; empty when the group is unknown.
    fn lookup_attributes(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<LegacyAttributeSet, GatewayError>;

    /// Names of groups whose `schema_key` attribute matches the SQL-LIKE
    /// `pattern`, limited to `domain` when one is given.
    fn search_names(
        &self,
        tenant_id: &str,
        schema_key: &str,
        pattern: &str,
        domain: Option<&str>,
    ) -> Result<Vec<String>, GatewayError>;
}

impl<T: LegacyGroupGateway + ?Sized> LegacyGroupGateway for &T {
    fn lookup_id_by_name(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<Option<String>, GatewayError> {
        (**self).lookup_id_by_name(tenant_id, group_name)
    }

    fn lookup_name_by_id(
        &self,
        tenant_id: &str,
        group_id: &str,
    ) -> Result<Option<String>, GatewayError> {
        (**self).lookup_name_by_id(tenant_id, group_id)
    }

    fn lookup_attributes(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<LegacyAttributeSet, GatewayError> {
        (**self).lookup_attributes(tenant_id, group_name)
    }

    fn search_names(
        &self,
        tenant_id: &str,
        schema_key: &str,
        pattern: &str,
        domain: Option<&str>,
    ) -> Result<Vec<String>, GatewayError> {
        (**self).search_names(tenant_id, schema_key, pattern, domain)
    }
}
