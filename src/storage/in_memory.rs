//! In-memory legacy group metadata store.
//!
//! Thread-safe implementation of [`LegacyGroupGateway`] backed by nested maps
//! behind an `RwLock`. It is meant for tests, development, and embedding the
//! compatibility layer where the legacy table is loaded up front.
//!
//! # Features
//!
//! * Tenant isolation through the `tenant_id` → group name layout
//! * Group names are stored in canonical form, so `PRIMARY/admins`,
//!   `admins` and `primary/admins` address the same row
//! * SQL-LIKE searches with `%` and `_`, returned in name order
//!
//! # Example Usage
//!
//! ```rust
//! use scim_group_compat::gateway::LegacyGroupGateway;
//! use scim_group_compat::schema::GROUP_DISPLAY_NAME_URI;
//! use scim_group_compat::storage::InMemoryLegacyGroupStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryLegacyGroupStore::new();
//! store.add_group("tenant1", "engineering")?;
//! store.add_group("tenant1", "LDAP/engineering-leads")?;
//!
//! let names = store.search_names("tenant1", GROUP_DISPLAY_NAME_URI, "eng%", None)?;
//! assert_eq!(names, vec!["LDAP/engineering-leads", "engineering"]);
//!
//! let primary_only =
//!     store.search_names("tenant1", GROUP_DISPLAY_NAME_URI, "eng%", Some("PRIMARY"))?;
//! assert_eq!(primary_only, vec!["engineering"]);
//! # Ok(())
//! # }
//! ```

use crate::config::CompatConfig;
use crate::domain::NameNormalizer;
use crate::gateway::{GatewayError, LegacyAttributeSet, LegacyGroupGateway};
use crate::location::{GroupLocationBuilder, ScimEndpointLocation};
use crate::schema::{
    CREATED_URI, GROUP_DISPLAY_NAME_URI, ID_URI, LAST_MODIFIED_URI, LOCATION_URI,
};
use crate::storage::{GroupKey, like_match};
use chrono::{SecondsFormat, Utc};
use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type TenantGroups = HashMap<String, BTreeMap<String, LegacyAttributeSet>>;

/// Thread-safe in-memory legacy group store.
#[derive(Clone)]
pub struct InMemoryLegacyGroupStore {
    // Structure: tenant_id -> canonical group name -> attributes
    data: Arc<RwLock<TenantGroups>>,
    normalizer: NameNormalizer,
    location: ScimEndpointLocation,
}

impl InMemoryLegacyGroupStore {
    /// Create an empty store using the default naming conventions.
    pub fn new() -> Self {
        Self::with_config(&CompatConfig::default())
    }

    /// Create an empty store using the conventions of `config`.
    pub fn with_config(config: &CompatConfig) -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            normalizer: NameNormalizer::from_config(config),
            location: ScimEndpointLocation::from_config(config),
        }
    }

    /// Register a group with a fresh id and current timestamps.
    ///
    /// Returns the stored attribute set.
    pub fn add_group(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<LegacyAttributeSet, GatewayError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let attributes = LegacyAttributeSet::new()
            .with(ID_URI, id.as_str())
            .with(CREATED_URI, now.as_str())
            .with(LAST_MODIFIED_URI, now)
            .with(LOCATION_URI, self.location.group_location(&id));

        self.put_attributes(tenant_id, group_name, attributes.clone())?;
        Ok(attributes)
    }

    /// Store `attributes` for a group, replacing any previous set.
    pub fn put_attributes(
        &self,
        tenant_id: &str,
        group_name: &str,
        attributes: LegacyAttributeSet,
    ) -> Result<(), GatewayError> {
        let key = self.key(tenant_id, group_name);
        trace!("Storing legacy attributes for group {}", key);

        let mut data_guard = self.write()?;
        data_guard
            .entry(key.tenant_id().to_string())
            .or_default()
            .insert(key.group_name().to_string(), attributes);
        Ok(())
    }

    /// Remove a group; returns whether it existed.
    pub fn remove_group(&self, tenant_id: &str, group_name: &str) -> Result<bool, GatewayError> {
        let key = self.key(tenant_id, group_name);
        let mut data_guard = self.write()?;

        let existed = data_guard
            .get_mut(key.tenant_id())
            .map(|groups| groups.remove(key.group_name()).is_some())
            .unwrap_or(false);
        Ok(existed)
    }

    /// Get storage statistics for debugging and monitoring.
    pub fn stats(&self) -> Result<InMemoryLegacyGroupStoreStats, GatewayError> {
        let data_guard = self.read()?;
        Ok(InMemoryLegacyGroupStoreStats {
            tenant_count: data_guard.len(),
            total_groups: data_guard.values().map(BTreeMap::len).sum(),
        })
    }

    /// Clear all data (useful for testing).
    pub fn clear(&self) -> Result<(), GatewayError> {
        self.write()?.clear();
        Ok(())
    }

    /// Get all tenant IDs currently in storage.
    pub fn list_tenants(&self) -> Result<Vec<String>, GatewayError> {
        let mut tenants: Vec<String> = self.read()?.keys().cloned().collect();
        tenants.sort();
        Ok(tenants)
    }

    fn key(&self, tenant_id: &str, group_name: &str) -> GroupKey {
        GroupKey::new(tenant_id, self.canonical_name(group_name))
    }

    /// Primary-domain groups are stored unqualified, others with an
    /// upper-case domain.
    fn canonical_name(&self, group_name: &str) -> String {
        let domain = self.normalizer.extract_domain(group_name);
        let display_name = self.normalizer.strip_domain(group_name);
        if self.normalizer.is_primary_domain(&domain) {
            return display_name.to_string();
        }
        format!("{}{}{}", domain, self.normalizer.separator(), display_name)
    }

    fn in_domain(&self, group_name: &str, domain: Option<&str>) -> bool {
        match domain.map(str::trim).filter(|d| !d.is_empty()) {
            None => true,
            Some(domain) => self
                .normalizer
                .extract_domain(group_name)
                .eq_ignore_ascii_case(domain),
        }
    }

    /// The value a search on `schema_key` is matched against. Display-name
    /// searches run against the group name itself, qualified only when the
    /// pattern is.
    fn searchable_value<'a>(
        &self,
        group_name: &'a str,
        attributes: &'a LegacyAttributeSet,
        schema_key: &str,
        pattern: &str,
    ) -> Option<&'a str> {
        if schema_key == GROUP_DISPLAY_NAME_URI {
            if self.normalizer.is_qualified(pattern) {
                Some(group_name)
            } else {
                Some(self.normalizer.strip_domain(group_name))
            }
        } else {
            attributes.get(schema_key)
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TenantGroups>, GatewayError> {
        self.data.read().map_err(|e| GatewayError::Internal {
            message: format!("Legacy group store lock poisoned: {}", e),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TenantGroups>, GatewayError> {
        self.data.write().map_err(|e| GatewayError::Internal {
            message: format!("Legacy group store lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryLegacyGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyGroupGateway for InMemoryLegacyGroupStore {
    fn lookup_id_by_name(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<Option<String>, GatewayError> {
        let key = self.key(tenant_id, group_name);
        let data_guard = self.read()?;

        Ok(data_guard
            .get(key.tenant_id())
            .and_then(|groups| groups.get(key.group_name()))
            .and_then(|attributes| attributes.id())
            .map(str::to_string))
    }

    fn lookup_name_by_id(
        &self,
        tenant_id: &str,
        group_id: &str,
    ) -> Result<Option<String>, GatewayError> {
        let data_guard = self.read()?;

        Ok(data_guard.get(tenant_id).and_then(|groups| {
            groups
                .iter()
                .find(|(_, attributes)| attributes.id() == Some(group_id))
                .map(|(name, _)| name.clone())
        }))
    }

    fn lookup_attributes(
        &self,
        tenant_id: &str,
        group_name: &str,
    ) -> Result<LegacyAttributeSet, GatewayError> {
        let key = self.key(tenant_id, group_name);
        let data_guard = self.read()?;

        Ok(data_guard
            .get(key.tenant_id())
            .and_then(|groups| groups.get(key.group_name()))
            .cloned()
            .unwrap_or_default())
    }

    fn search_names(
        &self,
        tenant_id: &str,
        schema_key: &str,
        pattern: &str,
        domain: Option<&str>,
    ) -> Result<Vec<String>, GatewayError> {
        if schema_key.trim().is_empty() {
            return Err(GatewayError::InvalidQuery {
                message: "Search attribute cannot be empty".to_string(),
            });
        }

        let data_guard = self.read()?;
        let Some(groups) = data_guard.get(tenant_id) else {
            return Ok(Vec::new());
        };

        let names: Vec<String> = groups
            .iter()
            .filter(|(name, _)| self.in_domain(name, domain))
            .filter(|(name, attributes)| {
                self.searchable_value(name, attributes, schema_key, pattern)
                    .is_some_and(|value| like_match(pattern, value))
            })
            .map(|(name, _)| name.clone())
            .collect();

        debug!(
            "Legacy search on {} with pattern '{}' matched {} groups in tenant {}",
            schema_key,
            pattern,
            names.len(),
            tenant_id
        );
        Ok(names)
    }
}

/// Statistics about the current state of the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryLegacyGroupStoreStats {
    /// Number of tenants with groups
    pub tenant_count: usize,
    /// Total number of groups across all tenants
    pub total_groups: usize,
}
