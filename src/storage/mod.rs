//! Legacy group metadata storage.
//!
//! This module holds concrete implementations of
//! [`LegacyGroupGateway`](crate::gateway::LegacyGroupGateway) together with
//! the pieces they share: tenant-scoped keys and SQL-LIKE pattern matching.
//!
//! The storage layer is responsible for:
//! - Keeping SCIM attribute sets per tenant and group name
//! - Answering id/name/attribute lookups and pattern searches
//!
//! It is NOT responsible for:
//! - Deciding whether a user store needs legacy metadata at all
//! - Turning filter attributes into schema keys or search patterns
//! - Building group records
//!
//! # Example Usage
//!
//! ```rust
//! use scim_group_compat::gateway::LegacyGroupGateway;
//! use scim_group_compat::storage::InMemoryLegacyGroupStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryLegacyGroupStore::new();
//! let attributes = store.add_group("tenant1", "LDAP/engineering")?;
//!
//! let id = store.lookup_id_by_name("tenant1", "ldap/engineering")?;
//! assert_eq!(id.as_deref(), attributes.id());
//! # Ok(())
//! # }
//! ```

pub mod in_memory;

pub use in_memory::{InMemoryLegacyGroupStore, InMemoryLegacyGroupStoreStats};

use std::fmt;

/// Identifies one group row: `tenant_id` → canonical group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    tenant_id: String,
    group_name: String,
}

impl GroupKey {
    pub fn new(tenant_id: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            group_name: group_name.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tenant_id, self.group_name)
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
///
/// Matching is case sensitive.
pub fn like_match(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let value: Vec<char> = value.chars().collect();

    // matches[j]: pattern[..i] matches value[..j]
    let mut matches = vec![false; value.len() + 1];
    matches[0] = true;

    for p in &pattern {
        let mut next = vec![false; value.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=value.len() {
                    seen |= matches[j];
                    next[j] = seen;
                }
            }
            _ => {
                for j in 1..=value.len() {
                    next[j] = matches[j - 1] && (*p == '_' || *p == value[j - 1]);
                }
            }
        }
        matches = next;
    }

    matches[value.len()]
}
