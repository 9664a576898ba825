//! The directory (user store) the compatibility hooks run against.
//!
//! Directories manage users and groups natively. Newer ones also hand out
//! stable, queryable group ids; older ones only know group names, and for
//! those the SCIM metadata lives in the legacy side table. [`GroupIdSource`]
//! captures that capability check so every hook decides the same way.

/// The slice of a directory the enrichment hooks need.
pub trait UserStoreDirectory {
    /// Tenant that all legacy lookups are scoped to.
    fn tenant_id(&self) -> &str;

    /// Whether the directory provides stable group ids itself.
    fn is_native_group_id_supported(&self) -> bool;

    /// Domain name of this user store, used in diagnostics.
    fn domain_name(&self) -> &str;
}

/// Where group ids come from for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupIdSource {
    /// The directory resolves ids itself; hooks have nothing to do.
    Native,
    /// Ids and SCIM metadata must be read from the legacy store.
    LegacyStore,
}

impl GroupIdSource {
    /// Select the source from the directory's capability flag.
    pub fn select<D: UserStoreDirectory + ?Sized>(directory: &D) -> Self {
        if directory.is_native_group_id_supported() {
            GroupIdSource::Native
        } else {
            GroupIdSource::LegacyStore
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, GroupIdSource::Native)
    }
}

/// A plain directory description, handy for embedding and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDirectory {
    pub tenant_id: String,
    pub domain_name: String,
    pub native_group_ids: bool,
}

impl StaticDirectory {
    /// A directory without native group id support.
    pub fn legacy(tenant_id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            domain_name: domain_name.into(),
            native_group_ids: false,
        }
    }

    /// A directory that resolves group ids itself.
    pub fn native(tenant_id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            domain_name: domain_name.into(),
            native_group_ids: true,
        }
    }
}

impl UserStoreDirectory for StaticDirectory {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn is_native_group_id_supported(&self) -> bool {
        self.native_group_ids
    }

    fn domain_name(&self) -> &str {
        &self.domain_name
    }
}
