//! Group enrichment hooks for directories without native group ids.
//!
//! Each public operation runs after the matching directory operation has
//! completed and receives its result. When the directory supports group ids
//! natively the hook is a no-op. Otherwise the legacy metadata store is
//! consulted and the result is completed from it: ids are filled in, names
//! are normalized, and SCIM timestamps and locations are merged.
//!
//! # Merge rules
//!
//! | Operation | Record supplied | Fields written |
//! |---|---|---|
//! | [`enrich_groups_for_user`] | always | `id` only |
//! | [`resolve_group_id`] | optional | `id`, `name`, `display_name`, `user_store_domain` |
//! | [`resolve_group_name`] | optional | `id`, `name`, `display_name`, `user_store_domain` |
//! | [`resolve_group_by_id`] | optional | names, then `id`, `created_at`, `last_modified_at`, `location` from the store |
//! | [`resolve_group_by_name`] | optional | `name` only when constructing; everything else as above |
//! | [`list_groups`] | never | fresh records appended to the results |
//!
//! Batch operations resolve every entry before touching the caller's data,
//! so a failed lookup leaves the input as it was.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_group_compat::directory::StaticDirectory;
//! use scim_group_compat::engine::GroupEnrichmentEngine;
//! use scim_group_compat::storage::InMemoryLegacyGroupStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryLegacyGroupStore::new();
//! store.add_group("tenant1", "LDAP/engineering")?;
//!
//! let engine = GroupEnrichmentEngine::new(store);
//! let directory = StaticDirectory::legacy("tenant1", "LDAP");
//!
//! let group = engine
//!     .resolve_group_by_name(&directory, "LDAP/engineering", &[], None)?
//!     .expect("group is in the legacy store");
//! assert_eq!(group.display_name(), Some("engineering"));
//! assert_eq!(group.user_store_domain(), Some("LDAP"));
//! assert!(group.location.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! [`enrich_groups_for_user`]: GroupEnrichmentEngine::enrich_groups_for_user
//! [`resolve_group_id`]: GroupEnrichmentEngine::resolve_group_id
//! [`resolve_group_name`]: GroupEnrichmentEngine::resolve_group_name
//! [`resolve_group_by_id`]: GroupEnrichmentEngine::resolve_group_by_id
//! [`resolve_group_by_name`]: GroupEnrichmentEngine::resolve_group_by_name
//! [`list_groups`]: GroupEnrichmentEngine::list_groups

use crate::config::{CompatConfig, DEFAULT_LISTENER_ORDER};
use crate::directory::{GroupIdSource, UserStoreDirectory};
use crate::domain::NameNormalizer;
use crate::error::{CompatError, CompatResult};
use crate::filter::{FilterCondition, build_search_value};
use crate::gateway::{LegacyAttributeSet, LegacyGroupGateway};
use crate::group::GroupRecord;
use crate::location::{GroupLocationBuilder, ScimEndpointLocation};
use crate::schema::AttributeSchemaResolver;
use log::{debug, trace, warn};

/// Arguments of a filtered group listing.
///
/// Paging and sorting are accepted for parity with the directory call but
/// are not applied to legacy results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroupsRequest {
    pub condition: FilterCondition,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// User-store domain to search in; `None` searches all of them
    pub domain: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListGroupsRequest {
    pub fn new(condition: FilterCondition) -> Self {
        Self {
            condition,
            limit: None,
            offset: None,
            domain: None,
            sort_by: None,
            sort_order: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_paging(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn with_sorting(
        mut self,
        sort_by: impl Into<String>,
        sort_order: impl Into<String>,
    ) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(sort_order.into());
        self
    }
}

/// Completes directory group results from the legacy metadata store.
pub struct GroupEnrichmentEngine<G, L = ScimEndpointLocation> {
    gateway: G,
    location: L,
    normalizer: NameNormalizer,
    resolver: AttributeSchemaResolver,
    search_wildcard: String,
    listener_order: Option<i32>,
}

impl<G: LegacyGroupGateway> GroupEnrichmentEngine<G> {
    /// Create an engine with the default configuration.
    pub fn new(gateway: G) -> Self {
        Self::with_config(gateway, &CompatConfig::default())
    }

    /// Create an engine from `config`.
    pub fn with_config(gateway: G, config: &CompatConfig) -> Self {
        Self {
            gateway,
            location: ScimEndpointLocation::from_config(config),
            normalizer: NameNormalizer::from_config(config),
            resolver: AttributeSchemaResolver::new(config.group_attribute_schema.clone()),
            search_wildcard: config.search_wildcard.clone(),
            listener_order: config.listener_order,
        }
    }
}

impl<G: LegacyGroupGateway, L: GroupLocationBuilder> GroupEnrichmentEngine<G, L> {
    /// Replace the location builder.
    pub fn with_location_builder<B: GroupLocationBuilder>(
        self,
        location: B,
    ) -> GroupEnrichmentEngine<G, B> {
        GroupEnrichmentEngine {
            gateway: self.gateway,
            location,
            normalizer: self.normalizer,
            resolver: self.resolver,
            search_wildcard: self.search_wildcard,
            listener_order: self.listener_order,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Position of these hooks among the other post-operation listeners.
    pub fn execution_order_id(&self) -> i32 {
        self.listener_order.unwrap_or(DEFAULT_LISTENER_ORDER)
    }

    /// Fill in the ids of a user's groups.
    ///
    /// Only `id` is written, and only for groups the store knows. The first
    /// failed lookup aborts the whole batch with no record modified.
    pub fn enrich_groups_for_user<D>(
        &self,
        directory: &D,
        user_id: &str,
        groups: &mut [GroupRecord],
    ) -> CompatResult<()>
    where
        D: UserStoreDirectory + ?Sized,
    {
        if self.is_native(directory) {
            return Ok(());
        }
        // Ids are looked up by name, so there is nothing to do without groups.
        if groups.is_empty() {
            return Ok(());
        }

        let tenant_id = directory.tenant_id();
        debug!(
            "Resolving legacy ids of {} groups of user {} in tenant {}",
            groups.len(),
            user_id,
            tenant_id
        );

        let ids = groups
            .iter()
            .map(|group| {
                self.gateway
                    .lookup_id_by_name(tenant_id, &group.name)
                    .map(non_blank)
                    .map_err(|e| CompatError::lookup_failed(tenant_id, &group.name, "group id", e))
            })
            .collect::<CompatResult<Vec<_>>>()?;

        for (group, id) in groups.iter_mut().zip(ids) {
            if let Some(id) = id {
                group.id = Some(id);
            }
        }
        Ok(())
    }

    /// Attach the legacy id to the group called `group_name`.
    ///
    /// Returns `group` unchanged when the store has no such group. Otherwise
    /// the supplied record (or a new one) gets the id and names derived
    /// from `group_name`.
    pub fn resolve_group_id<D>(
        &self,
        directory: &D,
        group_name: &str,
        group: Option<GroupRecord>,
    ) -> CompatResult<Option<GroupRecord>>
    where
        D: UserStoreDirectory + ?Sized,
    {
        if self.is_native(directory) {
            return Ok(group);
        }

        let tenant_id = directory.tenant_id();
        debug!("Retrieving group with name: {} from tenant: {}", group_name, tenant_id);

        let group_id = self
            .gateway
            .lookup_id_by_name(tenant_id, group_name)
            .map_err(|e| CompatError::lookup_failed(tenant_id, group_name, "group id", e))?;
        let Some(group_id) = non_blank(group_id) else {
            debug!("No group found with the group name: {} in tenant: {}", group_name, tenant_id);
            return Ok(group);
        };

        let mut record = group.unwrap_or_default();
        record.id = Some(group_id);
        self.apply_names(&mut record, group_name);
        Ok(Some(record))
    }

    /// Attach the legacy name to the group with `group_id`.
    ///
    /// A missing or blank name means the group is unknown and `group` is
    /// returned unchanged.
    pub fn resolve_group_name<D>(
        &self,
        directory: &D,
        group_id: &str,
        group: Option<GroupRecord>,
    ) -> CompatResult<Option<GroupRecord>>
    where
        D: UserStoreDirectory + ?Sized,
    {
        if self.is_native(directory) {
            return Ok(group);
        }

        let tenant_id = directory.tenant_id();
        let Some(group_name) = self.lookup_name(tenant_id, group_id)? else {
            return Ok(group);
        };

        let mut record = group.unwrap_or_default();
        record.id = Some(group_id.to_string());
        self.apply_names(&mut record, &group_name);
        Ok(Some(record))
    }

    /// Build the full group with `group_id` from the legacy store.
    ///
    /// Names are always rewritten from the stored name. The stored id,
    /// created and last-modified values overwrite the record's; a stored
    /// location triggers a location rebuilt from `group_id`.
    pub fn resolve_group_by_id<D>(
        &self,
        directory: &D,
        group_id: &str,
        requested_claims: &[String],
        group: Option<GroupRecord>,
    ) -> CompatResult<Option<GroupRecord>>
    where
        D: UserStoreDirectory + ?Sized,
    {
        if self.is_native(directory) {
            return Ok(group);
        }

        let tenant_id = directory.tenant_id();
        debug!("Retrieving group with id: {} from tenant: {}", group_id, tenant_id);
        trace!("Requested claims are not used by legacy lookups: {:?}", requested_claims);

        let Some(group_name) = self.lookup_name(tenant_id, group_id)? else {
            return Ok(group);
        };
        let attributes = self
            .gateway
            .lookup_attributes(tenant_id, &group_name)
            .map_err(|e| CompatError::lookup_failed(tenant_id, group_id, "group attributes", e))?;

        let mut record = group.unwrap_or_default();
        record.id = Some(group_id.to_string());
        self.apply_names(&mut record, &group_name);
        self.merge_attributes(&mut record, &attributes, Some(group_id));
        Ok(Some(record))
    }

    /// Build the full group called `group_name` from the legacy store.
    ///
    /// An empty attribute set means the group is unknown. A supplied record
    /// keeps its `name`; a new one is named canonically. The id comes from
    /// the stored attributes and drives the rebuilt location.
    pub fn resolve_group_by_name<D>(
        &self,
        directory: &D,
        group_name: &str,
        requested_claims: &[String],
        group: Option<GroupRecord>,
    ) -> CompatResult<Option<GroupRecord>>
    where
        D: UserStoreDirectory + ?Sized,
    {
        if self.is_native(directory) {
            return Ok(group);
        }

        let tenant_id = directory.tenant_id();
        debug!("Retrieving group with name: {} from tenant: {}", group_name, tenant_id);
        trace!("Requested claims are not used by legacy lookups: {:?}", requested_claims);

        let attributes = self
            .gateway
            .lookup_attributes(tenant_id, group_name)
            .map_err(|e| CompatError::lookup_failed(tenant_id, group_name, "group attributes", e))?;
        if attributes.is_empty() {
            debug!("No group found with name: {} in tenant: {}", group_name, tenant_id);
            return Ok(group);
        }

        let domain = self.normalizer.extract_domain(group_name);
        let mut record = group.unwrap_or_else(|| {
            GroupRecord::named(self.normalizer.resolve_canonical_name(group_name, &domain))
        });
        self.merge_attributes(&mut record, &attributes, attributes.id());
        record.display_name = Some(self.normalizer.strip_domain(group_name).to_string());
        record.user_store_domain = Some(domain);
        Ok(Some(record))
    }

    /// Append the legacy groups matching a single-attribute filter to `results`.
    ///
    /// Compound filters are rejected before the store is touched. Paging and
    /// sorting arguments are not applied.
    pub fn list_groups<D>(
        &self,
        directory: &D,
        request: &ListGroupsRequest,
        results: &mut Vec<GroupRecord>,
    ) -> CompatResult<()>
    where
        D: UserStoreDirectory + ?Sized,
    {
        if self.is_native(directory) {
            return Ok(());
        }

        let tenant_id = directory.tenant_id();
        let expression = match &request.condition {
            FilterCondition::Expression(expression) => expression,
            FilterCondition::Operational(_) => {
                return Err(CompatError::UnsupportedFilter {
                    user_store: directory.domain_name().to_string(),
                });
            }
        };
        trace!(
            "Legacy group listing ignores limit {:?}, offset {:?}, sort by {:?} {:?}",
            request.limit, request.offset, request.sort_by, request.sort_order
        );

        let schema_key = self
            .resolver
            .resolve_schema_key(&expression.attribute_name, tenant_id)?;
        let pattern = build_search_value(
            schema_key,
            expression.operation,
            &expression.attribute_value,
            &self.search_wildcard,
            self.normalizer.separator(),
        )?;

        let domain = request.domain.as_deref();
        let group_names = self
            .gateway
            .search_names(tenant_id, schema_key, &pattern, domain)
            .map_err(|e| {
                CompatError::lookup_failed(tenant_id, domain.unwrap_or_default(), "group list", e)
            })?;
        if group_names.is_empty() {
            debug!(
                "No groups found for the filter in userstore: {} in tenant: {}",
                domain.unwrap_or_default(),
                tenant_id
            );
            return Ok(());
        }

        let groups = group_names
            .iter()
            .map(|group_name| {
                let attributes = self
                    .gateway
                    .lookup_attributes(tenant_id, group_name)
                    .map_err(|e| {
                        CompatError::lookup_failed(tenant_id, group_name, "group attributes", e)
                    })?;
                let mut record = GroupRecord::default();
                self.apply_names(&mut record, group_name);
                self.merge_attributes(&mut record, &attributes, attributes.id());
                Ok(record)
            })
            .collect::<CompatResult<Vec<_>>>()?;

        results.extend(groups);
        Ok(())
    }

    fn is_native<D: UserStoreDirectory + ?Sized>(&self, directory: &D) -> bool {
        let native = GroupIdSource::select(directory).is_native();
        if native {
            debug!(
                "Legacy group hooks will not be executed for userstore: {} in tenant {} since group id support is available in the userstore",
                directory.domain_name(),
                directory.tenant_id()
            );
        }
        native
    }

    fn lookup_name(&self, tenant_id: &str, group_id: &str) -> CompatResult<Option<String>> {
        let group_name = self
            .gateway
            .lookup_name_by_id(tenant_id, group_id)
            .map_err(|e| CompatError::lookup_failed(tenant_id, group_id, "group name", e))?;

        let group_name = non_blank(group_name);
        if group_name.is_none() {
            warn!("No group found with id: {} in tenant: {}", group_id, tenant_id);
        }
        Ok(group_name)
    }

    /// Write canonical name, display name and domain derived from `group_name`.
    fn apply_names(&self, record: &mut GroupRecord, group_name: &str) {
        let domain = self.normalizer.extract_domain(group_name);
        record.name = self.normalizer.resolve_canonical_name(group_name, &domain);
        record.display_name = Some(self.normalizer.strip_domain(group_name).to_string());
        record.user_store_domain = Some(domain);
    }

    fn merge_attributes(
        &self,
        record: &mut GroupRecord,
        attributes: &LegacyAttributeSet,
        location_id: Option<&str>,
    ) {
        if let Some(id) = attributes.id() {
            record.id = Some(id.to_string());
        }
        if let Some(created) = attributes.created() {
            record.created_at = Some(created.to_string());
        }
        if let Some(last_modified) = attributes.last_modified() {
            record.last_modified_at = Some(last_modified.to_string());
        }
        if attributes.has_location() {
            if let Some(id) = location_id {
                record.location = Some(self.location.group_location(id));
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
