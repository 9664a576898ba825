//! Legacy SCIM group compatibility layer for multi-tenant user stores.
//!
//! Some user stores cannot hand out stable group ids. For those, SCIM group
//! metadata (id, timestamps, location) lives in a legacy side table keyed by
//! tenant and domain-qualified group name. This crate provides the hooks that
//! run after a directory's group read and list operations and complete their
//! results from that table, leaving stores with native group ids untouched.
//!
//! # Core Components
//!
//! - [`GroupEnrichmentEngine`] - The post-operation hooks
//! - [`LegacyGroupGateway`] - Trait for legacy metadata stores
//! - [`NameNormalizer`] - Domain-qualified group name handling
//! - [`AttributeSchemaResolver`] - Filter attribute to schema key translation
//!
//! # Quick Start
//!
//! ```rust
//! use scim_group_compat::{GroupEnrichmentEngine, GroupRecord, StaticDirectory};
//! use scim_group_compat::storage::InMemoryLegacyGroupStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryLegacyGroupStore::new();
//! store.add_group("tenant1", "admins")?;
//!
//! let engine = GroupEnrichmentEngine::new(store);
//! let directory = StaticDirectory::legacy("tenant1", "PRIMARY");
//!
//! let mut groups = vec![GroupRecord::named("admins")];
//! engine.enrich_groups_for_user(&directory, "user-1", &mut groups)?;
//! assert!(groups[0].id.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod directory;
pub mod domain;
pub mod engine;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod group;
pub mod location;
pub mod schema;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::{CompatConfig, CompatConfigBuilder, ConfigurationError};
pub use directory::{GroupIdSource, StaticDirectory, UserStoreDirectory};
pub use domain::NameNormalizer;
pub use engine::{GroupEnrichmentEngine, ListGroupsRequest};
pub use error::{CompatError, CompatResult};
pub use filter::{ExpressionCondition, FilterCondition, FilterOperation, OperationalCondition};
pub use gateway::{GatewayError, LegacyAttributeSet, LegacyGroupGateway};
pub use group::GroupRecord;
pub use location::{GroupLocationBuilder, ScimEndpointLocation};
pub use schema::{AttributeSchemaResolver, SchemaMapping};
