//! SCIM schema keys for group metadata and the filter attribute resolver.
//!
//! The legacy metadata store keys every group attribute by its SCIM core
//! schema URI. Callers filter by the logical attribute name instead
//! (`displayName`, `meta.created`, ...), so list operations first translate
//! that name into a schema key with [`AttributeSchemaResolver`].

use crate::error::{CompatError, CompatResult};
use serde::{Deserialize, Serialize};

pub const ID_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:id";
pub const EXTERNAL_ID_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:externalId";
pub const CREATED_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:meta.created";
pub const LAST_MODIFIED_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:meta.lastModified";
pub const LOCATION_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:meta.location";
pub const GROUP_DISPLAY_NAME_URI: &str = "urn:ietf:params:scim:schemas:core:2.0:Group:displayName";

pub const ID: &str = "id";
pub const EXTERNAL_ID: &str = "externalId";
pub const CREATED: &str = "meta.created";
pub const LAST_MODIFIED: &str = "meta.lastModified";
pub const LOCATION: &str = "meta.location";
pub const DISPLAY_NAME: &str = "displayName";

/// One entry of the group attribute schema mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMapping {
    /// Schema URI the legacy store keys the attribute by
    pub schema_key: String,
    /// Logical attribute name used in filters
    pub attribute_name: String,
}

impl SchemaMapping {
    pub fn new(schema_key: impl Into<String>, attribute_name: impl Into<String>) -> Self {
        Self {
            schema_key: schema_key.into(),
            attribute_name: attribute_name.into(),
        }
    }
}

/// The standard SCIM group attributes the legacy store knows about.
pub fn default_group_attribute_schema() -> Vec<SchemaMapping> {
    vec![
        SchemaMapping::new(ID_URI, ID),
        SchemaMapping::new(EXTERNAL_ID_URI, EXTERNAL_ID),
        SchemaMapping::new(CREATED_URI, CREATED),
        SchemaMapping::new(LAST_MODIFIED_URI, LAST_MODIFIED),
        SchemaMapping::new(LOCATION_URI, LOCATION),
        SchemaMapping::new(GROUP_DISPLAY_NAME_URI, DISPLAY_NAME),
    ]
}

/// Translates logical filter attribute names into legacy schema keys.
#[derive(Debug, Clone)]
pub struct AttributeSchemaResolver {
    mappings: Vec<SchemaMapping>,
}

impl AttributeSchemaResolver {
    pub fn new(mappings: Vec<SchemaMapping>) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &[SchemaMapping] {
        &self.mappings
    }

    /// Find the schema key whose logical name matches `attribute_name`,
    /// ignoring case.
    ///
    /// Every entry is scanned and the last match is kept, so when two keys
    /// map to the same name the one later in the mapping is returned.
    pub fn resolve_schema_key(&self, attribute_name: &str, tenant_id: &str) -> CompatResult<&str> {
        if attribute_name.trim().is_empty() {
            return Err(CompatError::InvalidAttribute {
                tenant_id: tenant_id.to_string(),
            });
        }

        let mut schema_key = None;
        for mapping in &self.mappings {
            if mapping.attribute_name.eq_ignore_ascii_case(attribute_name) {
                schema_key = Some(mapping.schema_key.as_str());
            }
        }

        schema_key.ok_or_else(|| CompatError::NoSchemaMapping {
            attribute: attribute_name.to_string(),
            tenant_id: tenant_id.to_string(),
        })
    }
}

impl Default for AttributeSchemaResolver {
    fn default() -> Self {
        Self::new(default_group_attribute_schema())
    }
}
