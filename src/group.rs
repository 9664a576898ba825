//! The group record exchanged with the directory.

use serde::{Deserialize, Serialize};

/// One directory group as seen by callers.
///
/// Records arrive from the directory operation (possibly half populated) and
/// are filled in place by the enrichment engine. Fields are only ever set or
/// overwritten, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    /// Stable group identifier, absent until resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Canonical group name; qualified unless the group is in the primary domain
    pub name: String,
    /// Group name without the domain qualifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Domain qualifier extracted from the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_store_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<String>,
    /// SCIM location, derived from the id
    #[serde(rename = "locationURL", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl GroupRecord {
    /// Create a record that only knows its name, as directories return them
    /// when listing a user's groups.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a record with an id and no name yet.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Create a record with both id and name.
    pub fn new(id: Option<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn user_store_domain(&self) -> Option<&str> {
        self.user_store_domain.as_deref()
    }
}
