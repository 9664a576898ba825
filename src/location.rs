//! SCIM location URLs for groups.

use crate::config::CompatConfig;

/// Builds the `meta.location` URL of a group from its id.
pub trait GroupLocationBuilder {
    fn group_location(&self, group_id: &str) -> String;
}

/// Locations under a SCIM 2.0 endpoint: `<base>/Groups/<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScimEndpointLocation {
    base_url: String,
}

impl ScimEndpointLocation {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &CompatConfig) -> Self {
        Self::new(config.scim_base_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ScimEndpointLocation {
    fn default() -> Self {
        Self::from_config(&CompatConfig::default())
    }
}

impl GroupLocationBuilder for ScimEndpointLocation {
    fn group_location(&self, group_id: &str) -> String {
        format!("{}/Groups/{}", self.base_url, group_id)
    }
}

impl<F> GroupLocationBuilder for F
where
    F: Fn(&str) -> String,
{
    fn group_location(&self, group_id: &str) -> String {
        self(group_id)
    }
}
