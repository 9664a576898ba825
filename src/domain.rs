//! User-store domain handling for group names.
//!
//! Group names may carry a domain qualifier naming the user-store partition
//! they live in (`SECONDARY/admins`). Names in the primary domain are shown
//! without a qualifier, so `PRIMARY/admins` and `admins` denote the same group.
//! [`NameNormalizer`] converts between the qualified, display and canonical
//! forms.
//!
//! ```rust
//! use scim_group_compat::domain::NameNormalizer;
//!
//! let normalizer = NameNormalizer::default();
//!
//! assert_eq!(normalizer.extract_domain("secondary/admins"), "SECONDARY");
//! assert_eq!(normalizer.strip_domain("SECONDARY/admins"), "admins");
//! assert_eq!(normalizer.resolve_canonical_name("PRIMARY/admins", "PRIMARY"), "admins");
//! assert_eq!(normalizer.resolve_canonical_name("admins", "SECONDARY"), "SECONDARY/admins");
//! ```

use crate::config::{CompatConfig, DOMAIN_SEPARATOR, PRIMARY_DEFAULT_DOMAIN_NAME};

/// Domains spelled with a leading capital instead of upper case.
const TITLE_CASE_DOMAINS: [&str; 3] = ["Internal", "Application", "Workflow"];

/// Pure name conversions between qualified and unqualified group names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameNormalizer {
    primary_domain: String,
    separator: char,
}

impl NameNormalizer {
    pub fn new(primary_domain: impl Into<String>, separator: char) -> Self {
        Self {
            primary_domain: primary_domain.into(),
            separator,
        }
    }

    pub fn from_config(config: &CompatConfig) -> Self {
        Self::new(config.primary_domain.clone(), config.domain_separator)
    }

    pub fn primary_domain(&self) -> &str {
        &self.primary_domain
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Whether `domain` names the primary user store.
    pub fn is_primary_domain(&self, domain: &str) -> bool {
        self.primary_domain.eq_ignore_ascii_case(domain)
    }

    /// A name is qualified when the separator appears after at least one character.
    pub fn is_qualified(&self, name: &str) -> bool {
        self.separator_index(name).is_some()
    }

    /// Remove the domain qualifier, leaving unqualified names untouched.
    pub fn strip_domain<'a>(&self, qualified_name: &'a str) -> &'a str {
        match self.separator_index(qualified_name) {
            Some(index) => &qualified_name[index + self.separator.len_utf8()..],
            None => qualified_name,
        }
    }

    /// The upper-cased domain qualifier, or the primary domain for unqualified names.
    pub fn extract_domain(&self, qualified_name: &str) -> String {
        match self.separator_index(qualified_name) {
            Some(index) => qualified_name[..index].to_uppercase(),
            None => self.primary_domain.clone(),
        }
    }

    /// Prefix `name` with `domain`.
    ///
    /// Names containing the separator anywhere, and the primary domain, are
    /// left as is.
    pub fn add_domain(&self, name: &str, domain: &str) -> String {
        if domain.is_empty() || name.contains(self.separator) || self.is_primary_domain(domain) {
            return name.to_string();
        }

        format!("{}{}{}", self.qualifier_spelling(domain), self.separator, name)
    }

    /// The name written back into a group record: the display name for
    /// primary-domain groups, the qualified name for everything else.
    ///
    /// Only a leading primary qualifier is removed, so a primary-domain
    /// display name that itself contains the separator survives a second pass.
    pub fn resolve_canonical_name(&self, name: &str, domain: &str) -> String {
        if self.is_primary_domain(domain) {
            if self.is_primary_domain(&self.extract_domain(name)) {
                return self.strip_domain(name).to_string();
            }
            return name.to_string();
        }
        self.add_domain(name, domain)
    }

    fn separator_index(&self, name: &str) -> Option<usize> {
        name.find(self.separator).filter(|index| *index > 0)
    }

    fn qualifier_spelling(&self, domain: &str) -> String {
        TITLE_CASE_DOMAINS
            .iter()
            .find(|special| special.eq_ignore_ascii_case(domain))
            .map(|special| special.to_string())
            .unwrap_or_else(|| domain.to_uppercase())
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(PRIMARY_DEFAULT_DOMAIN_NAME, DOMAIN_SEPARATOR)
    }
}
