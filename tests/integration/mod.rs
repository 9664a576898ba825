//! Integration tests for the legacy group compatibility hooks.
//!
//! ## Test Organization
//!
//! - `feature_gate` - hooks are inert for directories with native group ids
//! - `enrichment_scenarios` - single-group and per-user hooks end to end
//! - `list_groups` - filtered listing, domain scoping and failure handling
//! - `name_properties` - property tests for name normalization
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test lib integration::list_groups
//! ```

pub mod enrichment_scenarios;
pub mod list_groups;
pub mod name_properties;
