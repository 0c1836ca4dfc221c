//! Policy catalog
//!
//! Ordered collection of every known [`Policy`]. Catalogs are plain TOML data:
//!
//! ```toml
//! policy = [
//!     { enabled = true, long_name = "Boolean EV Perks", short_name = "Electric Vehicle Perks", settings = [0, 1], group = "EV Perks" },
//! ]
//! ```
//!
//! `[[policy]]` tables are accepted as well.

use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::policy::{Policy, SettingSelector};
use crate::selection::Selection;

/// Built-in EPS policy table
const BUILTIN_CATALOG: &str = include_str!("../data/eps_policies.toml");

/// Ordered collection of policy definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyCatalog {
    #[serde(rename = "policy", default)]
    policies: Vec<Policy>,
}

impl PolicyCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog compiled into the binary
    ///
    /// # Errors
    /// Only fails if the embedded table is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse catalog from TOML text
    ///
    /// # Errors
    /// Returns [`CatalogError::Parse`] on invalid TOML or schema mismatch.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(text)?;
        tracing::debug!("Parsed catalog with {} policies", catalog.len());
        Ok(catalog)
    }

    /// Read catalog from a TOML file
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Append a policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Append a policy in place
    #[inline]
    pub fn push(&mut self, policy: Policy) {
        self.policies.push(policy);
    }

    /// All policies, in catalog order
    #[inline]
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Number of policies, enabled or not
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Number of enabled policies
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.policies.iter().filter(|p| p.enabled).count()
    }

    /// Every group name in the catalog, enabled or not, in first-occurrence order
    #[must_use]
    pub fn group_names(&self) -> Vec<&str> {
        let names: IndexSet<&str> = self.policies.iter().map(|p| p.group.as_str()).collect();
        names.into_iter().collect()
    }

    /// Enable every policy belonging to `group`
    ///
    /// Returns how many policies matched.
    pub fn enable_group(&mut self, group: &str) -> usize {
        let mut matched = 0;
        for policy in self.policies.iter_mut().filter(|p| p.group == group) {
            policy.enabled = true;
            matched += 1;
        }
        matched
    }

    /// Enable the policy with this long name
    ///
    /// Returns `false` if no policy has that name.
    pub fn enable_policy(&mut self, long_name: &str) -> bool {
        match self.policies.iter_mut().find(|p| p.long_name == long_name) {
            Some(policy) => {
                policy.enabled = true;
                true
            }
            None => false,
        }
    }

    /// Disable every policy
    pub fn disable_all(&mut self) {
        for policy in &mut self.policies {
            policy.enabled = false;
        }
    }

    /// Run the selection filter over this catalog
    ///
    /// # Errors
    /// See [`Selection::from_catalog`].
    #[inline]
    pub fn select(&self, selector: SettingSelector) -> Result<Selection, CatalogError> {
        Selection::from_catalog(self, selector)
    }
}

impl FromIterator<Policy> for PolicyCatalog {
    fn from_iter<I: IntoIterator<Item = Policy>>(iter: I) -> Self {
        Self {
            policies: iter.into_iter().collect(),
        }
    }
}
