//! Policy definitions
//!
//! A [`Policy`] is one tunable lever in the simulation model. The
//! [`SettingSelector`] decides which of its candidate levels is applied when
//! the policy is switched on.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One tunable lever in the simulation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Whether this policy takes part in the generated script
    #[serde(default)]
    pub enabled: bool,

    /// Model variable name, possibly subscripted (`Name[a,b]`)
    pub long_name: String,

    /// Human-readable label used in run annotations
    pub short_name: String,

    /// Candidate levels; index 0 is the baseline
    #[serde(default)]
    pub settings: Vec<f64>,

    /// Group the policy is toggled with
    pub group: String,
}

impl Policy {
    /// Create a disabled policy with no settings
    #[inline]
    #[must_use]
    pub fn new(
        long_name: impl Into<String>,
        short_name: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            enabled: false,
            long_name: long_name.into(),
            short_name: short_name.into(),
            settings: Vec::new(),
            group: group.into(),
        }
    }

    /// With candidate settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: impl Into<Vec<f64>>) -> Self {
        self.settings = settings.into();
        self
    }

    /// With enabled flag
    #[inline]
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Setting value at `selector`, if configured
    #[inline]
    #[must_use]
    pub fn setting(&self, selector: SettingSelector) -> Option<f64> {
        self.settings.get(selector.index()).copied()
    }

    /// Check that an enabled policy is usable with `selector` and return the
    /// selected level
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidPolicy`] for blank names or groups and
    /// [`CatalogError::MissingSetting`] when the selected level is absent.
    pub fn validate(&self, position: usize, selector: SettingSelector) -> Result<f64, CatalogError> {
        if self.long_name.trim().is_empty() {
            return Err(CatalogError::invalid_policy(position, "long name is empty"));
        }
        if self.short_name.trim().is_empty() {
            return Err(CatalogError::invalid_policy(
                position,
                format!("short name of '{}' is empty", self.long_name),
            ));
        }
        if self.group.trim().is_empty() {
            return Err(CatalogError::invalid_policy(
                position,
                format!("group of '{}' is empty", self.long_name),
            ));
        }
        match self.setting(selector) {
            Some(value) if value.is_finite() => Ok(value),
            Some(value) => Err(CatalogError::invalid_policy(
                position,
                format!("'{}' has non-finite setting {value}", self.long_name),
            )),
            None => Err(CatalogError::MissingSetting {
                policy: self.long_name.clone(),
                index: selector.index(),
                available: self.settings.len(),
            }),
        }
    }
}

/// Chooses which entry of a policy's settings is the active level
///
/// Defaults to index 1, the first non-baseline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SettingSelector(usize);

impl SettingSelector {
    /// Index applied when nothing else is configured
    pub const DEFAULT_INDEX: usize = 1;

    /// Create a selector for `index`
    ///
    /// # Errors
    /// Index 0 is the baseline and is rejected.
    #[inline]
    pub fn new(index: usize) -> Result<Self, CatalogError> {
        if index == 0 {
            return Err(CatalogError::InvalidSelector(index));
        }
        Ok(Self(index))
    }

    /// Selected index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Default for SettingSelector {
    fn default() -> Self {
        Self(Self::DEFAULT_INDEX)
    }
}

impl TryFrom<usize> for SettingSelector {
    type Error = CatalogError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<SettingSelector> for usize {
    fn from(selector: SettingSelector) -> Self {
        selector.0
    }
}
