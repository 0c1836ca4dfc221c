//! Error types for the policy catalog
//!
//! Covers:
//! - Catalog loading (file read, TOML decoding)
//! - Policy validation (missing active setting, blank names)
//! - Selection failures (nothing enabled)

use std::path::PathBuf;

/// Message written in place of a script when no policy is enabled.
pub const NO_POLICIES_MESSAGE: &str = "Error: No policies were enabled.  Before generating the script, you must enable at least one policy.";

/// Errors raised while loading or selecting from a policy catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Every policy in the catalog is disabled
    #[error("{}", NO_POLICIES_MESSAGE)]
    NoPoliciesEnabled,

    /// An enabled policy has no value at the active setting index
    #[error("policy '{policy}' has no setting at index {index} ({available} configured)")]
    MissingSetting {
        /// Long name of the offending policy
        policy: String,
        /// Requested setting index
        index: usize,
        /// Number of settings the policy provides
        available: usize,
    },

    /// An enabled policy is malformed
    #[error("invalid policy at catalog position {index}: {reason}")]
    InvalidPolicy {
        /// Zero-based position in the catalog
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// The active setting selector points at the baseline entry
    #[error("active setting index {0} is not allowed; index 0 is the baseline")]
    InvalidSelector(usize),

    /// Catalog text is not valid TOML or does not match the schema
    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO error while reading a catalog file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid policy error
    pub fn invalid_policy(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            index,
            reason: reason.into(),
        }
    }

    /// Check if the error stems from the catalog contents rather than IO
    ///
    /// Configuration errors are the ones a user fixes by editing the catalog.
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}
