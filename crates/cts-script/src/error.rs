//! Error types for script generation

use cts_catalog::CatalogError;
use std::path::PathBuf;

/// Errors raised while planning or writing a command script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Catalog could not be loaded or selected from
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Sweep mode string not recognised
    #[error("unknown sweep mode '{0}' (expected 'Enable' or 'Disable')")]
    UnknownMode(String),

    /// Configuration value cannot be used
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML or has unknown keys
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error on a named file
    #[error("io error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Write to the script sink failed
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

impl ScriptError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the user must change configuration to fix this
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::Catalog(e) => e.is_configuration_error(),
            Self::UnknownMode(_) | Self::Config(_) | Self::ConfigParse(_) => true,
            Self::Io { .. } | Self::Write(_) => false,
        }
    }

    /// Check if no policy was enabled
    #[inline]
    #[must_use]
    pub fn is_no_policies(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::NoPoliciesEnabled))
    }
}
