//! Script generation settings
//!
//! Every field has a compiled-in default, so an empty TOML file is a valid
//! configuration:
//!
//! ```toml
//! model_file = "EPS.mdl"
//! mode = "Enable"
//! policy_schedule = 2
//! ```

use std::path::{Path, PathBuf};

use cts_catalog::SettingSelector;
use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::sweep::SweepMode;

/// Settings for one script generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    /// Model file loaded by the simulator
    pub model_file: String,
    /// Where the generated script is written
    pub output_script: PathBuf,
    /// Results table the simulator exports into
    pub results_file: String,
    /// List of variables to export
    pub output_vars_file: String,
    /// Name shared by every run (and its `.vdf` file)
    pub run_name: String,
    /// Enable or Disable sweep
    pub mode: SweepMode,
    /// Policy implementation schedule file number
    pub policy_schedule: u32,
    /// Which setting entry counts as "on"
    pub active_setting: SettingSelector,
    /// Re-assert every policy in the final Enable-mode run
    pub reassert_all_on_enable: bool,
    /// Emit `SPECIAL>NOINTERACTION` after the preamble
    pub no_interaction: bool,
    /// Emit `SIMULATE>SAVELIST` with the output vars file
    pub save_list: bool,
    /// Policy catalog file; the built-in table is used when absent
    pub catalog: Option<PathBuf>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            model_file: "EPS.mdl".to_string(),
            output_script: PathBuf::from("GeneratedContributionTestScript.cmd"),
            results_file: "ContributionTestResults.tsv".to_string(),
            output_vars_file: "OutputVarsToExport.lst".to_string(),
            run_name: "MostRecentRun".to_string(),
            mode: SweepMode::default(),
            policy_schedule: 1,
            active_setting: SettingSelector::default(),
            reassert_all_on_enable: true,
            no_interaction: false,
            save_list: false,
            catalog: None,
        }
    }
}

impl ScriptConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ScriptError::ConfigParse`] on invalid TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(text)?)
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ScriptError::Io`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ScriptError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }

    /// With sweep mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: SweepMode) -> Self {
        self.mode = mode;
        self
    }

    /// With output script path
    #[inline]
    #[must_use]
    pub fn with_output_script(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_script = path.into();
        self
    }

    /// With model file
    #[inline]
    #[must_use]
    pub fn with_model_file(mut self, model_file: impl Into<String>) -> Self {
        self.model_file = model_file.into();
        self
    }

    /// With run name
    #[inline]
    #[must_use]
    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = run_name.into();
        self
    }

    /// With policy schedule
    #[inline]
    #[must_use]
    pub fn with_policy_schedule(mut self, schedule: u32) -> Self {
        self.policy_schedule = schedule;
        self
    }

    /// With active setting selector
    #[inline]
    #[must_use]
    pub fn with_active_setting(mut self, selector: SettingSelector) -> Self {
        self.active_setting = selector;
        self
    }

    /// With preamble options
    #[inline]
    #[must_use]
    pub fn with_preamble_options(mut self, no_interaction: bool, save_list: bool) -> Self {
        self.no_interaction = no_interaction;
        self.save_list = save_list;
        self
    }

    /// Check that every name can be written into a single script field
    ///
    /// # Errors
    /// Returns [`ScriptError::Config`] for empty names or names containing the
    /// field delimiter, tabs, or line breaks. The model name is quoted in the
    /// script, so it may not contain `"` either.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let fields = [
            ("model_file", self.model_file.as_str()),
            ("results_file", self.results_file.as_str()),
            ("output_vars_file", self.output_vars_file.as_str()),
            ("run_name", self.run_name.as_str()),
        ];
        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(ScriptError::Config(format!("{key} is empty")));
            }
            check_field(key, value)?;
        }
        if self.model_file.contains('"') {
            return Err(ScriptError::Config(format!(
                "model_file '{}' contains a double quote",
                self.model_file.escape_debug()
            )));
        }
        if self.output_script.as_os_str().is_empty() {
            return Err(ScriptError::Config("output_script is empty".to_string()));
        }
        Ok(())
    }
}

/// Reject characters that would break the line-oriented script format
pub(crate) fn check_field(key: &str, value: &str) -> Result<(), ScriptError> {
    if let Some(c) = value.chars().find(|c| matches!(c, '|' | '\t' | '\n' | '\r')) {
        return Err(ScriptError::Config(format!(
            "{key} '{}' contains forbidden character {c:?}",
            value.escape_debug()
        )));
    }
    Ok(())
}
