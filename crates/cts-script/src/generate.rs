//! Script generation entry points
//!
//! [`render_script`] is pure and deterministic; [`write_script`] adds the file
//! handling, including writing the error text in place of the script when
//! generation fails so users without a console can still see what went wrong.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cts_catalog::{PolicyCatalog, Selection};
use serde::Serialize;

use crate::config::ScriptConfig;
use crate::emitter::ScriptEmitter;
use crate::error::ScriptError;
use crate::run::Run;

/// Summary of a successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    /// Where the script was written
    pub path: PathBuf,
    /// Sweep mode used
    pub mode: String,
    /// Enabled policies
    pub policies: usize,
    /// Distinct groups
    pub groups: usize,
    /// Simulator runs in the script
    pub runs: usize,
    /// Script size in bytes
    pub bytes: usize,
}

/// Plan the runs for `selection` under `config`
#[must_use]
pub fn plan_runs(config: &ScriptConfig, selection: &Selection) -> Vec<Run> {
    let procedure = config.mode.procedure(config.reassert_all_on_enable);
    let runs = procedure.plan(selection, config.policy_schedule);
    tracing::debug!(
        "{} sweep planned {} runs over {} groups",
        procedure.name(),
        runs.len(),
        selection.groups().len()
    );
    runs
}

/// Select from `catalog` and plan the runs
///
/// # Errors
/// Returns catalog selection errors and configuration validation errors.
pub fn prepare(
    config: &ScriptConfig,
    catalog: &PolicyCatalog,
) -> Result<(Selection, Vec<Run>), ScriptError> {
    config.validate()?;
    let selection = catalog.select(config.active_setting)?;
    let runs = plan_runs(config, &selection);
    Ok((selection, runs))
}

/// Write a complete script to `out`
///
/// # Errors
/// See [`prepare`]; also propagates sink write failures.
pub fn emit_script<W: Write>(
    config: &ScriptConfig,
    catalog: &PolicyCatalog,
    out: W,
) -> Result<(Selection, Vec<Run>), ScriptError> {
    let (selection, runs) = prepare(config, catalog)?;
    let mut emitter = ScriptEmitter::new(out, config);
    emitter.write_preamble()?;
    emitter.write_runs(&runs)?;
    emitter.finish()?;
    Ok((selection, runs))
}

/// Render the complete script as text
///
/// Identical inputs always produce identical output.
///
/// # Errors
/// See [`emit_script`].
pub fn render_script(config: &ScriptConfig, catalog: &PolicyCatalog) -> Result<String, ScriptError> {
    let mut buf = Vec::new();
    emit_script(config, catalog, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ScriptError::Config(format!("script is not UTF-8: {e}")))
}

/// Generate the script and write it to `config.output_script`
///
/// On failure the error message is written to the output path instead, and
/// the error is returned so the caller can exit non-zero.
///
/// # Errors
/// Any generation error, or [`ScriptError::Io`] if the file cannot be written.
pub fn write_script(config: &ScriptConfig, catalog: &PolicyCatalog) -> Result<ScriptReport, ScriptError> {
    let path = config.output_script.as_path();

    let mut buf = Vec::new();
    let (selection, runs) = match emit_script(config, catalog, &mut buf) {
        Ok(planned) => planned,
        Err(e) => {
            write_error_file(path, &e);
            return Err(e);
        }
    };

    let file = fs::File::create(path).map_err(|e| ScriptError::io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&buf)
        .and_then(|()| writer.flush())
        .map_err(|e| ScriptError::io_error(path, e))?;

    let report = ScriptReport {
        path: path.to_path_buf(),
        mode: config.mode.to_string(),
        policies: selection.policies().len(),
        groups: selection.groups().len(),
        runs: runs.len(),
        bytes: buf.len(),
    };
    tracing::info!(
        "Wrote {} runs ({} policies, {} groups) to {}",
        report.runs,
        report.policies,
        report.groups,
        path.display()
    );
    Ok(report)
}

/// Write `error` to `path` in place of a script
///
/// Failures to write are logged, not returned; the original error is what the
/// caller reports.
pub fn write_error_file(path: &Path, error: &ScriptError) {
    tracing::error!("Script generation failed: {}", error);
    if let Err(io) = fs::write(path, error.to_string()) {
        tracing::error!("Could not write error message to {}: {}", path.display(), io);
    }
}
