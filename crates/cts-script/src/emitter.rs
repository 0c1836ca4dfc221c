//! Script emitter
//!
//! Writes the preamble and planned runs to any [`Write`] sink. The simulator
//! executes the script top to bottom and every `SETVAL` mutates its state, so
//! lines are written strictly in the order given.

use std::io::Write;

use crate::command::{ScriptCommand, Value, SCHEDULE_SELECTOR_VARIABLE};
use crate::config::{check_field, ScriptConfig};
use crate::error::ScriptError;
use crate::run::Run;

/// Sequential command-script writer
#[derive(Debug)]
pub struct ScriptEmitter<'c, W: Write> {
    out: W,
    config: &'c ScriptConfig,
    runs_written: usize,
}

impl<'c, W: Write> ScriptEmitter<'c, W> {
    /// Create emitter over `out`
    #[inline]
    pub fn new(out: W, config: &'c ScriptConfig) -> Self {
        Self {
            out,
            config,
            runs_written: 0,
        }
    }

    fn line(&mut self, command: &ScriptCommand<'_>) -> Result<(), ScriptError> {
        writeln!(self.out, "{command}")?;
        Ok(())
    }

    /// Write model loading and run naming, followed by a blank line
    ///
    /// # Errors
    /// Propagates sink write failures.
    pub fn write_preamble(&mut self) -> Result<(), ScriptError> {
        let config = self.config;
        self.line(&ScriptCommand::LoadModel(&config.model_file))?;
        self.line(&ScriptCommand::RunName(&config.run_name))?;
        if config.no_interaction {
            self.line(&ScriptCommand::NoInteraction)?;
        }
        if config.save_list {
            self.line(&ScriptCommand::SaveList(&config.output_vars_file))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Write one run: assignments, schedule selector, run, export
    ///
    /// The first run exported recreates the results file; later runs append.
    ///
    /// # Errors
    /// Returns [`ScriptError::Config`] if a variable or annotation would break
    /// the line format, otherwise propagates sink write failures.
    pub fn write_run(&mut self, run: &Run) -> Result<(), ScriptError> {
        let config = self.config;

        for assignment in run.assignments() {
            check_field("policy variable", &assignment.variable)?;
            self.line(&ScriptCommand::SetVal {
                variable: &assignment.variable,
                value: Value::Float(assignment.value),
            })?;
        }
        self.line(&ScriptCommand::SetVal {
            variable: SCHEDULE_SELECTOR_VARIABLE,
            value: Value::Integer(i64::from(run.schedule())),
        })?;
        self.line(&ScriptCommand::Run)?;

        let annotation = run.annotation();
        check_field("group name", annotation.group_label())?;
        check_field("policy labels", &annotation.policies_label())?;
        let annotation = annotation.to_string();
        self.line(&ScriptCommand::Vdf2Tab {
            run_name: &config.run_name,
            results_file: &config.results_file,
            output_vars_file: &config.output_vars_file,
            accumulate: self.runs_written > 0,
            annotation: &annotation,
        })?;
        writeln!(self.out)?;

        self.runs_written += 1;
        tracing::debug!("Wrote run {}{}", self.runs_written, annotation.replace('\t', " "));
        Ok(())
    }

    /// Write every run in order
    ///
    /// # Errors
    /// Stops at the first failing run.
    pub fn write_runs<'r>(&mut self, runs: impl IntoIterator<Item = &'r Run>) -> Result<(), ScriptError> {
        for run in runs {
            self.write_run(run)?;
        }
        Ok(())
    }

    /// Number of runs written so far
    #[inline]
    #[must_use]
    pub fn runs_written(&self) -> usize {
        self.runs_written
    }

    /// Flush and return the sink
    ///
    /// # Errors
    /// Propagates flush failures.
    pub fn finish(mut self) -> Result<W, ScriptError> {
        self.out.flush()?;
        Ok(self.out)
    }
}
