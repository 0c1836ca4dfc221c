//! Simulator command lines
//!
//! Each [`ScriptCommand`] renders to exactly one line of the command-script
//! grammar (`SECTION>COMMAND|args`). The consumer parses positionally, so the
//! delimiters here are fixed.

use std::fmt;

/// Model variable that picks the policy implementation schedule file
pub const SCHEDULE_SELECTOR_VARIABLE: &str = "Policy Implementation Schedule Selector";

/// Marker telling the exporter to append to an existing results file
pub const ACCUMULATE_FLAG: &str = "+!";

/// One line of the command script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand<'a> {
    /// `SPECIAL>LOADMODEL|"<model>"`
    LoadModel(&'a str),
    /// `SIMULATE>RUNNAME|<run>`
    RunName(&'a str),
    /// `SPECIAL>NOINTERACTION`
    NoInteraction,
    /// `SIMULATE>SAVELIST|<vars>`
    SaveList(&'a str),
    /// `SIMULATE>SETVAL|<variable>=<value>`
    SetVal {
        /// Model variable, possibly subscripted
        variable: &'a str,
        /// Value to assign
        value: Value,
    },
    /// `MENU>RUN|O`
    Run,
    /// `MENU>VDF2TAB|<run>.vdf|<results>|<vars>|<flag>||||:<annotation>`
    Vdf2Tab {
        /// Run name (the `.vdf` stem)
        run_name: &'a str,
        /// Results table file
        results_file: &'a str,
        /// Output variable list file
        output_vars_file: &'a str,
        /// Append to the results file instead of recreating it
        accumulate: bool,
        /// Tab-prefixed `Key=Value` pairs
        annotation: &'a str,
    },
}

impl fmt::Display for ScriptCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadModel(model) => write!(f, "SPECIAL>LOADMODEL|\"{model}\""),
            Self::RunName(run) => write!(f, "SIMULATE>RUNNAME|{run}"),
            Self::NoInteraction => f.write_str("SPECIAL>NOINTERACTION"),
            Self::SaveList(vars) => write!(f, "SIMULATE>SAVELIST|{vars}"),
            Self::SetVal { variable, value } => write!(f, "SIMULATE>SETVAL|{variable}={value}"),
            Self::Run => f.write_str("MENU>RUN|O"),
            Self::Vdf2Tab {
                run_name,
                results_file,
                output_vars_file,
                accumulate,
                annotation,
            } => {
                let flag = if *accumulate { ACCUMULATE_FLAG } else { "" };
                write!(
                    f,
                    "MENU>VDF2TAB|{run_name}.vdf|{results_file}|{output_vars_file}|{flag}||||:{annotation}"
                )
            }
        }
    }
}

/// Numeric value as written into SETVAL lines
///
/// Uses the shortest decimal form that round-trips: `1`, `0.5`, `-0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Policy level
    Float(f64),
    /// Integer selector
    Integer(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // -0.0 prints as "-0"
            Self::Float(v) if *v == 0.0 => f.write_str("0"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
        }
    }
}
