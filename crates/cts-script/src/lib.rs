//! CTS Script Generation
//!
//! Plans contribution sweeps over a policy selection and writes them as a
//! simulator command script.
//!
//! # Core Concepts
//!
//! - [`SweepProcedure`]: plans the ordered runs of a sweep
//! - [`DisableSweep`]: one group off per run, near the full-policy case
//! - [`EnableSweep`]: one group on per run, near BAU
//! - [`ScriptEmitter`]: writes the preamble and runs line by line
//! - [`ScriptConfig`]: file names, run name, mode and schedule
//!
//! # Example
//!
//! ```
//! use cts_catalog::{Policy, PolicyCatalog};
//! use cts_script::{render_script, ScriptConfig, SweepMode};
//!
//! let catalog = PolicyCatalog::new()
//!     .with_policy(Policy::new("Boolean EV Perks", "EV Perks", "EV").with_settings(vec![0.0, 1.0]).with_enabled(true));
//! let config = ScriptConfig::new().with_mode(SweepMode::Disable);
//!
//! let script = render_script(&config, &catalog).unwrap();
//! assert_eq!(script.matches("MENU>RUN|O").count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod command;
mod config;
mod emitter;
pub mod error;
mod generate;
mod run;
mod sweep;

pub use command::{ScriptCommand, Value, ACCUMULATE_FLAG, SCHEDULE_SELECTOR_VARIABLE};
pub use config::ScriptConfig;
pub use emitter::ScriptEmitter;
pub use error::ScriptError;
pub use generate::{emit_script, plan_runs, prepare, render_script, write_error_file, write_script, ScriptReport};
pub use run::{Annotation, Assignment, Run, RunScope, ToggleKind};
pub use sweep::{DisableSweep, EnableSweep, SweepMode, SweepProcedure};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
