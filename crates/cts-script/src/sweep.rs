//! Sweep procedures
//!
//! Provides the [`SweepProcedure`] trait and the two procedures that decide
//! what each run toggles:
//!
//! - [`DisableSweep`]: start from every group on, switch one group off per run
//! - [`EnableSweep`]: start from BAU, switch one group on per run
//!
//! Both plan `groups + 2` runs.

use std::fmt;
use std::str::FromStr;

use cts_catalog::{SelectedPolicy, Selection};
use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::run::{Annotation, Assignment, Run, RunScope, ToggleKind};

/// Plans the ordered runs of a contribution sweep
pub trait SweepProcedure: fmt::Debug {
    /// Runs to perform, in execution order
    ///
    /// `schedule` is written into every run's schedule selector.
    fn plan(&self, selection: &Selection, schedule: u32) -> Vec<Run>;

    /// Annotation prefix used by this procedure
    fn kind(&self) -> ToggleKind;

    /// Procedure name (for logs)
    fn name(&self) -> &'static str;
}

/// Sweep mode selected by configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SweepMode {
    /// Enable one group at a time near BAU
    #[serde(alias = "enable", alias = "ENABLE")]
    Enable,
    /// Disable one group at a time near the full-policy case
    #[default]
    #[serde(alias = "disable", alias = "DISABLE")]
    Disable,
}

impl SweepMode {
    /// Procedure implementing this mode
    ///
    /// `reassert_all` only affects [`SweepMode::Enable`]; see [`EnableSweep`].
    #[must_use]
    pub fn procedure(self, reassert_all: bool) -> Box<dyn SweepProcedure> {
        match self {
            Self::Enable => Box::new(EnableSweep::new().with_reassert_all(reassert_all)),
            Self::Disable => Box::new(DisableSweep::new()),
        }
    }
}

impl FromStr for SweepMode {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            _ => Err(ScriptError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enable => "Enable",
            Self::Disable => "Disable",
        })
    }
}

fn assign<'a>(policies: impl IntoIterator<Item = &'a SelectedPolicy>) -> Vec<Assignment> {
    policies
        .into_iter()
        .map(|p| Assignment {
            variable: p.long_name().to_string(),
            value: p.value(),
        })
        .collect()
}

fn short_names<'a>(policies: impl IntoIterator<Item = &'a SelectedPolicy>) -> Vec<String> {
    policies
        .into_iter()
        .map(|p| p.short_name().to_string())
        .collect()
}

/// Tests each group's contribution near the full-policy case
///
/// 1. every policy on (`None`)
/// 2. per group: every policy outside the group on (`<group>`)
/// 3. nothing on, the BAU case (`All`)
#[derive(Debug, Clone, Copy, Default)]
pub struct DisableSweep;

impl DisableSweep {
    /// Create procedure
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SweepProcedure for DisableSweep {
    fn plan(&self, selection: &Selection, schedule: u32) -> Vec<Run> {
        let kind = self.kind();
        let mut runs = Vec::with_capacity(selection.groups().len() + 2);

        runs.push(Run::new(
            assign(selection.policies()),
            schedule,
            Annotation::new(kind, RunScope::None),
        ));

        for group in selection.groups() {
            let scope = RunScope::Group {
                name: group.name().to_string(),
                policies: short_names(selection.members(group)),
            };
            runs.push(Run::new(
                assign(selection.non_members(group)),
                schedule,
                Annotation::new(kind, scope),
            ));
        }

        runs.push(Run::new(Vec::new(), schedule, Annotation::new(kind, RunScope::All)));
        runs
    }

    fn kind(&self) -> ToggleKind {
        ToggleKind::Disabled
    }

    fn name(&self) -> &'static str {
        "disable"
    }
}

/// Tests each group's contribution near BAU
///
/// 1. nothing on (`None`)
/// 2. per group: only the group's policies on (`<group>`)
/// 3. every policy on (`All`)
///
/// Simulator assignments do not carry over between runs, so the final run
/// re-asserts every policy by default. With `reassert_all` off it emits only
/// the schedule selector, as older scripts did.
#[derive(Debug, Clone, Copy)]
pub struct EnableSweep {
    reassert_all: bool,
}

impl EnableSweep {
    /// Create procedure that re-asserts every policy in the final run
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { reassert_all: true }
    }

    /// Set whether the final run re-asserts every policy
    #[inline]
    #[must_use]
    pub fn with_reassert_all(mut self, reassert_all: bool) -> Self {
        self.reassert_all = reassert_all;
        self
    }
}

impl Default for EnableSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepProcedure for EnableSweep {
    fn plan(&self, selection: &Selection, schedule: u32) -> Vec<Run> {
        let kind = self.kind();
        let mut runs = Vec::with_capacity(selection.groups().len() + 2);

        runs.push(Run::new(Vec::new(), schedule, Annotation::new(kind, RunScope::None)));

        for group in selection.groups() {
            let scope = RunScope::Group {
                name: group.name().to_string(),
                policies: short_names(selection.members(group)),
            };
            runs.push(Run::new(
                assign(selection.members(group)),
                schedule,
                Annotation::new(kind, scope),
            ));
        }

        let all = if self.reassert_all {
            assign(selection.policies())
        } else {
            Vec::new()
        };
        runs.push(Run::new(all, schedule, Annotation::new(kind, RunScope::All)));
        runs
    }

    fn kind(&self) -> ToggleKind {
        ToggleKind::Enabled
    }

    fn name(&self) -> &'static str {
        "enable"
    }
}
