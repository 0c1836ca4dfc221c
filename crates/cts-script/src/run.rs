//! Planned simulator runs
//!
//! A [`Run`] is everything one simulation needs: the policy assignments, the
//! schedule selector, and the annotation recorded next to its results.

use std::fmt;

use serde::Serialize;

/// One `SETVAL` of a policy variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// Model variable name
    pub variable: String,
    /// Level applied
    pub value: f64,
}

/// Whether the sweep switches groups on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToggleKind {
    /// Groups are enabled one at a time near BAU
    Enabled,
    /// Groups are disabled one at a time near the full-policy case
    Disabled,
}

impl ToggleKind {
    /// Annotation key prefix
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }
}

/// Which group a run toggled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RunScope {
    /// No group toggled (the reference run)
    None,
    /// A single group toggled
    Group {
        /// Group name
        name: String,
        /// Short names of the toggled policies, in selection order
        policies: Vec<String>,
    },
    /// Every group toggled
    All,
}

/// Metadata written next to a run's results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Enabled or Disabled sweep
    pub kind: ToggleKind,
    /// Group the run is about
    pub scope: RunScope,
}

impl Annotation {
    /// Create annotation
    #[inline]
    #[must_use]
    pub fn new(kind: ToggleKind, scope: RunScope) -> Self {
        Self { kind, scope }
    }

    /// Value of the `<Kind>PolicyGroup` field
    #[must_use]
    pub fn group_label(&self) -> &str {
        match &self.scope {
            RunScope::None => "None",
            RunScope::Group { name, .. } => name,
            RunScope::All => "All",
        }
    }

    /// Value of the `<Kind>Policies` field
    #[must_use]
    pub fn policies_label(&self) -> String {
        match &self.scope {
            RunScope::None => "None".to_string(),
            RunScope::Group { policies, .. } => policies.join(", "),
            RunScope::All => "All".to_string(),
        }
    }
}

impl fmt::Display for Annotation {
    /// Tab-prefixed `Key=Value` pairs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.as_str();
        write!(
            f,
            "\t{kind}PolicyGroup={}\t{kind}Policies={}",
            self.group_label(),
            self.policies_label()
        )
    }
}

/// One simulator invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    assignments: Vec<Assignment>,
    schedule: u32,
    annotation: Annotation,
}

impl Run {
    /// Create run
    #[inline]
    #[must_use]
    pub fn new(assignments: Vec<Assignment>, schedule: u32, annotation: Annotation) -> Self {
        Self {
            assignments,
            schedule,
            annotation,
        }
    }

    /// Policy assignments, in selection order
    #[inline]
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Policy implementation schedule number
    #[inline]
    #[must_use]
    pub fn schedule(&self) -> u32 {
        self.schedule
    }

    /// Results annotation
    #[inline]
    #[must_use]
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Check whether `variable` is assigned in this run
    #[must_use]
    pub fn assigns(&self, variable: &str) -> bool {
        self.assignments.iter().any(|a| a.variable == variable)
    }
}
