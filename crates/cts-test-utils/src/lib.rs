//! Testing utilities for CTS workspace
//!
//! Synthetic catalogs, proptest strategies, and a small reader that splits a
//! generated script back into runs for assertions.

#![allow(missing_docs)]

use cts_catalog::{Policy, PolicyCatalog};
use cts_script::{ScriptConfig, SCHEDULE_SELECTOR_VARIABLE};
use proptest::prelude::*;
use std::path::Path;

pub fn policy(long_name: &str, group: &str, settings: &[f64]) -> Policy {
    Policy::new(long_name, format!("{long_name} label"), group)
        .with_settings(settings.to_vec())
        .with_enabled(true)
}

/// P1 (group A, [0, 1]) and P2 (group B, [0, 5])
pub fn two_group_catalog() -> PolicyCatalog {
    PolicyCatalog::new()
        .with_policy(policy("P1", "A", &[0.0, 1.0]))
        .with_policy(policy("P2", "B", &[0.0, 5.0]))
}

/// Enabled policies from `(long_name, group)` pairs, all at level 1
pub fn catalog_with_groups(entries: &[(&str, &str)]) -> PolicyCatalog {
    entries
        .iter()
        .map(|(name, group)| policy(name, group, &[0.0, 1.0]))
        .collect()
}

pub fn all_disabled_catalog() -> PolicyCatalog {
    let mut catalog = two_group_catalog();
    catalog.disable_all();
    catalog
}

/// Default config writing into `dir`
pub fn config_in(dir: &Path) -> ScriptConfig {
    ScriptConfig::new().with_output_script(dir.join("GeneratedContributionTestScript.cmd"))
}

pub fn arb_catalog() -> impl Strategy<Value = PolicyCatalog> {
    let entry = (
        any::<bool>(),
        0u8..40,
        prop_oneof![Just("A"), Just("B"), Just("C"), Just("D")],
        1u32..100,
    )
        .prop_map(|(enabled, id, group, level)| {
            policy(&format!("Lever {id}"), group, &[0.0, f64::from(level) / 10.0])
                .with_enabled(enabled)
        });
    prop::collection::vec(entry, 1..25).prop_map(|v| v.into_iter().collect())
}

/// A run block read back from script text
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRun {
    pub setvals: Vec<(String, String)>,
    pub schedule: Option<String>,
    pub accumulate: bool,
    pub group: String,
    pub policies: String,
}

impl ParsedRun {
    pub fn variables(&self) -> Vec<&str> {
        self.setvals.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Split script text into runs, ignoring the preamble
pub fn parse_runs(script: &str) -> Vec<ParsedRun> {
    let mut runs = Vec::new();
    let mut setvals = Vec::new();
    let mut schedule = None;

    for line in script.lines() {
        if let Some(rest) = line.strip_prefix("SIMULATE>SETVAL|") {
            let (name, value) = rest.rsplit_once('=').expect("SETVAL without '='");
            if name == SCHEDULE_SELECTOR_VARIABLE {
                schedule = Some(value.to_string());
            } else {
                setvals.push((name.to_string(), value.to_string()));
            }
        } else if let Some(rest) = line.strip_prefix("MENU>VDF2TAB|") {
            let (fields, annotation) = rest.split_once(':').expect("VDF2TAB without ':'");
            let accumulate = fields.split('|').nth(3) == Some("+!");
            let mut pairs = annotation.split('\t').filter(|s| !s.is_empty());
            let group = pairs.next().and_then(|p| p.split_once('=')).map(|(_, v)| v).unwrap_or_default();
            let policies = pairs.next().and_then(|p| p.split_once('=')).map(|(_, v)| v).unwrap_or_default();
            runs.push(ParsedRun {
                setvals: std::mem::take(&mut setvals),
                schedule: schedule.take(),
                accumulate,
                group: group.to_string(),
                policies: policies.to_string(),
            });
        }
    }
    runs
}
