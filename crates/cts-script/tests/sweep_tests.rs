//! Sweep behaviour checked through the generated script text.

use cts_catalog::SettingSelector;
use cts_script::{render_script, write_script, ScriptConfig, ScriptError, SweepMode};
use cts_test_utils::{
    all_disabled_catalog, arb_catalog, catalog_with_groups, config_in, parse_runs, policy,
    two_group_catalog,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn disable_mode_two_policy_example() {
    let script = render_script(&ScriptConfig::new(), &two_group_catalog()).unwrap();
    let runs = parse_runs(&script);
    assert_eq!(runs.len(), 4);

    assert_eq!(
        runs[0].setvals,
        vec![("P1".to_string(), "1".to_string()), ("P2".to_string(), "5".to_string())]
    );
    assert_eq!((runs[0].group.as_str(), runs[0].policies.as_str()), ("None", "None"));

    assert_eq!(runs[1].variables(), vec!["P2"]);
    assert_eq!((runs[1].group.as_str(), runs[1].policies.as_str()), ("A", "P1 label"));

    assert_eq!(runs[2].variables(), vec!["P1"]);
    assert_eq!((runs[2].group.as_str(), runs[2].policies.as_str()), ("B", "P2 label"));

    assert!(runs[3].setvals.is_empty());
    assert_eq!((runs[3].group.as_str(), runs[3].policies.as_str()), ("All", "All"));

    assert!(script.contains("\tDisabledPolicyGroup=A\tDisabledPolicies=P1 label\n"));
}

#[test]
fn enable_mode_sets_only_the_group_under_test() {
    let catalog = catalog_with_groups(&[("P1", "A"), ("P2", "B"), ("P3", "A"), ("P4", "C")]);
    let config = ScriptConfig::new().with_mode(SweepMode::Enable);
    let script = render_script(&config, &catalog).unwrap();
    let runs = parse_runs(&script);

    assert_eq!(runs.len(), 5);
    assert!(runs[0].setvals.is_empty());
    assert_eq!(runs[0].group, "None");

    assert_eq!(runs[1].variables(), vec!["P1", "P3"]);
    assert_eq!(runs[1].policies, "P1 label, P3 label");
    assert_eq!(runs[2].variables(), vec!["P2"]);
    assert_eq!(runs[3].variables(), vec!["P4"]);

    assert_eq!(runs[4].variables(), vec!["P1", "P2", "P3", "P4"]);
    assert_eq!(runs[4].group, "All");
    assert!(script.contains("\tEnabledPolicyGroup=A\tEnabledPolicies=P1 label, P3 label\n"));
}

#[test]
fn every_run_selects_the_schedule_and_only_the_first_recreates_results() {
    let config = ScriptConfig::new().with_policy_schedule(4);
    let script = render_script(&config, &two_group_catalog()).unwrap();
    let runs = parse_runs(&script);

    assert!(runs.iter().all(|r| r.schedule.as_deref() == Some("4")));
    assert!(!runs[0].accumulate);
    assert!(runs[1..].iter().all(|r| r.accumulate));
}

#[test]
fn preamble_starts_the_script() {
    let script = render_script(&ScriptConfig::new(), &two_group_catalog()).unwrap();
    assert!(script.starts_with("SPECIAL>LOADMODEL|\"EPS.mdl\"\nSIMULATE>RUNNAME|MostRecentRun\n\n"));
    assert!(script.ends_with("DisabledPolicies=All\n\n"));
}

#[test]
fn third_level_selector_is_applied() {
    let catalog = cts_catalog::PolicyCatalog::new().with_policy(policy("P1", "A", &[0.0, 0.4, 0.9]));
    let config = ScriptConfig::new().with_active_setting(SettingSelector::new(2).unwrap());
    let runs = parse_runs(&render_script(&config, &catalog).unwrap());
    assert_eq!(runs[0].setvals, vec![("P1".to_string(), "0.9".to_string())]);
}

#[test]
fn all_disabled_catalog_writes_error_text_instead_of_script() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let err = write_script(&config, &all_disabled_catalog()).unwrap_err();
    assert!(err.is_no_policies());
    assert!(err.is_configuration_error());

    let written = std::fs::read_to_string(&config.output_script).unwrap();
    assert!(written.starts_with("Error: No policies were enabled"));
    assert!(!written.contains("MENU>RUN"));
}

#[test]
fn short_settings_list_is_reported_in_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let catalog = cts_catalog::PolicyCatalog::new().with_policy(policy("P1", "A", &[1.0]));

    let err = write_script(&config, &catalog).unwrap_err();
    assert!(matches!(err, ScriptError::Catalog(_)));
    let written = std::fs::read_to_string(&config.output_script).unwrap();
    assert!(written.contains("P1"));
    assert!(!written.contains("MENU>RUN"));
}

#[test]
fn write_script_reports_what_it_wrote() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_mode(SweepMode::Enable);

    let report = write_script(&config, &two_group_catalog()).unwrap();
    assert_eq!(report.runs, 4);
    assert_eq!(report.groups, 2);
    assert_eq!(report.policies, 2);
    assert_eq!(report.mode, "Enable");

    let written = std::fs::read_to_string(&config.output_script).unwrap();
    assert_eq!(written.len(), report.bytes);
    assert_eq!(written, render_script(&config, &two_group_catalog()).unwrap());
}

fn distinct_enabled_groups(catalog: &cts_catalog::PolicyCatalog) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for p in catalog.policies().iter().filter(|p| p.enabled) {
        if !groups.contains(&p.group) {
            groups.push(p.group.clone());
        }
    }
    groups
}

proptest! {
    #[test]
    fn prop_run_count_is_groups_plus_two(catalog in arb_catalog(), enable in any::<bool>()) {
        let mode = if enable { SweepMode::Enable } else { SweepMode::Disable };
        let config = ScriptConfig::new().with_mode(mode);
        let groups = distinct_enabled_groups(&catalog);

        match render_script(&config, &catalog) {
            Ok(script) => {
                let runs = parse_runs(&script);
                prop_assert_eq!(runs.len(), groups.len() + 2);
                prop_assert_eq!(script.matches("MENU>RUN|O").count(), groups.len() + 2);

                let labelled: Vec<String> = runs[1..runs.len() - 1].iter().map(|r| r.group.clone()).collect();
                prop_assert_eq!(labelled, groups);
            }
            Err(e) => {
                prop_assert!(groups.is_empty());
                prop_assert!(e.is_no_policies());
            }
        }
    }

    #[test]
    fn prop_generation_is_idempotent(catalog in arb_catalog(), enable in any::<bool>()) {
        let mode = if enable { SweepMode::Enable } else { SweepMode::Disable };
        let config = ScriptConfig::new().with_mode(mode);
        let first = render_script(&config, &catalog).ok();
        let second = render_script(&config, &catalog).ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_disable_group_runs_skip_exactly_the_group(catalog in arb_catalog()) {
        if let Ok(script) = render_script(&ScriptConfig::new(), &catalog) {
            let runs = parse_runs(&script);
            let enabled: Vec<_> = catalog.policies().iter().filter(|p| p.enabled).collect();

            prop_assert_eq!(runs[0].setvals.len(), enabled.len());
            prop_assert!(runs[runs.len() - 1].setvals.is_empty());

            for run in &runs[1..runs.len() - 1] {
                let expected: Vec<&str> = enabled
                    .iter()
                    .filter(|p| p.group != run.group)
                    .map(|p| p.long_name.as_str())
                    .collect();
                prop_assert_eq!(run.variables(), expected);
            }
        }
    }

    #[test]
    fn prop_enable_group_runs_set_exactly_the_group(catalog in arb_catalog()) {
        let config = ScriptConfig::new().with_mode(SweepMode::Enable);
        if let Ok(script) = render_script(&config, &catalog) {
            let runs = parse_runs(&script);
            let enabled: Vec<_> = catalog.policies().iter().filter(|p| p.enabled).collect();

            prop_assert!(runs[0].setvals.is_empty());
            prop_assert_eq!(runs[runs.len() - 1].setvals.len(), enabled.len());

            for run in &runs[1..runs.len() - 1] {
                let members: Vec<_> = enabled.iter().filter(|p| p.group == run.group).collect();
                let variables: Vec<&str> = members.iter().map(|p| p.long_name.as_str()).collect();
                let labels: Vec<&str> = members.iter().map(|p| p.short_name.as_str()).collect();
                prop_assert_eq!(run.variables(), variables);
                prop_assert_eq!(&run.policies, &labels.join(", "));
            }
        }
    }
}
