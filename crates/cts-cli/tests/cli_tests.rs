use std::fs;
use std::path::Path;

use cts_cli::{cli, run, Options, Outcome};
use cts_script::SweepMode;
use cts_test_utils::parse_runs;
use pretty_assertions::assert_eq;

fn options(args: &[&str]) -> Options {
    let mut argv = vec!["contribution-script"];
    argv.extend_from_slice(args);
    let matches = cli().try_get_matches_from(argv).unwrap();
    Options::from_matches(&matches)
}

fn write_catalog(dir: &Path) -> String {
    let path = dir.join("catalog.toml");
    fs::write(
        &path,
        r#"policy = [
    { enabled = true, long_name = "P1", short_name = "Policy One", settings = [0, 1], group = "A" },
    { enabled = true, long_name = "P2", short_name = "Policy Two", settings = [0, 5], group = "B" },
    { enabled = false, long_name = "P3", short_name = "Policy Three", settings = [0, 2], group = "C" },
]
"#,
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn flags_override_defaults() {
    let opts = options(&[
        "--mode", "enable", "--schedule", "3", "--run-name", "Sweep", "--active-setting", "2",
    ]);
    let config = opts.script_config().unwrap();
    assert_eq!(config.mode, SweepMode::Enable);
    assert_eq!(config.policy_schedule, 3);
    assert_eq!(config.run_name, "Sweep");
    assert_eq!(config.active_setting.index(), 2);
}

#[test]
fn unknown_mode_is_rejected_by_the_parser() {
    assert!(cli().try_get_matches_from(["contribution-script", "--mode", "sideways"]).is_err());
}

#[test]
fn baseline_active_setting_is_rejected() {
    let opts = options(&["--active-setting", "0"]);
    assert!(opts.script_config().is_err());
}

#[test]
fn json_requires_dry_run() {
    assert!(cli().try_get_matches_from(["contribution-script", "--json"]).is_err());
}

#[test]
fn generates_script_from_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let output = dir.path().join("out.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&["--catalog", &catalog, "-o", &output_arg]);
    let mut stdout = Vec::new();
    assert_eq!(run(&opts, &mut stdout).unwrap(), Outcome::Success);

    let script = fs::read_to_string(&output).unwrap();
    let runs = parse_runs(&script);
    assert_eq!(runs.len(), 4);
    assert_eq!(runs[1].group, "A");
    assert_eq!(runs[1].policies, "Policy One");
    assert!(String::from_utf8(stdout).unwrap().starts_with("Wrote 4 runs"));
}

#[test]
fn config_file_is_applied_before_flags() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let output = dir.path().join("from-config.cmd");
    let config_path = dir.path().join("cts.toml");
    fs::write(
        &config_path,
        format!(
            "mode = \"Enable\"\nmodel_file = \"Other.mdl\"\nsave_list = true\ncatalog = {catalog:?}\noutput_script = {:?}\n",
            output.display().to_string()
        ),
    )
    .unwrap();
    let config_arg = config_path.display().to_string();

    let opts = options(&["--config", &config_arg, "--schedule", "2"]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Success);

    let script = fs::read_to_string(&output).unwrap();
    assert!(script.starts_with("SPECIAL>LOADMODEL|\"Other.mdl\"\n"));
    assert!(script.contains("SIMULATE>SAVELIST|OutputVarsToExport.lst\n"));
    let runs = parse_runs(&script);
    assert_eq!(runs[0].group, "None");
    assert!(runs[0].setvals.is_empty());
    assert!(runs.iter().all(|r| r.schedule.as_deref() == Some("2")));
}

#[test]
fn builtin_catalog_with_nothing_enabled_fails_into_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("GeneratedContributionTestScript.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&["-o", &output_arg]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Failure);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("Error: No policies were enabled"));
    assert!(!written.contains("MENU>RUN"));
}

#[test]
fn invalid_active_setting_fails_into_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bad.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&["-o", &output_arg, "--enable-group", "Feebate", "--active-setting", "0"]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Failure);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("index 0"));
    assert!(!written.contains("MENU>RUN"));
}

#[test]
fn unusable_config_file_fails_into_its_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("from-config.cmd");
    let config_path = dir.path().join("cts.toml");
    fs::write(
        &config_path,
        format!("output_script = {:?}\n", output.display().to_string()),
    )
    .unwrap();
    let config_arg = config_path.display().to_string();

    let opts = options(&["--config", &config_arg, "--active-setting", "0"]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Failure);
    assert!(output.exists());

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "active_setting = 0\n").unwrap();
    let fallback = dir.path().join("fallback.cmd");
    let broken_arg = broken.display().to_string();
    let fallback_arg = fallback.display().to_string();

    let opts = options(&["--config", &broken_arg, "-o", &fallback_arg]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Failure);
    assert!(fs::read_to_string(&fallback).unwrap().contains("configuration parse error"));
}

#[test]
fn config_errors_in_dry_run_are_reported_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&["-o", &output_arg, "--active-setting", "0", "--dry-run"]);
    assert!(run(&opts, &mut Vec::new()).is_err());
    assert!(!output.exists());
}

#[test]
fn enable_group_flag_switches_on_builtin_policies() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("ev.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&[
        "-o",
        &output_arg,
        "--enable-group",
        "EV Sales Mandate",
        "--enable-group",
        "Feebate",
    ]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Success);

    let runs = parse_runs(&fs::read_to_string(&output).unwrap());
    assert_eq!(runs.len(), 4);
    assert_eq!(runs[0].setvals.len(), 5);
    assert_eq!(runs[1].group, "EV Sales Mandate");
    assert_eq!(runs[1].variables(), vec!["LDVs Feebate Rate"]);
}

#[test]
fn unknown_group_fails_into_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("typo.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&["-o", &output_arg, "--enable-group", "EV Sale Mandate"]);
    assert_eq!(run(&opts, &mut Vec::new()).unwrap(), Outcome::Failure);
    assert!(fs::read_to_string(&output).unwrap().contains("EV Sale Mandate"));
}

#[test]
fn dry_run_prints_plan_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let output = dir.path().join("never.cmd");
    let output_arg = output.display().to_string();

    let opts = options(&["--catalog", &catalog, "-o", &output_arg, "--dry-run"]);
    let mut stdout = Vec::new();
    assert_eq!(run(&opts, &mut stdout).unwrap(), Outcome::Success);
    assert!(!output.exists());

    let text = String::from_utf8(stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Disable mode: 2 policies, 2 groups, 4 runs");
    assert_eq!(lines.len(), 5);
    assert!(lines[2].contains("DisabledPolicyGroup=A"));
}

#[test]
fn dry_run_json_lists_runs() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let opts = options(&["--catalog", &catalog, "--dry-run", "--json", "--mode", "Enable"]);
    let mut stdout = Vec::new();
    assert_eq!(run(&opts, &mut stdout).unwrap(), Outcome::Success);

    let value: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    let runs = value.as_array().unwrap();
    assert_eq!(runs.len(), 4);
    assert_eq!(runs[1]["annotation"]["kind"], "Enabled");
    assert_eq!(runs[1]["annotation"]["scope"]["name"], "A");
    assert_eq!(runs[3]["assignments"].as_array().unwrap().len(), 2);
}

#[test]
fn list_groups_reports_enabled_counts() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let opts = options(&["--catalog", &catalog, "--list-groups"]);
    let mut stdout = Vec::new();
    assert_eq!(run(&opts, &mut stdout).unwrap(), Outcome::Success);
    assert_eq!(
        String::from_utf8(stdout).unwrap(),
        "A\t1/1 enabled\nB\t1/1 enabled\nC\t0/1 enabled\n"
    );
}
