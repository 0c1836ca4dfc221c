//! CTS command-line front end
//!
//! Running `contribution-script` with no arguments generates the script from
//! the compiled-in defaults. Flags override individual settings; `--config`
//! and `--catalog` load them from TOML files.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cts_catalog::{PolicyCatalog, SettingSelector};
use cts_script::{prepare, write_error_file, write_script, ScriptConfig, ScriptError, SweepMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "cts_catalog=info,cts_script=info,cts_cli=info";

/// Build the argument parser
#[must_use]
pub fn cli() -> Command {
    Command::new("contribution-script")
        .version(cts_script::VERSION)
        .about("Generate a simulator command script for policy-group contribution runs")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with script settings"),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_parser(value_parser!(PathBuf))
                .help("TOML policy catalog (defaults to the built-in table)"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_parser(|s: &str| s.parse::<SweepMode>().map_err(|e| e.to_string()))
                .help("Enable or Disable one group per run"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help("Path of the generated script"),
        )
        .arg(Arg::new("model").long("model").help("Model file to load"))
        .arg(Arg::new("results").long("results").help("Results table file"))
        .arg(
            Arg::new("output-vars")
                .long("output-vars")
                .help("File listing the variables to export"),
        )
        .arg(Arg::new("run-name").long("run-name").help("Name used for every run"))
        .arg(
            Arg::new("schedule")
                .long("schedule")
                .value_parser(value_parser!(u32))
                .help("Policy implementation schedule number"),
        )
        .arg(
            Arg::new("active-setting")
                .long("active-setting")
                .value_parser(value_parser!(usize))
                .help("Index of the setting applied when a policy is on (0 is baseline)"),
        )
        .arg(
            Arg::new("enable-group")
                .long("enable-group")
                .action(ArgAction::Append)
                .help("Enable every policy in this group (repeatable)"),
        )
        .arg(
            Arg::new("enable-policy")
                .long("enable-policy")
                .action(ArgAction::Append)
                .help("Enable the policy with this model variable name (repeatable)"),
        )
        .arg(
            Arg::new("no-reassert")
                .long("no-reassert")
                .action(ArgAction::SetTrue)
                .help("In Enable mode, do not re-assert policies in the final run"),
        )
        .arg(
            Arg::new("no-interaction")
                .long("no-interaction")
                .action(ArgAction::SetTrue)
                .help("Emit SPECIAL>NOINTERACTION"),
        )
        .arg(
            Arg::new("save-list")
                .long("save-list")
                .action(ArgAction::SetTrue)
                .help("Emit SIMULATE>SAVELIST with the output vars file"),
        )
        .arg(
            Arg::new("list-groups")
                .long("list-groups")
                .action(ArgAction::SetTrue)
                .help("List catalog groups and exit"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the planned runs instead of writing the script"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .requires("dry-run")
                .help("Print the dry run as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log each planned run"),
        )
}

/// Parsed command-line options
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Settings file
    pub config: Option<PathBuf>,
    /// Catalog file
    pub catalog: Option<PathBuf>,
    /// Sweep mode override
    pub mode: Option<SweepMode>,
    /// Output script override
    pub output: Option<PathBuf>,
    /// Model file override
    pub model: Option<String>,
    /// Results file override
    pub results: Option<String>,
    /// Output vars file override
    pub output_vars: Option<String>,
    /// Run name override
    pub run_name: Option<String>,
    /// Schedule override
    pub schedule: Option<u32>,
    /// Active setting index override
    pub active_setting: Option<usize>,
    /// Groups to enable on top of the catalog
    pub enable_groups: Vec<String>,
    /// Policies to enable on top of the catalog
    pub enable_policies: Vec<String>,
    /// Skip re-assertion in the final Enable-mode run
    pub no_reassert: bool,
    /// Emit NOINTERACTION
    pub no_interaction: bool,
    /// Emit SAVELIST
    pub save_list: bool,
    /// List groups and exit
    pub list_groups: bool,
    /// Print plan instead of writing
    pub dry_run: bool,
    /// JSON dry-run output
    pub json: bool,
    /// Debug logging
    pub verbose: bool,
}

impl Options {
    /// Extract options from parsed arguments
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let strings = |id: &str| -> Vec<String> {
            matches
                .get_many::<String>(id)
                .map(|v| v.cloned().collect())
                .unwrap_or_default()
        };
        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            catalog: matches.get_one::<PathBuf>("catalog").cloned(),
            mode: matches.get_one::<SweepMode>("mode").copied(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            model: matches.get_one::<String>("model").cloned(),
            results: matches.get_one::<String>("results").cloned(),
            output_vars: matches.get_one::<String>("output-vars").cloned(),
            run_name: matches.get_one::<String>("run-name").cloned(),
            schedule: matches.get_one::<u32>("schedule").copied(),
            active_setting: matches.get_one::<usize>("active-setting").copied(),
            enable_groups: strings("enable-group"),
            enable_policies: strings("enable-policy"),
            no_reassert: matches.get_flag("no-reassert"),
            no_interaction: matches.get_flag("no-interaction"),
            save_list: matches.get_flag("save-list"),
            list_groups: matches.get_flag("list-groups"),
            dry_run: matches.get_flag("dry-run"),
            json: matches.get_flag("json"),
            verbose: matches.get_flag("verbose"),
        }
    }

    /// Resolve the effective script configuration
    ///
    /// # Errors
    /// Fails if the config file cannot be read or an override is invalid.
    pub fn script_config(&self) -> Result<ScriptConfig, ScriptError> {
        let mut config = match &self.config {
            Some(path) => ScriptConfig::from_path(path)?,
            None => ScriptConfig::new(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(output) = &self.output {
            config.output_script.clone_from(output);
        }
        if let Some(model) = &self.model {
            config.model_file.clone_from(model);
        }
        if let Some(results) = &self.results {
            config.results_file.clone_from(results);
        }
        if let Some(vars) = &self.output_vars {
            config.output_vars_file.clone_from(vars);
        }
        if let Some(run_name) = &self.run_name {
            config.run_name.clone_from(run_name);
        }
        if let Some(schedule) = self.schedule {
            config.policy_schedule = schedule;
        }
        if let Some(index) = self.active_setting {
            config.active_setting = SettingSelector::new(index)?;
        }
        if self.no_reassert {
            config.reassert_all_on_enable = false;
        }
        config.no_interaction |= self.no_interaction;
        config.save_list |= self.save_list;
        if let Some(catalog) = &self.catalog {
            config.catalog = Some(catalog.clone());
        }
        Ok(config)
    }

    /// Output path to report into when the configuration itself is unusable
    ///
    /// `--output` wins, then the config file's `output_script` if the file
    /// still parses, then the default.
    #[must_use]
    pub fn fallback_output(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }
        self.config
            .as_ref()
            .and_then(|path| ScriptConfig::from_path(path).ok())
            .unwrap_or_default()
            .output_script
    }
}

/// Result of a command-line invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Script (or listing) produced
    Success,
    /// Generation failed; the reason was logged and written to the output
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise info, or debug with `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        DEFAULT_FILTER.replace("=info", "=debug")
    } else {
        DEFAULT_FILTER.to_string()
    };
    // A second call (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn load_catalog(config: &ScriptConfig, options: &Options) -> Result<PolicyCatalog, ScriptError> {
    let mut catalog = match &config.catalog {
        Some(path) => PolicyCatalog::from_path(path)?,
        None => PolicyCatalog::builtin()?,
    };

    for group in &options.enable_groups {
        if catalog.enable_group(group) == 0 {
            return Err(ScriptError::Config(format!("no policies in group '{group}'")));
        }
    }
    for policy in &options.enable_policies {
        if !catalog.enable_policy(policy) {
            return Err(ScriptError::Config(format!("unknown policy '{policy}'")));
        }
    }
    Ok(catalog)
}

/// Execute the command described by `options`
///
/// Listings and dry runs are printed to `out`.
///
/// # Errors
/// Returns an error only for problems outside generation itself (failed
/// write to `out`, or any failure during a listing or dry run). Generation
/// failures, including an unusable configuration, yield [`Outcome::Failure`]
/// after the error text has been written to the output script path.
pub fn run(options: &Options, out: &mut impl Write) -> anyhow::Result<Outcome> {
    let config = match options.script_config() {
        Ok(config) => config,
        Err(e) if options.list_groups || options.dry_run => return Err(e.into()),
        Err(e) => {
            write_error_file(&options.fallback_output(), &e);
            return Ok(Outcome::Failure);
        }
    };

    let catalog = match load_catalog(&config, options) {
        Ok(catalog) => catalog,
        Err(e) if options.list_groups || options.dry_run => return Err(e.into()),
        Err(e) => {
            write_error_file(&config.output_script, &e);
            return Ok(Outcome::Failure);
        }
    };

    if options.list_groups {
        print_groups(&catalog, out)?;
        return Ok(Outcome::Success);
    }

    if options.dry_run {
        return print_plan(&config, &catalog, options.json, out);
    }

    match write_script(&config, &catalog) {
        Ok(report) => {
            writeln!(
                out,
                "Wrote {} runs to {}",
                report.runs,
                report.path.display()
            )?;
            Ok(Outcome::Success)
        }
        Err(e) if e.is_configuration_error() => Ok(Outcome::Failure),
        Err(e) => Err(e.into()),
    }
}

fn print_groups(catalog: &PolicyCatalog, out: &mut impl Write) -> anyhow::Result<()> {
    for group in catalog.group_names() {
        let members = catalog.policies().iter().filter(|p| p.group == group);
        let (total, enabled) = members.fold((0, 0), |(t, e), p| (t + 1, e + usize::from(p.enabled)));
        writeln!(out, "{group}\t{enabled}/{total} enabled")?;
    }
    Ok(())
}

fn print_plan(
    config: &ScriptConfig,
    catalog: &PolicyCatalog,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let (selection, runs) = match prepare(config, catalog) {
        Ok(planned) => planned,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(Outcome::Failure);
        }
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &runs).context("serializing plan")?;
        writeln!(out)?;
        return Ok(Outcome::Success);
    }

    writeln!(
        out,
        "{} mode: {} policies, {} groups, {} runs",
        config.mode,
        selection.policies().len(),
        selection.groups().len(),
        runs.len()
    )?;
    for (i, run) in runs.iter().enumerate() {
        let annotation = run.annotation();
        writeln!(
            out,
            "{:>3}. {}PolicyGroup={} ({} assignments): {}",
            i + 1,
            annotation.kind.as_str(),
            annotation.group_label(),
            run.assignments().len(),
            annotation.policies_label()
        )?;
    }
    Ok(Outcome::Success)
}
