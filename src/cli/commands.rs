use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::binding::Page;
use crate::conditions::{
    evaluate, parse_condition, Condition, EvalContext, EvalError, Layered, Precedence, ValueSource,
};
use crate::config::{self, Config};
use crate::dom::{load_fixture, Document, DomValues};

use super::convert::{self, Step};
use super::exit_codes;
use super::output::{
    self, EvalData, MountData, OutputMode, RefsData, ReportData, SimulateData, StepData,
};

#[derive(Parser)]
#[command(name = "formfx")]
#[command(about = "Evaluate form conditions and simulate declarative form behaviors")]
#[command(version)]
pub struct Cli {
    /// Path to config file (overrides FORMFX_CONFIG env var and default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (auto-enabled when stdout is piped)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force text output even when stdout is piped
    #[arg(long, global = true, conflicts_with = "json")]
    pub no_json: bool,

    /// Suppress all output on success (errors still go to stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a condition against input values
    Eval {
        /// Condition text, e.g. "role==admin && agree==true"
        condition: String,

        /// Input value as name=value (repeatable, wins over fixture values)
        #[arg(long = "value", value_name = "NAME=VALUE", action = clap::ArgAction::Append)]
        values: Vec<String>,

        /// Read input values from the controls of a fixture document
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Override the configured operator precedence
        #[arg(long, value_enum)]
        precedence: Option<PrecedenceArg>,
    },

    /// List the input names a condition references
    Refs {
        /// Condition text
        condition: String,
    },

    /// Connect a fixture document and print the result
    Mount {
        /// Fixture file (JSON5)
        fixture: PathBuf,
    },

    /// Connect a fixture, replay user interactions and print the result
    Simulate {
        /// Fixture file (JSON5)
        fixture: PathBuf,

        /// Interaction: set:name=value, check:name, uncheck:name, or click:id (repeatable)
        #[arg(short, long = "step", value_name = "STEP", action = clap::ArgAction::Append)]
        steps: Vec<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Set a configuration value
    Set {
        /// Dotted key, e.g. classes.hidden or evaluation.precedence
        key: String,
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
    /// Print the default configuration
    Default,
    /// Verify configuration file for errors
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrecedenceArg {
    /// && and || fold left to right
    LeftToRight,
    /// && binds tighter than ||
    Standard,
}

fn load_config(path: Option<&Path>, mode: OutputMode) -> Config {
    match config::load_with_override(path) {
        Ok(config) => config,
        Err(e) => output::exit_with_error(
            mode,
            exit_codes::CONFIG_ERROR,
            &format!("{:#}", e),
            Vec::new(),
            None,
        ),
    }
}

fn load_document(path: &Path, mode: OutputMode) -> Document {
    match load_fixture(path) {
        Ok(document) => document,
        Err(e) => output::exit_with_error(
            mode,
            exit_codes::FIXTURE_ERROR,
            &e.to_string(),
            Vec::new(),
            None,
        ),
    }
}

fn parse_or_exit(condition: &str, precedence: Precedence, mode: OutputMode) -> Condition {
    match parse_condition(condition, precedence) {
        Ok(parsed) => parsed,
        Err(e) => output::exit_with_error(
            mode,
            exit_codes::PARSE_ERROR,
            &e.to_string(),
            Vec::new(),
            Some(format!("{}\n{}^", condition, " ".repeat(e.position))),
        ),
    }
}

fn mount_or_exit(page: &mut Page, mode: OutputMode) -> ReportData {
    match page.mount() {
        Ok(report) => ReportData::from(&report),
        Err(e) => output::exit_with_error(mode, exit_codes::ERROR, &e.to_string(), Vec::new(), None),
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let output_mode = OutputMode::from_flags(cli.json, cli.no_json, cli.quiet);

    match cli.command {
        Commands::Eval {
            condition,
            values,
            fixture,
            precedence,
        } => {
            let config = load_config(config_path, output_mode);
            let precedence = precedence
                .map(Precedence::from)
                .unwrap_or(config.evaluation.precedence);

            let mut overrides = BTreeMap::new();
            for assignment in &values {
                match convert::parse_assignment(assignment) {
                    Ok((name, value)) => {
                        overrides.insert(name, value);
                    }
                    Err(e) => output::exit_with_error(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        &e,
                        Vec::new(),
                        None,
                    ),
                }
            }

            let document = fixture
                .as_deref()
                .map(|path| load_document(path, output_mode));
            let dom_values = document.as_ref().map(DomValues::new);
            let empty = BTreeMap::new();
            let bottom: &dyn ValueSource = match &dom_values {
                Some(values) => values,
                None => &empty,
            };
            let source = Layered {
                top: &overrides,
                bottom,
            };

            let parsed = parse_or_exit(&condition, precedence, output_mode);
            let ctx = EvalContext::new(&source).with_unknown_input(config.evaluation.unknown_input);

            let result = match evaluate(&parsed, &ctx) {
                Ok(result) => result,
                Err(e) => {
                    let (code, suggestions) = match &e {
                        EvalError::UnknownInput { suggestions, .. } => {
                            (exit_codes::UNKNOWN_INPUT, suggestions.clone())
                        }
                        EvalError::Parse(_) => (exit_codes::PARSE_ERROR, Vec::new()),
                    };
                    output::exit_with_error(output_mode, code, &e.to_string(), suggestions, None)
                }
            };

            match output_mode {
                OutputMode::Json => output::print_json(&EvalData {
                    condition: parsed.to_string(),
                    result,
                    references: parsed.references(),
                }),
                OutputMode::Text => println!("{}", result),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Refs { condition } => {
            let config = load_config(config_path, output_mode);
            let parsed = parse_or_exit(&condition, config.evaluation.precedence, output_mode);

            match output_mode {
                OutputMode::Json => output::print_json(&RefsData {
                    condition: parsed.to_string(),
                    references: parsed.references(),
                }),
                OutputMode::Text => {
                    for name in parsed.references() {
                        println!("{}", name);
                    }
                }
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Mount { fixture } => {
            let config = load_config(config_path, output_mode);
            let document = load_document(&fixture, output_mode);

            let mut page = Page::new(document, config);
            let report = mount_or_exit(&mut page, output_mode);

            match output_mode {
                OutputMode::Json => output::print_json(&MountData {
                    report,
                    listeners: page.controller().listener_count(),
                    html: page.document().to_html(),
                }),
                OutputMode::Text => print!("{}", page.document().to_html()),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Simulate { fixture, steps } => {
            let steps: Vec<Step> = steps
                .iter()
                .map(|s| {
                    s.parse::<Step>().unwrap_or_else(|e| {
                        output::exit_with_error(
                            output_mode,
                            exit_codes::INVALID_ARGS,
                            &e,
                            Vec::new(),
                            None,
                        )
                    })
                })
                .collect();

            let config = load_config(config_path, output_mode);
            let document = load_document(&fixture, output_mode);

            let mut page = Page::new(document, config);
            let mount = mount_or_exit(&mut page, output_mode);

            let mut replayed = Vec::with_capacity(steps.len());
            for step in &steps {
                match step.apply(&mut page) {
                    Ok(report) => replayed.push(StepData {
                        step: step.to_string(),
                        report: ReportData::from(&report),
                    }),
                    Err(e) => output::exit_with_error(
                        output_mode,
                        exit_codes::INVALID_ARGS,
                        &format!("step '{}' failed: {}", step, e),
                        Vec::new(),
                        None,
                    ),
                }
            }

            match output_mode {
                OutputMode::Json => output::print_json(&SimulateData {
                    mount,
                    steps: replayed,
                    html: page.document().to_html(),
                }),
                OutputMode::Text => print!("{}", page.document().to_html()),
                OutputMode::Quiet => {}
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = config::load_with_override(config_path)?;
                let json =
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Path => {
                let path = config::get_config_path_with_override(config_path)?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut config = config::load_with_override(config_path)?;
                config::set_value(&mut config, &key, &value)?;
                config::save_with_override(&config, config_path)?;
                if !output_mode.is_quiet() {
                    println!("Set {} = {}", key, value);
                }
                Ok(())
            }
            ConfigCommands::Reset => {
                let config = Config::default();
                config::save_with_override(&config, config_path)?;
                if !output_mode.is_quiet() {
                    println!("Configuration reset to defaults");
                }
                Ok(())
            }
            ConfigCommands::Default => {
                let json = serde_json::to_string_pretty(&Config::default())
                    .context("Failed to serialize config")?;
                println!("{}", json);
                Ok(())
            }
            ConfigCommands::Verify => {
                let path = config::get_config_path_with_override(config_path)?;
                let errors = config::verify(&path)?;

                if errors.is_empty() {
                    println!("✓ Configuration is valid: {}", path.display());
                    Ok(())
                } else {
                    println!(
                        "✗ Configuration has {} error(s): {}",
                        errors.len(),
                        path.display()
                    );
                    println!();
                    for error in &errors {
                        println!("  - {}", error);
                    }
                    Err(anyhow!("configuration validation failed"))
                }
            }
        },
    }
}
