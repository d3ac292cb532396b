// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::info;

use bcm_config::constants::{RULE_CURVE_MAX_POST, RULE_CURVE_STEP};
use bcm_config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, BcmConfig, ConfigError,
};
use bcm_experiment::{
    build_figure, format_sweep_table, rule_curve, run_sweep, write_json, SweepSettings,
};
use bcm_metrics::{compute_osi_array, preferred_orientation};
use bcm_observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingOptions};
use bcm_plasticity::{simulate, SimulationParams};

/// BCM threshold experiments - plasticity runs, threshold sweep and figure data
#[derive(Parser, Debug)]
#[command(name = "bcm-experiment", version, author, long_about = None)]
struct Cli {
    /// Path to the configuration file (searched for when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override a configuration key, e.g. `--set threshold=12` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val, global = true)]
    overrides: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the plasticity rule Δw(post) for the example thresholds
    Rule {
        /// Pre-synaptic rate
        #[arg(long, default_value_t = 1.0)]
        pre: f64,
    },

    /// Run one simulation at the configured threshold
    Simulate {
        /// Write the full trajectory as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sweep the threshold and print the OSI of every run
    Sweep {
        /// Write the sweep points as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute every figure panel and export them as JSON
    Figure {
        /// Output path (defaults to export.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse a `key=value` override
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Load, override and validate the configuration
///
/// Falls back to defaults (plus environment and CLI overrides) when no file
/// is given and none is found. Returns the file used, if any.
fn load_configuration(
    path: Option<&Path>,
    overrides: &HashMap<String, String>,
) -> Result<(BcmConfig, Option<PathBuf>)> {
    let (config, source) = match path {
        Some(path) => {
            let config = load_config(Some(path), Some(overrides))
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(path.to_path_buf()))
        }
        None => match find_config_file() {
            Ok(found) => {
                let config = load_config(Some(&found), Some(overrides))
                    .with_context(|| format!("Failed to load configuration from {}", found.display()))?;
                (config, Some(found))
            }
            Err(ConfigError::FileNotFound(_)) => {
                let mut config = BcmConfig::default();
                apply_environment_overrides(&mut config);
                apply_cli_overrides(&mut config, overrides);
                (config, None)
            }
            Err(e) => return Err(e.into()),
        },
    };

    validate_config(&config)?;
    Ok((config, source))
}

fn logging_options(config: &BcmConfig) -> LoggingOptions {
    LoggingOptions {
        level: config.logging.level.clone(),
        log_dir: config
            .logging
            .file_logging
            .then(|| config.logging.log_dir.clone()),
        ..Default::default()
    }
}

fn run_rule(config: &BcmConfig, pre: f64) -> Result<()> {
    let table = rule_curve(
        pre,
        &config.sweep.example_thresholds,
        RULE_CURVE_MAX_POST,
        RULE_CURVE_STEP,
    )?;

    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    println!("{}", header.join("\t"));
    for row in 0..table.n_rows() {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{:.4}", c.values[row]))
            .collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

fn run_simulation(config: &BcmConfig, output: Option<&Path>) -> Result<()> {
    let params = SimulationParams::from_config(config)?;
    let trajectory = simulate(&params)?;

    let window = config.sweep.convergence_window;
    let final_rates = trajectory.final_rates();
    let osi = compute_osi_array(trajectory.stimuli().view(), final_rates)?;
    let stimuli = trajectory.stimuli().to_vec();
    let orientation = preferred_orientation(&stimuli, &final_rates.to_vec())?;

    println!("threshold:      {:.2}", params.threshold);
    println!("steps:          {}", trajectory.len());
    println!("OSI:            {:.4}", osi);
    match orientation {
        Some(angle) => println!("orientation:    {:.1}°", angle.to_degrees()),
        None => println!("orientation:    untuned"),
    }
    println!(
        "tail change:    {:.3e} (converged: {})",
        trajectory.tail_change(window),
        trajectory.is_converged(window, config.sweep.convergence_tolerance)
    );

    if let Some(path) = output {
        write_json(path, &trajectory)?;
    }
    Ok(())
}

fn run_threshold_sweep(config: &BcmConfig, output: Option<&Path>) -> Result<()> {
    let params = SimulationParams::from_config(config)?;
    let settings = SweepSettings::from(&config.sweep);
    let points = run_sweep(&settings, &params)?;

    println!(
        "{}",
        format_sweep_table(&points, &config.sweep.example_thresholds)
    );

    if let Some(path) = output {
        write_json(path, &points)?;
    }
    Ok(())
}

fn run_figure(config: &BcmConfig, output: Option<PathBuf>) -> Result<()> {
    let figure = build_figure(config)?;

    println!(
        "{}",
        format_sweep_table(&figure.sweep, &config.sweep.example_thresholds)
    );

    let path = output.unwrap_or_else(|| config.export.output_path.clone());
    write_json(&path, &figure)
        .with_context(|| format!("Failed to write figure data to {}", path.display()))?;
    Ok(())
}

/// Main entry point
fn main() -> Result<()> {
    // Debug flags are not clap arguments
    let debug_flags = parse_debug_flags();
    let args = std::env::args().filter(|arg| !arg.starts_with("--debug-"));
    let matches = Cli::command()
        .after_help(debug_flags_help())
        .get_matches_from(args);
    let cli = Cli::from_arg_matches(&matches)?;

    let overrides: HashMap<String, String> = cli.overrides.iter().cloned().collect();
    let (config, source) = load_configuration(cli.config.as_deref(), &overrides)?;

    let _logging_guard = init_logging(&debug_flags, &logging_options(&config))?;
    match &source {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("No configuration file found; using defaults"),
    }

    match cli.command {
        Command::Rule { pre } => run_rule(&config, pre),
        Command::Simulate { output } => run_simulation(&config, output.as_deref()),
        Command::Sweep { output } => run_threshold_sweep(&config, output.as_deref()),
        Command::Figure { output } => run_figure(&config, output),
    }
}
