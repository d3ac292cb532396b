// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values, defaults for missing keys)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{BcmConfig, ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Find the configuration file
///
/// Search order:
/// 1. `BCM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./bcm_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("BCM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by BCM_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet BCM_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML.
/// Value ranges are checked separately by [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<BcmConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: BcmConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

fn set_parsed<T: FromStr>(target: &mut T, value: &str) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *target = parsed;
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `BCM_THRESHOLD` -> `simulation.threshold`
/// - `BCM_LEARNING_RATE` -> `simulation.learning_rate`
/// - `BCM_DURATION` -> `simulation.duration`
/// - `BCM_MEAN_SCALING` -> `simulation.mean_scaling`
/// - `BCM_SYNAPTIC_SCALING` -> `simulation.synaptic_scaling`
/// - `BCM_SEED` -> `simulation.seed`
/// - `BCM_N_PRE` -> `population.n_pre`
/// - `BCM_LOG_LEVEL` -> `logging.level`
/// - `BCM_OUTPUT_PATH` -> `export.output_path`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut BcmConfig) {
    if let Ok(value) = env::var("BCM_THRESHOLD") {
        set_parsed(&mut config.simulation.threshold, &value);
    }
    if let Ok(value) = env::var("BCM_LEARNING_RATE") {
        set_parsed(&mut config.simulation.learning_rate, &value);
    }
    if let Ok(value) = env::var("BCM_DURATION") {
        set_parsed(&mut config.simulation.duration, &value);
    }
    if let Ok(value) = env::var("BCM_MEAN_SCALING") {
        config.simulation.mean_scaling = parse_bool(&value);
    }
    if let Ok(value) = env::var("BCM_SYNAPTIC_SCALING") {
        config.simulation.synaptic_scaling = parse_bool(&value);
    }
    if let Ok(value) = env::var("BCM_SEED") {
        set_parsed(&mut config.simulation.seed, &value);
    }
    if let Ok(value) = env::var("BCM_N_PRE") {
        set_parsed(&mut config.population.n_pre, &value);
    }
    if let Ok(value) = env::var("BCM_LOG_LEVEL") {
        config.logging.level = value.to_lowercase();
    }
    if let Ok(value) = env::var("BCM_OUTPUT_PATH") {
        config.export.output_path = PathBuf::from(value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"threshold": "9.0", "duration": "500"}`)
pub fn apply_cli_overrides(config: &mut BcmConfig, cli_args: &HashMap<String, String>) {
    // Simulation settings
    if let Some(value) = cli_args.get("threshold") {
        set_parsed(&mut config.simulation.threshold, value);
    }
    if let Some(value) = cli_args.get("learning_rate") {
        set_parsed(&mut config.simulation.learning_rate, value);
    }
    if let Some(value) = cli_args.get("duration") {
        set_parsed(&mut config.simulation.duration, value);
    }
    if let Some(value) = cli_args.get("mean_scaling") {
        config.simulation.mean_scaling = parse_bool(value);
    }
    if let Some(value) = cli_args.get("synaptic_scaling") {
        config.simulation.synaptic_scaling = parse_bool(value);
    }
    if let Some(value) = cli_args.get("seed") {
        set_parsed(&mut config.simulation.seed, value);
    }
    if let Some(value) = cli_args.get("presentation") {
        config.simulation.presentation = value.to_lowercase();
    }

    // Population settings
    if let Some(value) = cli_args.get("n_pre") {
        set_parsed(&mut config.population.n_pre, value);
    }

    // Sweep settings
    if let Some(value) = cli_args.get("min_threshold") {
        set_parsed(&mut config.sweep.min_threshold, value);
    }
    if let Some(value) = cli_args.get("max_threshold") {
        set_parsed(&mut config.sweep.max_threshold, value);
    }
    if let Some(value) = cli_args.get("step") {
        set_parsed(&mut config.sweep.step, value);
    }

    // Logging / export
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.to_lowercase();
    }
    if let Some(value) = cli_args.get("output_path") {
        config.export.output_path = PathBuf::from(value);
    }
}
