// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `bcm_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BcmConfig {
    pub simulation: SimulationConfig,
    pub population: PopulationConfig,
    pub sweep: SweepConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

/// Parameters of a single plasticity run
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub threshold: f64,
    pub learning_rate: f64,
    /// Number of simulated steps (T)
    pub duration: usize,
    /// Divide each weight update by the running average post-synaptic rate
    pub mean_scaling: bool,
    /// Time constant of the running average rate, in steps (1 = instantaneous)
    pub homeostasis_tau: f64,
    /// Rescale weights after each update so the mean response is
    /// `population.target_rate`
    pub synaptic_scaling: bool,
    pub nonnegative_weights: bool,
    /// Allowed values: "batch", "cycled", "sampled"
    pub presentation: String,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            threshold: constants::CONTROL_THRESHOLD,
            learning_rate: constants::LEARNING_RATE,
            duration: constants::T_PLASTICITY,
            mean_scaling: true,
            homeostasis_tau: 1.0,
            synaptic_scaling: false,
            nonnegative_weights: true,
            presentation: "batch".to_string(),
            seed: constants::DEFAULT_SEED,
        }
    }
}

/// Pre-synaptic population and initial connectivity
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub n_pre: usize,
    pub stimulus_oversampling: usize,
    pub concentration: f64,
    pub peak_rate: f64,
    pub baseline_rate: f64,
    pub initial_bias: f64,
    /// Direction (radians) favoured by the initial weights
    pub preferred_direction: f64,
    pub weight_jitter: f64,
    pub target_rate: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            n_pre: constants::N_PRE,
            stimulus_oversampling: constants::STIMULUS_OVERSAMPLING,
            concentration: constants::TUNING_CONCENTRATION,
            peak_rate: constants::PEAK_RATE,
            baseline_rate: constants::BASELINE_RATE,
            initial_bias: constants::INITIAL_BIAS,
            preferred_direction: 0.0,
            weight_jitter: 0.0,
            target_rate: constants::TARGET_RATE,
        }
    }
}

/// Threshold sweep settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    pub min_threshold: f64,
    /// Exclusive upper bound
    pub max_threshold: f64,
    pub step: f64,
    /// Thresholds shown as example runs and marked in the sweep table
    pub example_thresholds: Vec<f64>,
    pub convergence_window: usize,
    pub convergence_tolerance: f64,
    /// Run the sweep on the rayon pool (needs the `parallel` feature downstream)
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_threshold: constants::MIN_THRESHOLD,
            max_threshold: constants::MAX_THRESHOLD,
            step: constants::THRESHOLD_STEP,
            example_thresholds: vec![
                constants::CONTROL_THRESHOLD,
                constants::INCREASED_THRESHOLD,
            ],
            convergence_window: constants::CONVERGENCE_WINDOW,
            convergence_tolerance: constants::CONVERGENCE_TOLERANCE,
            parallel: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    pub log_dir: PathBuf,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_logging: false,
        }
    }
}

/// Tabular export settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("results/plasticity_threshold.json"),
        }
    }
}

impl BcmConfig {
    /// Log levels accepted by `logging.level`
    pub const LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Presentation schedules accepted by `simulation.presentation`
    pub const PRESENTATIONS: &'static [&'static str] = &["batch", "cycled", "sampled"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = BcmConfig::default();
        assert_eq!(config.simulation.threshold, constants::CONTROL_THRESHOLD);
        assert_eq!(config.simulation.duration, constants::T_PLASTICITY);
        assert_eq!(config.population.n_pre, constants::N_PRE);
        assert_eq!(config.sweep.example_thresholds, vec![7.0, 12.0]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BcmConfig = toml::from_str(
            r#"
            [simulation]
            threshold = 9.5

            [population]
            n_pre = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.threshold, 9.5);
        assert_eq!(config.population.n_pre, 12);
        assert_eq!(config.simulation.learning_rate, constants::LEARNING_RATE);
        assert_eq!(config.sweep.step, constants::THRESHOLD_STEP);
        assert!(config.simulation.mean_scaling);
        assert!(!config.simulation.synaptic_scaling);
    }
}
