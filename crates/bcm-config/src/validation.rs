// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module checks that configuration values are finite, within valid
//! ranges, and consistent with each other before any simulation starts.

use crate::{BcmConfig, ConfigError, ConfigResult};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NotFinite { field: String, value: f64 },
    InvalidValue { field: String, reason: String },
    InvalidRange { min_field: String, max_field: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFinite { field, value } => {
                write!(f, "{} = {} is not a finite number", field, value)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::InvalidRange {
                min_field,
                max_field,
            } => {
                write!(f, "{} must be smaller than {}", min_field, max_field)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Non-finite numeric parameters
/// - Value ranges (positive rates, non-empty population, ...)
/// - Sweep range consistency
/// - Known enumerated values (log level, presentation schedule)
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation found
pub fn validate_config(config: &BcmConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_finite(config, &mut errors);
    validate_simulation(config, &mut errors);
    validate_population(config, &mut errors);
    validate_sweep(config, &mut errors);
    validate_enumerations(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn invalid(errors: &mut Vec<ConfigValidationError>, field: &str, reason: &str) {
    errors.push(ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    });
}

/// Every float field must be finite; range checks below assume it
fn validate_finite(config: &BcmConfig, errors: &mut Vec<ConfigValidationError>) {
    let fields = [
        ("simulation.threshold", config.simulation.threshold),
        ("simulation.learning_rate", config.simulation.learning_rate),
        ("simulation.homeostasis_tau", config.simulation.homeostasis_tau),
        ("population.concentration", config.population.concentration),
        ("population.peak_rate", config.population.peak_rate),
        ("population.baseline_rate", config.population.baseline_rate),
        ("population.initial_bias", config.population.initial_bias),
        (
            "population.preferred_direction",
            config.population.preferred_direction,
        ),
        ("population.weight_jitter", config.population.weight_jitter),
        ("population.target_rate", config.population.target_rate),
        ("sweep.min_threshold", config.sweep.min_threshold),
        ("sweep.max_threshold", config.sweep.max_threshold),
        ("sweep.step", config.sweep.step),
        (
            "sweep.convergence_tolerance",
            config.sweep.convergence_tolerance,
        ),
    ];

    for (field, value) in fields {
        if !value.is_finite() {
            errors.push(ConfigValidationError::NotFinite {
                field: field.to_string(),
                value,
            });
        }
    }

    for (i, threshold) in config.sweep.example_thresholds.iter().enumerate() {
        if !threshold.is_finite() {
            errors.push(ConfigValidationError::NotFinite {
                field: format!("sweep.example_thresholds[{}]", i),
                value: *threshold,
            });
        }
    }
}

fn validate_simulation(config: &BcmConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulation;

    if sim.learning_rate < 0.0 {
        invalid(errors, "simulation.learning_rate", "must be non-negative");
    }
    if sim.duration == 0 {
        invalid(errors, "simulation.duration", "must be at least one step");
    }
    if sim.homeostasis_tau < 1.0 {
        invalid(errors, "simulation.homeostasis_tau", "must be at least 1 step");
    }
}

fn validate_population(config: &BcmConfig, errors: &mut Vec<ConfigValidationError>) {
    let pop = &config.population;

    if pop.n_pre == 0 {
        invalid(errors, "population.n_pre", "must be positive");
    }
    if pop.stimulus_oversampling == 0 {
        invalid(errors, "population.stimulus_oversampling", "must be positive");
    }
    if pop.concentration < 0.0 {
        invalid(errors, "population.concentration", "must be non-negative");
    }
    if pop.peak_rate <= 0.0 {
        invalid(errors, "population.peak_rate", "must be positive");
    }
    if pop.baseline_rate < 0.0 {
        invalid(errors, "population.baseline_rate", "must be non-negative");
    }
    if pop.initial_bias.abs() > 1.0 {
        invalid(errors, "population.initial_bias", "must be between -1.0 and 1.0");
    }
    if !(0.0..1.0).contains(&pop.weight_jitter) {
        invalid(errors, "population.weight_jitter", "must be in [0.0, 1.0)");
    }
    if pop.target_rate <= 0.0 {
        invalid(errors, "population.target_rate", "must be positive");
    }
}

fn validate_sweep(config: &BcmConfig, errors: &mut Vec<ConfigValidationError>) {
    let sweep = &config.sweep;

    if sweep.min_threshold >= sweep.max_threshold {
        errors.push(ConfigValidationError::InvalidRange {
            min_field: "sweep.min_threshold".to_string(),
            max_field: "sweep.max_threshold".to_string(),
        });
    }
    if sweep.step <= 0.0 {
        invalid(errors, "sweep.step", "must be positive");
    }
    if sweep.convergence_window < 2 {
        invalid(errors, "sweep.convergence_window", "must cover at least 2 steps");
    }
    if sweep.convergence_tolerance < 0.0 {
        invalid(errors, "sweep.convergence_tolerance", "must be non-negative");
    }
}

fn validate_enumerations(config: &BcmConfig, errors: &mut Vec<ConfigValidationError>) {
    if !BcmConfig::LOG_LEVELS.contains(&config.logging.level.as_str()) {
        invalid(
            errors,
            "logging.level",
            "must be one of trace, debug, info, warn, error",
        );
    }
    if !BcmConfig::PRESENTATIONS.contains(&config.simulation.presentation.as_str()) {
        invalid(
            errors,
            "simulation.presentation",
            "must be 'batch', 'cycled' or 'sampled'",
        );
    }
}
