// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for experiment drivers

use bcm_config::ConfigError;
use bcm_metrics::MetricsError;
use bcm_plasticity::PlasticityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Plasticity(#[from] PlasticityError),

    #[error("Metric error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ExperimentResult<T> = Result<T, ExperimentError>;
