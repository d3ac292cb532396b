// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bcm-metrics
//!
//! Selectivity measures for tuning curves sampled on a set of stimulus
//! directions.

use thiserror::Error;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod osi;

pub use osi::{compute_osi, compute_osi_array, preferred_orientation};

/// Errors for malformed tuning curves
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Length mismatch: {stimuli} stimuli but {rates} rates")]
    LengthMismatch { stimuli: usize, rates: usize },

    #[error("Rate at index {index} must be finite and non-negative, got {value}")]
    NegativeRate { index: usize, value: f64 },

    #[error("Stimulus direction at index {index} is not finite: {value}")]
    NonFiniteStimulus { index: usize, value: f64 },
}

pub type MetricsResult<T> = Result<T, MetricsError>;
