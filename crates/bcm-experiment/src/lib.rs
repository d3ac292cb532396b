// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bcm-experiment
//!
//! Experiment drivers on top of the plasticity simulator: the threshold
//! sweep, example runs, the four figure panels and their JSON export.
//!
//! ## Features
//! - `parallel` (default): run sweep thresholds on the rayon pool
//! - `file-logging`: per-run log files for the `bcm-experiment` binary

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod export;
pub mod figure;
pub mod sweep;

pub use error::{ExperimentError, ExperimentResult};
pub use export::write_json;
pub use figure::{
    build_figure, example_runs, rate_panel, rule_curve, sweep_panel, weight_panel, Column,
    ExampleRun, FigureData, PanelTable,
};
pub use sweep::{
    arange, format_sweep_table, run_sweep, run_thresholds, threshold_range, SweepPoint,
    SweepSettings,
};
