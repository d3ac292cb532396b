// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Default simulation constants
//!
//! These are only the defaults of [`crate::BcmConfig`]; nothing reads them
//! as shared state at runtime.

/// Learning rate applied to every BCM update
pub const LEARNING_RATE: f64 = 2e-4;

/// Plasticity threshold of the control condition (1/s)
pub const CONTROL_THRESHOLD: f64 = 7.0;

/// Plasticity threshold of the increased-LTD condition (1/s)
pub const INCREASED_THRESHOLD: f64 = 12.0;

/// Lower bound of the threshold sweep (inclusive)
pub const MIN_THRESHOLD: f64 = 5.0;

/// Upper bound of the threshold sweep (exclusive)
pub const MAX_THRESHOLD: f64 = 15.0;

/// Spacing of the threshold sweep
pub const THRESHOLD_STEP: f64 = 0.25;

/// Number of pre-synaptic inputs
pub const N_PRE: usize = 30;

/// Stimulus directions per pre-synaptic input
pub const STIMULUS_OVERSAMPLING: usize = 2;

/// Number of simulated plasticity steps
pub const T_PLASTICITY: usize = 2000;

/// Von Mises concentration (kappa) of the input tuning curves
pub const TUNING_CONCENTRATION: f64 = 6.0;

/// Peak response of an input at its preferred direction (1/s)
pub const PEAK_RATE: f64 = 10.0;

/// Stimulus-independent input rate (1/s)
pub const BASELINE_RATE: f64 = 0.0;

/// Mean post-synaptic rate held by mean-rate scaling (1/s)
pub const TARGET_RATE: f64 = 4.0;

/// Relative cosine bias of the initial weights toward the preferred direction
pub const INITIAL_BIAS: f64 = 0.2;

/// Trailing steps inspected by the convergence check
pub const CONVERGENCE_WINDOW: usize = 100;

/// Bound on the squared step-to-step change for a converged run
pub const CONVERGENCE_TOLERANCE: f64 = 1e-8;

/// Largest post-synaptic rate on the rule-curve grid (1/s)
pub const RULE_CURVE_MAX_POST: f64 = 20.0;

/// Spacing of the rule-curve grid (1/s)
pub const RULE_CURVE_STEP: f64 = 0.1;

/// Default seed for stochastic presentation and weight jitter
pub const DEFAULT_SEED: u64 = 42;
