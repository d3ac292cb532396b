// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bcm-plasticity
//!
//! BCM synaptic plasticity for a single rate-based unit driven by an
//! orientation-tuned input population.
//!
//! ## Modules
//! - [`rule`]: the pure update `Δw = pre · post · (post − θ)` in scalar,
//!   array and slice form
//! - [`population`]: stimulus set, von Mises input tuning, initial weights
//! - [`simulator`]: the step loop with optional mean-rate scaling of the
//!   update and synaptic scaling of the weights
//!
//! ## Example
//! ```no_run
//! use bcm_plasticity::{simulate, SimulationParams};
//!
//! let params = SimulationParams {
//!     synaptic_scaling: true,
//!     ..Default::default()
//! }
//! .with_threshold(12.0);
//! let trajectory = simulate(&params).unwrap();
//! println!("tail change: {:e}", trajectory.tail_change(100));
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod population;
pub mod rule;
pub mod simulator;

pub use error::{PlasticityError, PlasticityResult};
pub use population::{stimulus_directions, Population, PopulationParams};
pub use rule::{bcm_update, bcm_update_array, bcm_update_slice};
pub use simulator::{
    simulate, simulate_with_plasticity, PlasticitySimulator, Presentation, SimulationParams,
    Trajectory,
};
