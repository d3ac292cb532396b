// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # bcm-selectivity
//!
//! Simulations of BCM synaptic plasticity driving one rate-based unit from an
//! orientation-tuned input population, and of how the plasticity threshold
//! shapes the orientation selectivity (OSI) of the learned response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bcm_selectivity::prelude::*;
//!
//! let params = SimulationParams {
//!     synaptic_scaling: true,
//!     ..Default::default()
//! }
//! .with_threshold(12.0);
//! let trajectory = simulate(&params)?;
//! assert!(trajectory.is_converged(100, 1e-8));
//!
//! let osi = compute_osi_array(trajectory.stimuli().view(), trajectory.final_rates())?;
//! println!("OSI at threshold 12: {:.2}", osi);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): threshold sweep on the rayon pool
//! - **`file-logging`**: per-run log files
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: bcm-config, bcm-observability              │
//! │  (Constants, TOML config, logging)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: bcm-plasticity, bcm-metrics                │
//! │  (BCM rule, simulator, OSI)                             │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Experiments: bcm-experiment                            │
//! │  (Threshold sweep, figure panels, JSON export, CLI)     │
//! └─────────────────────────────────────────────────────────┘
//! ```

// Re-export foundation
pub use bcm_config as config;
pub use bcm_observability as observability;

// Re-export algorithms
pub use bcm_metrics as metrics;
pub use bcm_plasticity as plasticity;

// Re-export experiment drivers
pub use bcm_experiment as experiment;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::config::{load_config, validate_config, BcmConfig};

    pub use crate::plasticity::{
        bcm_update, bcm_update_array, simulate, simulate_with_plasticity, PlasticitySimulator,
        Presentation, SimulationParams, Trajectory,
    };

    pub use crate::metrics::{compute_osi, compute_osi_array, preferred_orientation};

    pub use crate::experiment::{
        build_figure, run_sweep, threshold_range, write_json, FigureData, SweepPoint,
        SweepSettings,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_defaults_agree_with_config() {
        let config = BcmConfig::default();
        let params = SimulationParams::from_config(&config).unwrap();
        assert_eq!(params, SimulationParams::default());
    }
}
