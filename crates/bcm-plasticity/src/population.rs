// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stimulus set and tuned pre-synaptic population
//!
//! Stimuli are directions evenly spaced on `[-π, π)`. Every input has von
//! Mises tuning centred on one of the stimuli, so the response matrix is
//! fixed for the duration of a run and only the weights change.

use std::f64::consts::PI;

use bcm_config::{constants, PopulationConfig};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PlasticityError, PlasticityResult};

/// Shape of the pre-synaptic population and its initial weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    /// Number of pre-synaptic inputs
    pub n_pre: usize,
    /// Stimuli per input; input `j` prefers stimulus `j * stimulus_oversampling`
    pub stimulus_oversampling: usize,
    /// Von Mises concentration κ of the input tuning
    pub concentration: f64,
    pub peak_rate: f64,
    pub baseline_rate: f64,
    /// Amplitude of the initial cosine weight bias, in `[-1, 1]`
    pub initial_bias: f64,
    /// Direction favoured by the initial weight bias (radians)
    pub preferred_direction: f64,
    /// Relative uniform jitter applied to the initial weights, in `[0, 1)`
    pub weight_jitter: f64,
    /// Mean post-synaptic rate targeted by the initial weights and scaling
    pub target_rate: f64,
}

impl Default for PopulationParams {
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

impl From<&PopulationConfig> for PopulationParams {
    fn from(config: &PopulationConfig) -> Self {
        Self {
            n_pre: config.n_pre,
            stimulus_oversampling: config.stimulus_oversampling,
            concentration: config.concentration,
            peak_rate: config.peak_rate,
            baseline_rate: config.baseline_rate,
            initial_bias: config.initial_bias,
            preferred_direction: config.preferred_direction,
            weight_jitter: config.weight_jitter,
            target_rate: config.target_rate,
        }
    }
}

impl PopulationParams {
    /// Number of stimulus directions in one presentation cycle
    pub fn n_stimuli(&self) -> usize {
        self.n_pre * self.stimulus_oversampling
    }

    pub fn validate(&self) -> PlasticityResult<()> {
        if self.n_pre == 0 {
            return Err(PlasticityError::invalid("n_pre", "population is empty"));
        }
        if self.stimulus_oversampling == 0 {
            return Err(PlasticityError::invalid(
                "stimulus_oversampling",
                "must be at least 1",
            ));
        }
        if !self.concentration.is_finite() || self.concentration < 0.0 {
            return Err(PlasticityError::invalid(
                "concentration",
                format!("must be finite and non-negative, got {}", self.concentration),
            ));
        }
        if !self.peak_rate.is_finite() || self.peak_rate <= 0.0 {
            return Err(PlasticityError::invalid(
                "peak_rate",
                format!("must be positive, got {}", self.peak_rate),
            ));
        }
        if !self.baseline_rate.is_finite() || self.baseline_rate < 0.0 {
            return Err(PlasticityError::invalid(
                "baseline_rate",
                format!("must be non-negative, got {}", self.baseline_rate),
            ));
        }
        if !self.initial_bias.is_finite() || self.initial_bias.abs() > 1.0 {
            return Err(PlasticityError::invalid(
                "initial_bias",
                format!("must be in [-1, 1], got {}", self.initial_bias),
            ));
        }
        if !self.preferred_direction.is_finite() {
            return Err(PlasticityError::invalid(
                "preferred_direction",
                "must be finite",
            ));
        }
        if !(0.0..1.0).contains(&self.weight_jitter) {
            return Err(PlasticityError::invalid(
                "weight_jitter",
                format!("must be in [0, 1), got {}", self.weight_jitter),
            ));
        }
        if !self.target_rate.is_finite() || self.target_rate <= 0.0 {
            return Err(PlasticityError::invalid(
                "target_rate",
                format!("must be positive, got {}", self.target_rate),
            ));
        }
        Ok(())
    }
}

/// `n` directions evenly spaced on `[-π, π)`
pub fn stimulus_directions(n: usize) -> Array1<f64> {
    Array1::from_shape_fn(n, |i| -PI + 2.0 * PI * i as f64 / n as f64)
}

/// Half-wave rectification that keeps NaN visible
#[inline]
pub(crate) fn rectify(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Tuned pre-synaptic population over a fixed stimulus set
#[derive(Debug, Clone)]
pub struct Population {
    stimuli: Array1<f64>,
    preferred: Array1<f64>,
    /// `(n_stimuli, n_pre)` pre-synaptic rates
    pre_rates: Array2<f64>,
}

impl Population {
    pub fn new(params: &PopulationParams) -> PlasticityResult<Self> {
        params.validate()?;

        let stimuli = stimulus_directions(params.n_stimuli());
        let preferred = Array1::from_shape_fn(params.n_pre, |j| {
            stimuli[j * params.stimulus_oversampling]
        });
        let pre_rates = Array2::from_shape_fn((stimuli.len(), params.n_pre), |(i, j)| {
            let tuning = (params.concentration * ((stimuli[i] - preferred[j]).cos() - 1.0)).exp();
            params.baseline_rate + params.peak_rate * tuning
        });

        Ok(Self {
            stimuli,
            preferred,
            pre_rates,
        })
    }

    pub fn n_pre(&self) -> usize {
        self.preferred.len()
    }

    pub fn n_stimuli(&self) -> usize {
        self.stimuli.len()
    }

    pub fn stimuli(&self) -> &Array1<f64> {
        &self.stimuli
    }

    /// Preferred direction of every input
    pub fn preferred_directions(&self) -> &Array1<f64> {
        &self.preferred
    }

    pub fn pre_rates(&self) -> &Array2<f64> {
        &self.pre_rates
    }

    /// Rectified post-synaptic rate for every stimulus under `weights`
    pub fn responses(&self, weights: &ArrayView1<f64>) -> Array1<f64> {
        self.pre_rates.dot(weights).mapv(rectify)
    }

    /// Mean rectified post-synaptic rate over the stimulus set
    pub fn mean_response(&self, weights: &ArrayView1<f64>) -> f64 {
        self.responses(weights).mean().unwrap_or(0.0)
    }

    /// Initial weights: cosine bias, optional seeded jitter, then rescaled so
    /// the mean response equals `target_rate`
    pub fn initial_weights(
        &self,
        params: &PopulationParams,
        rng: &mut StdRng,
    ) -> PlasticityResult<Array1<f64>> {
        let mut weights = self
            .preferred
            .mapv(|c| 1.0 + params.initial_bias * (c - params.preferred_direction).cos());

        if params.weight_jitter > 0.0 {
            for w in weights.iter_mut() {
                *w *= 1.0 + params.weight_jitter * rng.gen_range(-1.0..1.0);
            }
        }

        let mean = self.mean_response(&weights.view());
        if !(mean.is_finite() && mean > 0.0) {
            return Err(PlasticityError::invalid(
                "initial_bias",
                "initial weights produce no post-synaptic response",
            ));
        }
        weights *= params.target_rate / mean;

        Ok(weights)
    }
}
