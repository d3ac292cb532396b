// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Time-stepped plasticity simulator
//!
//! One post-synaptic unit receives a tuned pre-synaptic population. Every
//! step computes the tuning curve from the current weights and applies the
//! BCM rule for the presented stimuli. Two homeostatic controls are optional:
//!
//! - mean-rate scaling divides the update by a running average of the
//!   post-synaptic rate, `Δw = lr · rule / r̄`
//! - synaptic scaling rescales the updated weights so the mean response
//!   returns to `target_rate`
//!
//! Row `t` of the recorded rates is always computed from row `t` of the
//! recorded weights, i.e. both are captured before the update of step `t`.

use std::fmt;
use std::str::FromStr;

use bcm_config::{constants, BcmConfig};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlasticityError, PlasticityResult};
use crate::population::{rectify, Population, PopulationParams};
use crate::rule::{bcm_update_array, bcm_update_slice};

/// Which stimuli drive the update of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// Every stimulus, averaged
    #[default]
    Batch,
    /// Stimulus `t mod n_stimuli`
    Cycled,
    /// One stimulus drawn uniformly from the seeded generator
    Sampled,
}

impl Presentation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presentation::Batch => "batch",
            Presentation::Cycled => "cycled",
            Presentation::Sampled => "sampled",
        }
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Presentation {
    type Err = PlasticityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "batch" => Ok(Presentation::Batch),
            "cycled" => Ok(Presentation::Cycled),
            "sampled" => Ok(Presentation::Sampled),
            _ => Err(PlasticityError::UnknownPresentation(s.to_string())),
        }
    }
}

/// Full parameter set of one plasticity run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// BCM threshold θ
    pub threshold: f64,
    pub learning_rate: f64,
    /// Number of simulated steps
    pub duration: usize,
    /// Divide each update by the running average post-synaptic rate
    pub mean_scaling: bool,
    /// Running average time constant in steps; 1 tracks the current rate
    pub homeostasis_tau: f64,
    /// Rescale weights to `target_rate` mean response after each update
    pub synaptic_scaling: bool,
    /// Clip weights at zero after each update
    pub nonnegative_weights: bool,
    pub presentation: Presentation,
    pub seed: u64,
    pub population: PopulationParams,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            threshold: constants::CONTROL_THRESHOLD,
            learning_rate: constants::LEARNING_RATE,
            duration: constants::T_PLASTICITY,
            mean_scaling: true,
            homeostasis_tau: 1.0,
            synaptic_scaling: false,
            nonnegative_weights: true,
            presentation: Presentation::Batch,
            seed: constants::DEFAULT_SEED,
            population: PopulationParams::default(),
        }
    }
}

impl SimulationParams {
    /// Build run parameters from the `[simulation]` and `[population]` sections
    pub fn from_config(config: &BcmConfig) -> PlasticityResult<Self> {
        let sim = &config.simulation;
        Ok(Self {
            threshold: sim.threshold,
            learning_rate: sim.learning_rate,
            duration: sim.duration,
            mean_scaling: sim.mean_scaling,
            homeostasis_tau: sim.homeostasis_tau,
            synaptic_scaling: sim.synaptic_scaling,
            nonnegative_weights: sim.nonnegative_weights,
            presentation: sim.presentation.parse()?,
            seed: sim.seed,
            population: PopulationParams::from(&config.population),
        })
    }

    /// Same parameters with a different threshold
    pub fn with_threshold(self, threshold: f64) -> Self {
        Self { threshold, ..self }
    }

    pub fn validate(&self) -> PlasticityResult<()> {
        if self.duration == 0 {
            return Err(PlasticityError::invalid(
                "duration",
                "must be at least one step",
            ));
        }
        if !self.threshold.is_finite() {
            return Err(PlasticityError::invalid(
                "threshold",
                format!("must be finite, got {}", self.threshold),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(PlasticityError::invalid(
                "learning_rate",
                format!("must be finite and non-negative, got {}", self.learning_rate),
            ));
        }
        if !self.homeostasis_tau.is_finite() || self.homeostasis_tau < 1.0 {
            return Err(PlasticityError::invalid(
                "homeostasis_tau",
                format!("must be at least 1 step, got {}", self.homeostasis_tau),
            ));
        }
        self.population.validate()
    }
}

/// Recorded history of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    stimuli: Array1<f64>,
    preferred: Array1<f64>,
    pre_rates: Array2<f64>,
    rates: Array2<f64>,
    weights: Array2<f64>,
    presented: Vec<usize>,
}

impl Trajectory {
    /// Stimulus directions, length `n_stimuli`
    pub fn stimuli(&self) -> &Array1<f64> {
        &self.stimuli
    }

    /// Preferred direction of every pre-synaptic input, length `n_pre`
    pub fn preferred_directions(&self) -> &Array1<f64> {
        &self.preferred
    }

    /// `(n_stimuli, n_pre)` pre-synaptic responses
    pub fn pre_rates(&self) -> &Array2<f64> {
        &self.pre_rates
    }

    /// `(T, n_stimuli)` post-synaptic tuning curve per step
    pub fn rates(&self) -> &Array2<f64> {
        &self.rates
    }

    /// `(T, n_pre)` weights per step
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Presented stimulus index per step; empty for batch presentation
    pub fn presented(&self) -> &[usize] {
        &self.presented
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.rates.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tuning curve of the last step
    pub fn final_rates(&self) -> ArrayView1<'_, f64> {
        self.rates.row(self.len() - 1)
    }

    /// Weights of the last step
    pub fn final_weights(&self) -> ArrayView1<'_, f64> {
        self.weights.row(self.len() - 1)
    }

    /// Largest absolute change between successive rows of rates and weights
    /// over the last `window` steps
    ///
    /// Returns 0 with fewer than two rows in the window, NaN once any value
    /// in the window is non-finite.
    pub fn tail_change(&self, window: usize) -> f64 {
        let start = self.len().saturating_sub(window);
        let mut change: f64 = 0.0;
        for history in [&self.rates, &self.weights] {
            let tail = history.slice_axis(Axis(0), (start..).into());
            for pair in tail.windows((2, tail.ncols())) {
                for (a, b) in pair.row(1).iter().zip(pair.row(0).iter()) {
                    let d = (a - b).abs();
                    if d.is_nan() || d > change {
                        change = d;
                    }
                }
                if change.is_nan() {
                    return change;
                }
            }
        }
        change
    }

    /// Squared tail change within `tolerance`
    pub fn is_converged(&self, window: usize, tolerance: f64) -> bool {
        let change = self.tail_change(window);
        change * change <= tolerance
    }
}

/// Stateful simulator for one run
pub struct PlasticitySimulator {
    params: SimulationParams,
    population: Population,
    weights: Array1<f64>,
    /// Post-synaptic factor of the rule per stimulus, reused across steps
    post_terms: Array1<f64>,
    running_rate: f64,
    rng: StdRng,
    diverged: bool,
}

impl PlasticitySimulator {
    /// Validate `params` and build the population and initial weights
    pub fn new(params: SimulationParams) -> PlasticityResult<Self> {
        params.validate()?;

        let population = Population::new(&params.population)?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let weights = population.initial_weights(&params.population, &mut rng)?;

        Ok(Self {
            post_terms: Array1::zeros(population.n_stimuli()),
            running_rate: population.mean_response(&weights.view()),
            params,
            population,
            weights,
            rng,
            diverged: false,
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Running average post-synaptic rate used by mean-rate scaling
    pub fn running_rate(&self) -> f64 {
        self.running_rate
    }

    /// Advance one step
    ///
    /// Returns the tuning curve computed from the weights before the update
    /// and the presented stimulus (`None` for batch presentation).
    pub fn step(&mut self, t: usize) -> (Array1<f64>, Option<usize>) {
        let theta = self.params.threshold;
        let n_stimuli = self.population.n_stimuli();
        let rates = self.population.responses(&self.weights.view());
        let pre = self.population.pre_rates();

        let presented = match self.params.presentation {
            Presentation::Batch => None,
            Presentation::Cycled => Some(t % n_stimuli),
            Presentation::Sampled => Some(self.rng.gen_range(0..n_stimuli)),
        };

        // Rule is linear in pre: post * (post - theta) per stimulus
        match (rates.as_slice(), self.post_terms.as_slice_mut()) {
            (Some(post), Some(terms)) => bcm_update_slice(1.0, post, theta, terms),
            _ => self.post_terms.assign(&bcm_update_array(1.0, &rates, theta)),
        }

        let mut dw = match presented {
            None => pre.t().dot(&self.post_terms) / n_stimuli as f64,
            Some(i) => {
                let term = self.post_terms[i];
                pre.row(i).mapv(|p| p * term)
            }
        };

        if self.params.mean_scaling {
            let mean_rate = rates.mean().unwrap_or(0.0);
            self.running_rate += (mean_rate - self.running_rate) / self.params.homeostasis_tau;
            if self.running_rate.is_finite() && self.running_rate > 0.0 {
                dw /= self.running_rate;
            }
        }

        self.weights.scaled_add(self.params.learning_rate, &dw);
        if self.params.nonnegative_weights {
            self.weights.mapv_inplace(rectify);
        }

        if self.params.synaptic_scaling {
            self.apply_synaptic_scaling();
        }

        if !self.diverged && self.weights.iter().any(|w| !w.is_finite()) {
            self.diverged = true;
            warn!(
                threshold = theta,
                step = t,
                "Weights became non-finite; continuing the run"
            );
        }

        (rates, presented)
    }

    fn apply_synaptic_scaling(&mut self) {
        let mean_rate = self.population.mean_response(&self.weights.view());
        if mean_rate.is_finite() && mean_rate > 0.0 {
            self.weights *= self.params.population.target_rate / mean_rate;
        }
    }

    /// Run all steps and return the recorded trajectory
    pub fn run(mut self) -> Trajectory {
        let duration = self.params.duration;
        let n_stimuli = self.population.n_stimuli();
        let n_pre = self.population.n_pre();

        debug!(
            threshold = self.params.threshold,
            learning_rate = self.params.learning_rate,
            duration,
            mean_scaling = self.params.mean_scaling,
            synaptic_scaling = self.params.synaptic_scaling,
            presentation = %self.params.presentation,
            "Starting plasticity run"
        );

        let mut rates = Array2::zeros((duration, n_stimuli));
        let mut weights = Array2::zeros((duration, n_pre));
        let mut presented = Vec::new();

        for t in 0..duration {
            weights.row_mut(t).assign(&self.weights);
            let (step_rates, index) = self.step(t);
            rates.row_mut(t).assign(&step_rates);
            presented.extend(index);
        }

        let trajectory = Trajectory {
            stimuli: self.population.stimuli().clone(),
            preferred: self.population.preferred_directions().clone(),
            pre_rates: self.population.pre_rates().clone(),
            rates,
            weights,
            presented,
        };

        debug!(
            threshold = self.params.threshold,
            tail_change = trajectory.tail_change(constants::CONVERGENCE_WINDOW),
            "Finished plasticity run"
        );

        trajectory
    }
}

/// Run a simulation with explicit parameters
pub fn simulate(params: &SimulationParams) -> PlasticityResult<Trajectory> {
    Ok(PlasticitySimulator::new(*params)?.run())
}

/// Run a simulation with default population parameters
///
/// # Example
/// ```no_run
/// use bcm_plasticity::simulate_with_plasticity;
///
/// let trajectory = simulate_with_plasticity(7.0, 2e-4, 2000, true).unwrap();
/// assert!(trajectory.is_converged(100, 1e-8));
/// ```
pub fn simulate_with_plasticity(
    threshold: f64,
    learning_rate: f64,
    duration: usize,
    mean_scaling: bool,
) -> PlasticityResult<Trajectory> {
    let params = SimulationParams {
        threshold,
        learning_rate,
        duration,
        mean_scaling,
        ..Default::default()
    };
    simulate(&params)
}
