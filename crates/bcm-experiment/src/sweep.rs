// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Threshold sweep
//!
//! Runs one independent simulation per threshold and reduces each final
//! tuning curve to its OSI. Output order always follows the threshold order,
//! also when runs execute in parallel.

use bcm_config::{constants, SweepConfig};
use bcm_metrics::compute_osi_array;
use bcm_plasticity::{simulate, SimulationParams, Trajectory};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ExperimentError, ExperimentResult};

/// Range and convergence criteria of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSettings {
    pub min_threshold: f64,
    /// Exclusive upper bound
    pub max_threshold: f64,
    pub step: f64,
    pub convergence_window: usize,
    pub convergence_tolerance: f64,
    /// Run thresholds on the rayon pool (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            min_threshold: constants::MIN_THRESHOLD,
            max_threshold: constants::MAX_THRESHOLD,
            step: constants::THRESHOLD_STEP,
            convergence_window: constants::CONVERGENCE_WINDOW,
            convergence_tolerance: constants::CONVERGENCE_TOLERANCE,
            parallel: true,
        }
    }
}

impl From<&SweepConfig> for SweepSettings {
    fn from(config: &SweepConfig) -> Self {
        Self {
            min_threshold: config.min_threshold,
            max_threshold: config.max_threshold,
            step: config.step,
            convergence_window: config.convergence_window,
            convergence_tolerance: config.convergence_tolerance,
            parallel: config.parallel,
        }
    }
}

/// Outcome of one run of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub threshold: f64,
    /// OSI of the final tuning curve; NaN when the run diverged
    pub osi: f64,
    pub tail_change: f64,
    pub converged: bool,
}

/// Evenly spaced values `start + k·step` below `stop`
///
/// # Errors
/// `InvalidRange` for non-finite bounds, a non-positive step, or
/// `start >= stop`.
pub fn arange(start: f64, stop: f64, step: f64) -> ExperimentResult<Vec<f64>> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
        return Err(ExperimentError::InvalidRange(format!(
            "bounds must be finite: start={}, stop={}, step={}",
            start, stop, step
        )));
    }
    if step <= 0.0 {
        return Err(ExperimentError::InvalidRange(format!(
            "step must be positive, got {}",
            step
        )));
    }
    if start >= stop {
        return Err(ExperimentError::InvalidRange(format!(
            "start {} must be smaller than stop {}",
            start, stop
        )));
    }

    let count = ((stop - start) / step).ceil() as usize;
    Ok((0..count)
        .map(|k| start + k as f64 * step)
        .filter(|v| *v < stop)
        .collect())
}

/// Thresholds visited by a sweep: `[min, max)` in steps of `step`
pub fn threshold_range(min: f64, max: f64, step: f64) -> ExperimentResult<Vec<f64>> {
    arange(min, max, step)
}

/// Summarize a finished run
pub(crate) fn summarize(
    threshold: f64,
    trajectory: &Trajectory,
    settings: &SweepSettings,
) -> ExperimentResult<SweepPoint> {
    let tail_change = trajectory.tail_change(settings.convergence_window);
    let converged = trajectory.is_converged(
        settings.convergence_window,
        settings.convergence_tolerance,
    );

    let final_rates = trajectory.final_rates();
    let osi = if final_rates.iter().all(|r| r.is_finite()) {
        compute_osi_array(trajectory.stimuli().view(), final_rates)?
    } else {
        warn!(threshold, "Final rates are not finite; OSI undefined");
        f64::NAN
    };

    if !converged {
        warn!(threshold, tail_change, "Run did not converge");
    }

    Ok(SweepPoint {
        threshold,
        osi,
        tail_change,
        converged,
    })
}

fn sweep_point(
    params: &SimulationParams,
    threshold: f64,
    settings: &SweepSettings,
) -> ExperimentResult<SweepPoint> {
    let trajectory = simulate(&params.with_threshold(threshold))?;
    let point = summarize(threshold, &trajectory, settings)?;
    debug!(threshold, osi = point.osi, "Sweep point finished");
    Ok(point)
}

/// Run one simulation per threshold, in threshold order
pub fn run_thresholds(
    thresholds: &[f64],
    settings: &SweepSettings,
    params: &SimulationParams,
) -> ExperimentResult<Vec<SweepPoint>> {
    #[cfg(feature = "parallel")]
    {
        if settings.parallel {
            use rayon::prelude::*;
            return thresholds
                .par_iter()
                .map(|&threshold| sweep_point(params, threshold, settings))
                .collect::<ExperimentResult<Vec<_>>>();
        }
    }

    thresholds
        .iter()
        .map(|&threshold| sweep_point(params, threshold, settings))
        .collect()
}

/// Sweep the threshold over the configured range
///
/// Every other parameter comes from `params`; its own threshold is ignored.
pub fn run_sweep(
    settings: &SweepSettings,
    params: &SimulationParams,
) -> ExperimentResult<Vec<SweepPoint>> {
    let thresholds = threshold_range(
        settings.min_threshold,
        settings.max_threshold,
        settings.step,
    )?;
    params.with_threshold(settings.min_threshold).validate()?;

    info!(
        runs = thresholds.len(),
        min = settings.min_threshold,
        max = settings.max_threshold,
        step = settings.step,
        parallel = settings.parallel && cfg!(feature = "parallel"),
        "Starting threshold sweep"
    );

    let points = run_thresholds(&thresholds, settings, params)?;

    let unconverged = points.iter().filter(|p| !p.converged).count();
    info!(runs = points.len(), unconverged, "Threshold sweep finished");

    Ok(points)
}

/// Console listing of a sweep, one `threshold: OSI` line per run
///
/// Example thresholds are marked with `*`, unconverged runs are flagged.
pub fn format_sweep_table(points: &[SweepPoint], examples: &[f64]) -> String {
    let mut lines = vec!["LTD threshold : OSI".to_string()];
    for point in points {
        let mut line = format!("{:0.2}: {:0.2}", point.threshold, point.osi);
        if examples
            .iter()
            .any(|example| (example - point.threshold).abs() < 1e-9)
        {
            line.push('*');
        }
        if !point.converged {
            line.push_str(" (not converged)");
        }
        lines.push(line);
    }
    lines.join("\n")
}
