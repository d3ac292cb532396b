// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for bcm-plasticity
//!
//! Full-length runs with the default population: the learned tuning curve
//! settles, and the threshold shapes its peak.

use bcm_config::constants::{
    CONTROL_THRESHOLD, CONVERGENCE_TOLERANCE, CONVERGENCE_WINDOW, INCREASED_THRESHOLD,
    LEARNING_RATE, T_PLASTICITY,
};
use bcm_plasticity::*;

/// Default run with synaptic scaling holding the mean response
fn scaled_run(threshold: f64) -> Trajectory {
    let params = SimulationParams {
        threshold,
        synaptic_scaling: true,
        ..Default::default()
    };
    simulate(&params).unwrap()
}

fn peak(values: ndarray::ArrayView1<f64>) -> (usize, f64) {
    values
        .iter()
        .cloned()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}

#[test]
fn test_control_threshold_converges() {
    let trajectory = scaled_run(CONTROL_THRESHOLD);

    assert_eq!(trajectory.len(), T_PLASTICITY);
    assert!(trajectory.is_converged(CONVERGENCE_WINDOW, CONVERGENCE_TOLERANCE));
    assert!(trajectory.tail_change(CONVERGENCE_WINDOW) < 1e-8);
}

#[test]
fn test_increased_threshold_converges() {
    let trajectory = scaled_run(INCREASED_THRESHOLD);

    assert!(trajectory.is_converged(CONVERGENCE_WINDOW, CONVERGENCE_TOLERANCE));
    assert!(trajectory.tail_change(CONVERGENCE_WINDOW) < 1e-8);
}

#[test]
fn test_higher_threshold_sharpens_tuning() {
    let control = scaled_run(CONTROL_THRESHOLD);
    let increased = scaled_run(INCREASED_THRESHOLD);

    let (control_index, control_peak) = peak(control.final_rates());
    let (increased_index, increased_peak) = peak(increased.final_rates());

    // Same mean rate, so a taller peak means a narrower curve
    assert!(increased_peak > control_peak);

    // Both peaks stay at the direction favoured by the initial bias
    let center = control.stimuli().len() / 2;
    assert_eq!(control_index, center);
    assert_eq!(increased_index, center);
}

#[test]
fn test_learning_silences_some_inputs() {
    let trajectory = scaled_run(CONTROL_THRESHOLD);
    let weights = trajectory.final_weights();

    assert!(weights.iter().all(|w| *w >= 0.0));
    assert!(weights.iter().any(|w| *w == 0.0));
    assert!(weights.iter().any(|w| *w > 0.0));
}

#[test]
fn test_update_normalization_alone_settles_silent() {
    // Every rate starts below the threshold, so depression wins
    let trajectory =
        simulate_with_plasticity(CONTROL_THRESHOLD, LEARNING_RATE, T_PLASTICITY, true).unwrap();

    assert!(trajectory.rates().row(0).iter().all(|r| *r < CONTROL_THRESHOLD));
    assert!(trajectory.final_rates().iter().all(|r| *r == 0.0));
    assert!(trajectory.final_weights().iter().all(|w| *w == 0.0));
    assert_eq!(trajectory.tail_change(CONVERGENCE_WINDOW), 0.0);
}

#[test]
fn test_without_scaling_activity_decays() {
    let trajectory =
        simulate_with_plasticity(CONTROL_THRESHOLD, LEARNING_RATE, T_PLASTICITY, false).unwrap();

    let initial_mean = trajectory.rates().row(0).mean().unwrap();
    let final_mean = trajectory.final_rates().mean().unwrap();
    assert!(initial_mean > 1.0);
    assert!(final_mean < 1e-6);
}

#[test]
fn test_simulator_steps_match_run() {
    let params = SimulationParams {
        duration: 50,
        ..Default::default()
    };
    let trajectory = simulate(&params).unwrap();

    let mut simulator = PlasticitySimulator::new(params).unwrap();
    for t in 0..params.duration {
        assert_eq!(simulator.weights(), trajectory.weights().row(t));
        let (rates, presented) = simulator.step(t);
        assert_eq!(rates.view(), trajectory.rates().row(t));
        assert!(presented.is_none());
    }
}
