// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Orientation selectivity index
//!
//! Orientation is axial, so every response is weighted by `e^{2i·s}`:
//! opposite directions count as the same orientation. The index is the
//! length of the resulting vector sum relative to the total response.

use ndarray::ArrayView1;

use crate::{MetricsError, MetricsResult};

/// Doubled-angle vector sum and total response
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct VectorSum {
    x: f64,
    y: f64,
    total: f64,
}

impl VectorSum {
    fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

fn check_lengths(stimuli: usize, rates: usize) -> MetricsResult<()> {
    if stimuli != rates {
        return Err(MetricsError::LengthMismatch { stimuli, rates });
    }
    Ok(())
}

fn vector_sum<'a, I>(pairs: I) -> MetricsResult<VectorSum>
where
    I: Iterator<Item = (&'a f64, &'a f64)>,
{
    let mut sum = VectorSum::default();
    for (index, (&s, &r)) in pairs.enumerate() {
        if !s.is_finite() {
            return Err(MetricsError::NonFiniteStimulus { index, value: s });
        }
        if !r.is_finite() || r < 0.0 {
            return Err(MetricsError::NegativeRate { index, value: r });
        }
        let angle = 2.0 * s;
        sum.x += r * angle.cos();
        sum.y += r * angle.sin();
        sum.total += r;
    }
    Ok(sum)
}

fn osi_from_sum(sum: VectorSum) -> f64 {
    if sum.total == 0.0 {
        return 0.0;
    }
    (sum.magnitude() / sum.total).clamp(0.0, 1.0)
}

fn orientation_from_sum(sum: VectorSum) -> Option<f64> {
    if sum.magnitude() == 0.0 {
        return None;
    }
    Some(0.5 * sum.y.atan2(sum.x))
}

/// Compute the orientation selectivity index of a tuning curve
///
/// `OSI = |Σ r_i · e^{2i·s_i}| / Σ r_i`, clamped to `[0, 1]`.
///
/// # Arguments
/// * `stimuli` - Stimulus directions in radians
/// * `rates` - Non-negative responses, one per stimulus
///
/// # Errors
/// * `LengthMismatch` if the slices differ in length
/// * `NegativeRate` for a negative or non-finite rate
/// * `NonFiniteStimulus` for a non-finite direction
///
/// A silent (all-zero or empty) curve has OSI 0.
///
/// # Example
/// ```
/// use bcm_metrics::compute_osi;
/// use std::f64::consts::PI;
///
/// let stimuli = [0.0, PI / 2.0, PI, 3.0 * PI / 2.0];
///
/// assert!(compute_osi(&stimuli, &[1.0, 1.0, 1.0, 1.0]).unwrap() < 1e-12);
/// assert!((compute_osi(&stimuli, &[1.0, 0.0, 0.0, 0.0]).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn compute_osi(stimuli: &[f64], rates: &[f64]) -> MetricsResult<f64> {
    check_lengths(stimuli.len(), rates.len())?;
    vector_sum(stimuli.iter().zip(rates)).map(osi_from_sum)
}

/// [`compute_osi`] over array views, e.g. one row of a rate history
pub fn compute_osi_array(stimuli: ArrayView1<f64>, rates: ArrayView1<f64>) -> MetricsResult<f64> {
    check_lengths(stimuli.len(), rates.len())?;
    vector_sum(stimuli.iter().zip(rates.iter())).map(osi_from_sum)
}

/// Preferred orientation in `(-π/2, π/2]`
///
/// Half the angle of the doubled-angle vector sum; `None` when the sum
/// vanishes (untuned or silent curve).
pub fn preferred_orientation(stimuli: &[f64], rates: &[f64]) -> MetricsResult<Option<f64>> {
    check_lengths(stimuli.len(), rates.len())?;
    vector_sum(stimuli.iter().zip(rates)).map(orientation_from_sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn directions(n: usize) -> Vec<f64> {
        (0..n).map(|i| -PI + 2.0 * PI * i as f64 / n as f64).collect()
    }

    #[test]
    fn test_uniform_response_is_untuned() {
        let stimuli = directions(16);
        let osi = compute_osi(&stimuli, &[3.0; 16]).unwrap();
        assert!(osi.abs() < 1e-12);
    }

    #[test]
    fn test_quadrature_directions_leave_rounding_residue() {
        // sin(2π) is not exactly zero in f64
        let stimuli = [0.0, PI / 2.0, PI, 3.0 * PI / 2.0];
        let osi = compute_osi(&stimuli, &[1.0; 4]).unwrap();
        assert!(osi < 1e-12);
    }

    #[test]
    fn test_single_direction_is_fully_selective() {
        let stimuli = directions(16);
        let mut rates = vec![0.0; 16];
        rates[5] = 2.5;
        let osi = compute_osi(&stimuli, &rates).unwrap();
        assert!((osi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_directions_share_orientation() {
        let stimuli = directions(8);
        let mut rates = vec![0.0; 8];
        rates[1] = 1.0;
        rates[5] = 1.0;
        let osi = compute_osi(&stimuli, &rates).unwrap();
        assert!((osi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_silent_curve() {
        let stimuli = directions(8);
        assert_eq!(compute_osi(&stimuli, &[0.0; 8]).unwrap(), 0.0);
        assert_eq!(compute_osi(&[], &[]).unwrap(), 0.0);
        assert_eq!(preferred_orientation(&stimuli, &[0.0; 8]).unwrap(), None);
    }

    #[test]
    fn test_length_mismatch() {
        let result = compute_osi(&[0.0, 1.0], &[1.0]);
        assert_eq!(
            result,
            Err(MetricsError::LengthMismatch {
                stimuli: 2,
                rates: 1
            })
        );
    }

    #[test]
    fn test_negative_and_nan_rates_rejected() {
        let stimuli = directions(3);
        assert!(matches!(
            compute_osi(&stimuli, &[1.0, -0.5, 1.0]),
            Err(MetricsError::NegativeRate { index: 1, .. })
        ));
        assert!(matches!(
            compute_osi(&stimuli, &[1.0, 1.0, f64::NAN]),
            Err(MetricsError::NegativeRate { index: 2, .. })
        ));
        assert!(matches!(
            compute_osi(&[0.0, f64::INFINITY, 1.0], &[1.0, 1.0, 1.0]),
            Err(MetricsError::NonFiniteStimulus { index: 1, .. })
        ));
    }

    #[test]
    fn test_preferred_orientation() {
        let stimuli = directions(8);
        let mut rates = vec![0.0; 8];
        // Direction π/4 and its opposite -3π/4
        rates[5] = 1.0;
        rates[1] = 1.0;
        let orientation = preferred_orientation(&stimuli, &rates).unwrap().unwrap();
        assert!((orientation - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_array_view_matches_slice() {
        let stimuli = array![0.0, PI / 3.0, 2.0 * PI / 3.0, PI];
        let rates = array![[4.0, 1.0, 0.5, 2.0], [0.0, 0.0, 0.0, 0.0]];

        let from_view = compute_osi_array(stimuli.view(), rates.row(0)).unwrap();
        let from_slice = compute_osi(stimuli.as_slice().unwrap(), &[4.0, 1.0, 0.5, 2.0]).unwrap();
        assert_eq!(from_view, from_slice);
        assert_eq!(compute_osi_array(stimuli.view(), rates.row(1)).unwrap(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_osi_in_unit_interval(rates in proptest::collection::vec(0.0f64..100.0, 1..64)) {
            let stimuli = directions(rates.len());
            let osi = compute_osi(&stimuli, &rates).unwrap();
            prop_assert!((0.0..=1.0).contains(&osi));
        }

        #[test]
        fn prop_osi_scale_invariant(
            rates in proptest::collection::vec(0.0f64..10.0, 4..32),
            scale in 0.1f64..100.0,
        ) {
            let stimuli = directions(rates.len());
            let scaled: Vec<f64> = rates.iter().map(|r| r * scale).collect();
            let a = compute_osi(&stimuli, &rates).unwrap();
            let b = compute_osi(&stimuli, &scaled).unwrap();
            prop_assert!((a - b).abs() < 1e-9);
        }

        #[test]
        fn prop_nonuniform_curve_is_positive(
            base in 0.0f64..5.0,
            bump in 0.5f64..10.0,
            at in 0usize..24,
        ) {
            let stimuli = directions(24);
            let mut rates = vec![base; 24];
            rates[at] += bump;
            let osi = compute_osi(&stimuli, &rates).unwrap();
            prop_assert!(osi > 0.0 && osi <= 1.0);
        }
    }
}
