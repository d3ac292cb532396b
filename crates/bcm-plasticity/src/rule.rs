// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pure BCM update rule
//!
//! `Δw = pre · post · (post − θ)`: potentiation when the post-synaptic rate
//! exceeds the threshold θ, depression below it, no change at it.
//! All forms are side-effect free and follow IEEE semantics for NaN.

use ndarray::{Array, ArrayBase, Data, Dimension};

/// Compute the BCM weight change for a single synapse
///
/// # Arguments
/// * `pre` - Pre-synaptic rate
/// * `post` - Post-synaptic rate
/// * `theta` - Plasticity threshold
///
/// # Example
/// ```
/// use bcm_plasticity::rule::bcm_update;
///
/// // Above threshold → potentiation
/// assert!(bcm_update(1.0, 10.0, 7.0) > 0.0);
///
/// // Below threshold → depression
/// assert!(bcm_update(1.0, 3.0, 7.0) < 0.0);
///
/// // At threshold → no change
/// assert_eq!(bcm_update(1.0, 7.0, 7.0), 0.0);
/// ```
#[inline]
pub fn bcm_update(pre: f64, post: f64, theta: f64) -> f64 {
    pre * post * (post - theta)
}

/// Apply [`bcm_update`] elementwise over post-synaptic rates of any shape
///
/// The result has the same shape as `post`; element `k` equals
/// `bcm_update(pre, post[k], theta)`.
///
/// # Example
/// ```
/// use bcm_plasticity::rule::bcm_update_array;
/// use ndarray::array;
///
/// let dw = bcm_update_array(2.0, &array![0.0, 5.0, 10.0], 5.0);
/// assert_eq!(dw, array![0.0, 0.0, 100.0]);
/// ```
pub fn bcm_update_array<S, D>(pre: f64, post: &ArrayBase<S, D>, theta: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    post.mapv(|p| bcm_update(pre, p, theta))
}

/// Batch compute BCM weight changes into a caller-provided buffer
///
/// # Arguments
/// * `pre` - Pre-synaptic rate shared by every entry
/// * `post` - Post-synaptic rates
/// * `theta` - Plasticity threshold
/// * `weight_changes` - Output slice, same length as `post`
#[inline]
pub fn bcm_update_slice(pre: f64, post: &[f64], theta: f64, weight_changes: &mut [f64]) {
    debug_assert_eq!(weight_changes.len(), post.len());

    for (out, &p) in weight_changes.iter_mut().zip(post) {
        *out = bcm_update(pre, p, theta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    #[test]
    fn test_zero_at_threshold() {
        assert_eq!(bcm_update(3.0, 7.0, 7.0), 0.0);
        assert_eq!(bcm_update(0.5, 12.0, 12.0), 0.0);
    }

    #[test]
    fn test_depression_below_threshold() {
        let dw = bcm_update(1.0, 4.0, 7.0);
        assert_eq!(dw, -12.0);
    }

    #[test]
    fn test_potentiation_above_threshold() {
        let dw = bcm_update(0.5, 10.0, 6.0);
        assert_eq!(dw, 20.0);
    }

    #[test]
    fn test_silent_synapse_does_not_change() {
        assert_eq!(bcm_update(0.0, 10.0, 7.0), 0.0);
        assert_eq!(bcm_update(1.0, 0.0, 7.0), 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(bcm_update(f64::NAN, 1.0, 1.0).is_nan());
        assert!(bcm_update(1.0, 1.0, f64::NAN).is_nan());
        assert!(bcm_update_array(1.0, &array![f64::NAN, 2.0], 1.0)[0].is_nan());
    }

    #[test]
    fn test_array_keeps_shape() {
        let post = Array2::from_shape_vec((2, 3), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let dw = bcm_update_array(1.5, &post, 2.0);

        assert_eq!(dw.shape(), post.shape());
        for (d, p) in dw.iter().zip(post.iter()) {
            assert_eq!(*d, bcm_update(1.5, *p, 2.0));
        }
    }

    #[test]
    fn test_array_accepts_views() {
        let post = array![1.0, 2.0, 3.0, 4.0];
        let dw = bcm_update_array(1.0, &post.slice(ndarray::s![1..3]), 2.0);
        assert_eq!(dw, array![0.0, 3.0]);
    }

    #[test]
    fn test_slice_matches_scalar() {
        let post = [0.0, 2.5, 7.0, 9.0];
        let mut out = [0.0; 4];
        bcm_update_slice(2.0, &post, 7.0, &mut out);

        for (o, p) in out.iter().zip(post.iter()) {
            assert_eq!(*o, bcm_update(2.0, *p, 7.0));
        }
    }

    proptest! {
        #[test]
        fn prop_sign_follows_threshold(
            pre in 0.01f64..100.0,
            post in 0.01f64..100.0,
            theta in 0.01f64..100.0,
        ) {
            let dw = bcm_update(pre, post, theta);
            if post > theta {
                prop_assert!(dw > 0.0);
            } else if post < theta {
                prop_assert!(dw < 0.0);
            } else {
                prop_assert_eq!(dw, 0.0);
            }
        }

        #[test]
        fn prop_linear_in_pre(
            pre in -50.0f64..50.0,
            post in -50.0f64..50.0,
            theta in 0.0f64..50.0,
            scale in -4.0f64..4.0,
        ) {
            let scaled = bcm_update(pre * scale, post, theta);
            let expected = scale * bcm_update(pre, post, theta);
            prop_assert!((scaled - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
        }

        #[test]
        fn prop_array_matches_scalar(
            pre in -10.0f64..10.0,
            post in proptest::collection::vec(-20.0f64..20.0, 0..32),
            theta in 0.0f64..20.0,
        ) {
            let arr = ndarray::Array1::from(post.clone());
            let dw = bcm_update_array(pre, &arr, theta);
            prop_assert_eq!(dw.len(), post.len());
            for (d, p) in dw.iter().zip(post.iter()) {
                prop_assert_eq!(*d, bcm_update(pre, *p, theta));
            }
        }
    }
}
