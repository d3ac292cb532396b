// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the plasticity simulator

use thiserror::Error;

/// Errors raised before a simulation starts
///
/// A run that diverges numerically is not an error; it produces a
/// trajectory with non-finite values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlasticityError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unknown presentation schedule '{0}' (expected batch, cycled or sampled)")]
    UnknownPresentation(String),
}

impl PlasticityError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        PlasticityError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type PlasticityResult<T> = Result<T, PlasticityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlasticityError::invalid("duration", "must be at least one step");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'duration': must be at least one step"
        );

        let err = PlasticityError::UnknownPresentation("random".to_string());
        assert!(err.to_string().contains("'random'"));
    }
}
