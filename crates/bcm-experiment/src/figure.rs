// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Figure panel data
//!
//! Four panels, one table each:
//! - `h`: the plasticity rule, Δw against the post-synaptic rate per threshold
//! - `i`: learned weights by input preferred direction per example threshold
//! - `j`: learned tuning curves by stimulus direction per example threshold
//! - `k`: OSI against threshold over the sweep range

use bcm_config::{constants, BcmConfig};
use bcm_plasticity::{bcm_update_array, simulate, SimulationParams};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExperimentError, ExperimentResult};
use crate::sweep::{arange, run_sweep, summarize, SweepPoint, SweepSettings};

/// Named column of a panel table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Table of equally long named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelTable {
    pub columns: Vec<Column>,
}

impl PanelTable {
    /// Append a column; every column must have the same number of rows
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> ExperimentResult<()> {
        let name = name.into();
        if let Some(first) = self.columns.first() {
            if first.values.len() != values.len() {
                return Err(ExperimentError::ColumnLength {
                    column: name,
                    expected: first.values.len(),
                    actual: values.len(),
                });
            }
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }
}

/// Final state of one example run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleRun {
    pub summary: SweepPoint,
    /// Preferred direction of every input
    pub input_directions: Vec<f64>,
    pub final_weights: Vec<f64>,
    pub stimuli: Vec<f64>,
    pub final_rates: Vec<f64>,
}

/// All panels plus the run summaries behind them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureData {
    pub h: PanelTable,
    pub i: PanelTable,
    pub j: PanelTable,
    pub k: PanelTable,
    pub examples: Vec<SweepPoint>,
    pub sweep: Vec<SweepPoint>,
}

fn threshold_label(prefix: &str, threshold: f64) -> String {
    format!("{} {:.2}", prefix, threshold)
}

/// Panel h: Δw for a fixed pre-synaptic rate over `post ∈ [0, max_post)`
pub fn rule_curve(
    pre: f64,
    thresholds: &[f64],
    max_post: f64,
    step: f64,
) -> ExperimentResult<PanelTable> {
    let post = Array1::from(arange(0.0, max_post, step)?);

    let mut table = PanelTable::default();
    table.push_column("post", post.to_vec())?;
    for &theta in thresholds {
        let delta_w = bcm_update_array(pre, &post, theta);
        table.push_column(threshold_label("delta_w", theta), delta_w.to_vec())?;
    }
    Ok(table)
}

/// Full-length runs for the example thresholds
pub fn example_runs(
    params: &SimulationParams,
    thresholds: &[f64],
    settings: &SweepSettings,
) -> ExperimentResult<Vec<ExampleRun>> {
    thresholds
        .iter()
        .map(|&threshold| {
            let trajectory = simulate(&params.with_threshold(threshold))?;
            let summary = summarize(threshold, &trajectory, settings)?;
            info!(
                threshold,
                osi = summary.osi,
                converged = summary.converged,
                "Example run finished"
            );
            Ok(ExampleRun {
                summary,
                input_directions: trajectory.preferred_directions().to_vec(),
                final_weights: trajectory.final_weights().to_vec(),
                stimuli: trajectory.stimuli().to_vec(),
                final_rates: trajectory.final_rates().to_vec(),
            })
        })
        .collect()
}

/// Panel i: final weights against input preferred direction
pub fn weight_panel(examples: &[ExampleRun]) -> ExperimentResult<PanelTable> {
    let mut table = PanelTable::default();
    if let Some(first) = examples.first() {
        table.push_column("stimulus", first.input_directions.clone())?;
    }
    for example in examples {
        table.push_column(
            threshold_label("weights", example.summary.threshold),
            example.final_weights.clone(),
        )?;
    }
    Ok(table)
}

/// Panel j: final rates against stimulus direction
pub fn rate_panel(examples: &[ExampleRun]) -> ExperimentResult<PanelTable> {
    let mut table = PanelTable::default();
    if let Some(first) = examples.first() {
        table.push_column("stimulus", first.stimuli.clone())?;
    }
    for example in examples {
        table.push_column(
            threshold_label("rates", example.summary.threshold),
            example.final_rates.clone(),
        )?;
    }
    Ok(table)
}

/// Panel k: OSI against threshold
pub fn sweep_panel(points: &[SweepPoint]) -> ExperimentResult<PanelTable> {
    let mut table = PanelTable::default();
    table.push_column("threshold", points.iter().map(|p| p.threshold).collect())?;
    table.push_column("osi", points.iter().map(|p| p.osi).collect())?;
    Ok(table)
}

/// Compute every panel from a configuration
pub fn build_figure(config: &BcmConfig) -> ExperimentResult<FigureData> {
    let params = SimulationParams::from_config(config)?;
    let settings = SweepSettings::from(&config.sweep);
    let example_thresholds = &config.sweep.example_thresholds;

    let h = rule_curve(
        1.0,
        example_thresholds,
        constants::RULE_CURVE_MAX_POST,
        constants::RULE_CURVE_STEP,
    )?;

    let examples = example_runs(&params, example_thresholds, &settings)?;
    let i = weight_panel(&examples)?;
    let j = rate_panel(&examples)?;

    let sweep = run_sweep(&settings, &params)?;
    let k = sweep_panel(&sweep)?;

    Ok(FigureData {
        h,
        i,
        j,
        k,
        examples: examples.iter().map(|e| e.summary).collect(),
        sweep,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcm_plasticity::PopulationParams;

    #[test]
    fn test_push_column_rejects_length_mismatch() {
        let mut table = PanelTable::default();
        table.push_column("a", vec![1.0, 2.0]).unwrap();
        let err = table.push_column("b", vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::ColumnLength {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_rule_curve_panel() {
        let table = rule_curve(1.0, &[7.0, 12.0], 20.0, 0.1).unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.n_rows(), 200);

        let post = table.column("post").unwrap();
        let control = table.column("delta_w 7.00").unwrap();
        let increased = table.column("delta_w 12.00").unwrap();

        // Sign changes at the threshold
        for ((p, c), h) in post.iter().zip(control).zip(increased) {
            if *p > 0.0 && *p < 6.95 {
                assert!(*c < 0.0);
            }
            if *p > 7.05 {
                assert!(*c > 0.0);
            }
            if *p > 0.0 && *p < 11.95 {
                assert!(*h < 0.0);
            }
        }
    }

    #[test]
    fn test_example_panels() {
        let params = SimulationParams {
            duration: 100,
            population: PopulationParams {
                n_pre: 10,
                ..Default::default()
            },
            ..Default::default()
        };
        let examples = example_runs(&params, &[7.0, 12.0], &SweepSettings::default()).unwrap();
        assert_eq!(examples.len(), 2);

        let weights = weight_panel(&examples).unwrap();
        assert_eq!(weights.n_rows(), 10);
        assert!(weights.column("weights 7.00").is_some());
        assert!(weights.column("weights 12.00").is_some());

        let rates = rate_panel(&examples).unwrap();
        assert_eq!(rates.n_rows(), 20);
        assert_eq!(rates.column("stimulus").unwrap(), examples[0].stimuli.as_slice());
    }

    #[test]
    fn test_sweep_panel() {
        let points = [
            SweepPoint {
                threshold: 5.0,
                osi: 0.4,
                tail_change: 0.0,
                converged: true,
            },
            SweepPoint {
                threshold: 5.25,
                osi: 0.41,
                tail_change: 0.0,
                converged: true,
            },
        ];
        let table = sweep_panel(&points).unwrap();
        assert_eq!(table.column("threshold").unwrap(), &[5.0, 5.25]);
        assert_eq!(table.column("osi").unwrap(), &[0.4, 0.41]);
    }
}
