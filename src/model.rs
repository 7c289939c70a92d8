use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{ArrayView1, Axis};
use serde::Serialize;
use tracing::{info, warn};

use crate::data::StudentDataset;

/// `next_percentage = attendance_weight * attendance + cgpa_weight * cgpa + intercept`
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub attendance_weight: f64,
    pub cgpa_weight: f64,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(attendance_weight: f64, cgpa_weight: f64, intercept: f64) -> Self {
        Self {
            attendance_weight,
            cgpa_weight,
            intercept,
        }
    }

    pub fn intercept_only(intercept: f64) -> Self {
        Self::new(0.0, 0.0, intercept)
    }

    pub fn predict(&self, attendance: f64, cgpa_percentage: f64) -> f64 {
        self.attendance_weight * attendance + self.cgpa_weight * cgpa_percentage + self.intercept
    }

    pub fn is_intercept_only(&self) -> bool {
        self.attendance_weight == 0.0 && self.cgpa_weight == 0.0
    }

    fn is_finite(&self) -> bool {
        self.attendance_weight.is_finite() && self.cgpa_weight.is_finite() && self.intercept.is_finite()
    }

    /// Coefficient of determination over `dataset`. Zero when the targets
    /// have no variance.
    pub fn r_squared(&self, dataset: &StudentDataset) -> f64 {
        if dataset.is_empty() {
            return 0.0;
        }
        let mean = mean_target(dataset);
        let (ss_res, ss_tot) = dataset.records().iter().fold((0.0, 0.0), |(res, tot), r| {
            let residual = r.next_percentage - self.predict(r.attendance, r.cgpa_percentage);
            let spread = r.next_percentage - mean;
            (res + residual * residual, tot + spread * spread)
        });
        if ss_tot == 0.0 {
            0.0
        } else {
            1.0 - ss_res / ss_tot
        }
    }
}

// Non-finite targets are skipped so the fallback intercept is always usable.
fn mean_target(dataset: &StudentDataset) -> f64 {
    let finite: Vec<f64> = dataset
        .records()
        .iter()
        .map(|r| r.next_percentage)
        .filter(|v| v.is_finite())
        .collect();
    if finite.is_empty() {
        return 0.0;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}

fn has_spread(column: ArrayView1<'_, f64>) -> bool {
    let mut values = column.iter();
    match values.next() {
        Some(first) => values.any(|v| v != first),
        None => false,
    }
}

/// Fits ordinary least squares on (attendance, cgpa_percentage) against
/// next_percentage. A feature column with no spread keeps a zero weight and
/// is left out of the fit. Datasets the solver cannot handle (too few rows,
/// no varying feature) produce an intercept-only model instead of an error.
pub fn train(dataset: &StudentDataset) -> LinearModel {
    if dataset.len() < 2 {
        warn!(records = dataset.len(), "Too few records to fit, using mean target");
        return LinearModel::intercept_only(mean_target(dataset));
    }

    let features = dataset.features();
    let varying: Vec<usize> = (0..features.ncols())
        .filter(|&col| has_spread(features.column(col)))
        .collect();
    if varying.is_empty() {
        warn!("All features are constant, using mean target");
        return LinearModel::intercept_only(mean_target(dataset));
    }
    if varying.len() < features.ncols() {
        warn!(?varying, "Constant feature column left out of the fit");
    }

    let training = Dataset::new(features.select(Axis(1), &varying), dataset.targets());
    match LinearRegression::new().fit(&training) {
        Ok(fitted) => {
            let mut weights = [0.0; 2];
            for (param, &col) in fitted.params().iter().zip(&varying) {
                weights[col] = *param;
            }
            let model = LinearModel::new(weights[0], weights[1], fitted.intercept());
            if model.is_finite() {
                info!(
                    attendance_weight = model.attendance_weight,
                    cgpa_weight = model.cgpa_weight,
                    intercept = model.intercept,
                    "Fitted linear regression"
                );
                return model;
            }
            warn!("Regression produced non-finite coefficients, using mean target");
        }
        Err(err) => {
            warn!(error = %err, "Regression could not be solved, using mean target");
        }
    }

    LinearModel::intercept_only(mean_target(dataset))
}
