// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Exported model artifacts and their inference routines.
//!
//! Artifacts are JSON files exported by the offline training pipeline. Each
//! artifact carries everything inference needs: the feature order, the
//! fitted parameters, and the human-readable labels for the numeric
//! outputs. The math here is deliberately plain: linear scores, a
//! standardize-project-nearest-centroid pipeline, and a recursive
//! autoregression.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MlError;

/// A linear classifier over a fixed feature order.
///
/// Prediction is the argmax of the per-class linear scores.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
    /// The feature names, in the order the weight vectors expect.
    pub features: Vec<String>,
    /// The human-readable class labels, indexed by class.
    pub labels: Vec<String>,
    /// One weight vector per class, each as long as `features`.
    pub weights: Vec<Vec<f64>>,
    /// One intercept per class.
    pub intercepts: Vec<f64>,
}

/// A class label with its linear score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    /// The class label.
    pub label: String,
    /// The linear score for this class.
    pub score: f64,
}

/// The outcome of a classification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// The index of the winning class.
    pub class_index: usize,
    /// The label of the winning class.
    pub label: String,
    /// Every class with its score, in class order.
    pub scores: Vec<LabelScore>,
}

impl ClassifierArtifact {
    /// Checks the internal consistency of a freshly loaded artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight matrix does not line up with the
    /// declared features, labels, and intercepts.
    pub fn validate(&self, model: &str) -> Result<(), MlError> {
        if self.features.is_empty() {
            return Err(malformed(model, "no features declared"));
        }
        if self.labels.is_empty() {
            return Err(malformed(model, "no class labels declared"));
        }
        if self.weights.len() != self.labels.len() || self.intercepts.len() != self.labels.len() {
            return Err(malformed(
                model,
                "weights, intercepts, and labels must have the same length",
            ));
        }
        if self
            .weights
            .iter()
            .any(|row| row.len() != self.features.len())
        {
            return Err(malformed(
                model,
                "every weight vector must be as long as the feature list",
            ));
        }
        Ok(())
    }

    /// Scores the payload against every class and returns the argmax.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload lacks one of the model's features.
    pub fn predict(&self, payload: &HashMap<String, f64>) -> Result<Classification, MlError> {
        let x: Vec<f64> = feature_vector(&self.features, payload)?;

        let scores: Vec<LabelScore> = self
            .labels
            .iter()
            .zip(self.weights.iter().zip(&self.intercepts))
            .map(|(label, (weights, intercept))| LabelScore {
                label: label.clone(),
                score: dot(weights, &x) + intercept,
            })
            .collect();

        let class_index: usize = argmax(scores.iter().map(|entry| entry.score));

        Ok(Classification {
            class_index,
            label: self.labels[class_index].clone(),
            scores,
        })
    }
}

/// Per-feature standardization parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    /// The per-feature means.
    pub means: Vec<f64>,
    /// The per-feature standard deviations, all nonzero.
    pub stds: Vec<f64>,
}

/// A clustering pipeline: standardize, project, nearest centroid.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringArtifact {
    /// The feature names, in the order the scaler and components expect.
    pub features: Vec<String>,
    /// The standardization parameters.
    pub scaler: Scaler,
    /// The principal components, one row per projected dimension.
    pub components: Vec<Vec<f64>>,
    /// The cluster centroids in projected space.
    pub centroids: Vec<Vec<f64>>,
    /// The human-readable cluster labels, indexed by cluster.
    pub cluster_labels: Vec<String>,
}

/// The outcome of a clustering request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    /// The index of the nearest centroid.
    pub cluster: usize,
    /// The label of the assigned cluster.
    pub label: String,
    /// The payload's coordinates in projected space.
    pub coordinates: Vec<f64>,
}

impl ClusteringArtifact {
    /// Checks the internal consistency of a freshly loaded artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler, components, centroids, and labels
    /// do not line up, or a standard deviation is zero.
    pub fn validate(&self, model: &str) -> Result<(), MlError> {
        let width: usize = self.features.len();
        if width == 0 {
            return Err(malformed(model, "no features declared"));
        }
        if self.scaler.means.len() != width || self.scaler.stds.len() != width {
            return Err(malformed(
                model,
                "scaler means and stds must be as long as the feature list",
            ));
        }
        if self.scaler.stds.iter().any(|std| *std == 0.0) {
            return Err(malformed(model, "scaler stds must be nonzero"));
        }
        if self.components.is_empty()
            || self.components.iter().any(|row| row.len() != width)
        {
            return Err(malformed(
                model,
                "every component must be as long as the feature list",
            ));
        }
        let projected: usize = self.components.len();
        if self.centroids.is_empty()
            || self.centroids.iter().any(|row| row.len() != projected)
        {
            return Err(malformed(
                model,
                "every centroid must live in the projected space",
            ));
        }
        if self.cluster_labels.len() != self.centroids.len() {
            return Err(malformed(
                model,
                "cluster labels and centroids must have the same length",
            ));
        }
        Ok(())
    }

    /// Assigns the payload to the nearest centroid in projected space.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload lacks one of the model's features.
    pub fn predict(&self, payload: &HashMap<String, f64>) -> Result<ClusterAssignment, MlError> {
        let x: Vec<f64> = feature_vector(&self.features, payload)?;

        let standardized: Vec<f64> = x
            .iter()
            .zip(self.scaler.means.iter().zip(&self.scaler.stds))
            .map(|(value, (mean, std))| (value - mean) / std)
            .collect();

        let coordinates: Vec<f64> = self
            .components
            .iter()
            .map(|component| dot(component, &standardized))
            .collect();

        let cluster: usize = argmax(
            self.centroids
                .iter()
                .map(|centroid| -squared_distance(centroid, &coordinates)),
        );

        Ok(ClusterAssignment {
            cluster,
            label: self.cluster_labels[cluster].clone(),
            coordinates,
        })
    }
}

/// An autoregressive forecaster over a trailing history window.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastArtifact {
    /// The lag coefficients; index 0 weighs the most recent observation.
    pub coefficients: Vec<f64>,
    /// The model intercept.
    pub intercept: f64,
    /// The trailing observations, oldest first.
    pub history: Vec<f64>,
    /// The period of the last observation, e.g. a graduation year.
    pub last_period: i64,
}

/// The outcome of a forecast request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// The forecast periods, continuing from the training data.
    pub periods: Vec<i64>,
    /// The forecast values, one per period.
    pub values: Vec<f64>,
}

impl ForecastArtifact {
    /// Checks the internal consistency of a freshly loaded artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the history is shorter than the lag order.
    pub fn validate(&self, model: &str) -> Result<(), MlError> {
        if self.coefficients.is_empty() {
            return Err(malformed(model, "no lag coefficients declared"));
        }
        if self.history.len() < self.coefficients.len() {
            return Err(malformed(
                model,
                "history must cover at least one full lag window",
            ));
        }
        Ok(())
    }

    /// Forecasts `horizon` periods ahead by recursive autoregression.
    ///
    /// Each step feeds the previous prediction back into the lag window.
    ///
    /// # Errors
    ///
    /// Returns an error if the horizon is less than 1.
    pub fn forecast(&self, horizon: i64) -> Result<Forecast, MlError> {
        if horizon < 1 {
            return Err(MlError::InvalidHorizon { horizon });
        }

        let steps: usize = usize::try_from(horizon)
            .map_err(|_| MlError::InvalidHorizon { horizon })?;

        let mut window: Vec<f64> = self.history.clone();
        let mut values: Vec<f64> = Vec::with_capacity(steps);
        let mut periods: Vec<i64> = Vec::with_capacity(steps);

        for step in 0..steps {
            let next: f64 = self.intercept
                + self
                    .coefficients
                    .iter()
                    .enumerate()
                    .map(|(lag, coefficient)| coefficient * window[window.len() - 1 - lag])
                    .sum::<f64>();
            window.push(next);
            values.push(next);
            periods.push(self.last_period + 1 + i64::try_from(step).unwrap_or(i64::MAX));
        }

        Ok(Forecast { periods, values })
    }
}

/// Builds the feature vector in the artifact's declared order.
fn feature_vector(
    features: &[String],
    payload: &HashMap<String, f64>,
) -> Result<Vec<f64>, MlError> {
    features
        .iter()
        .map(|name| {
            payload
                .get(name)
                .copied()
                .ok_or_else(|| MlError::MissingFeature { name: name.clone() })
        })
        .collect()
}

fn malformed(model: &str, reason: &str) -> MlError {
    MlError::MalformedArtifact {
        model: model.to_string(),
        reason: reason.to_string(),
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the largest value; ties break toward the first.
fn argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best_index: usize = 0;
    let mut best_value: f64 = f64::NEG_INFINITY;
    for (index, value) in values.enumerate() {
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    best_index
}
