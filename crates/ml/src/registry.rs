// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lazily loaded, process-wide model registry.
//!
//! Each artifact is read and validated on first use, then cached for the
//! lifetime of the process. Load failures are returned to the caller and
//! never cached, so a fixed artifact file is picked up on the next request
//! without a restart.

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::artifacts::{ClassifierArtifact, ClusteringArtifact, ForecastArtifact};
use crate::error::MlError;

/// Holds the exported model artifacts behind per-model lazy cells.
#[derive(Debug)]
pub struct ModelRegistry {
    models_dir: PathBuf,
    classifier: OnceLock<ClassifierArtifact>,
    clustering: OnceLock<ClusteringArtifact>,
    forecast: OnceLock<ForecastArtifact>,
}

impl ModelRegistry {
    /// The classifier artifact file name inside the models directory.
    pub const CLASSIFIER_FILE: &'static str = "classification.json";
    /// The clustering artifact file name inside the models directory.
    pub const CLUSTERING_FILE: &'static str = "clustering.json";
    /// The forecast artifact file name inside the models directory.
    pub const FORECAST_FILE: &'static str = "forecast.json";

    /// Creates a registry over a models directory.
    #[must_use]
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            classifier: OnceLock::new(),
            clustering: OnceLock::new(),
            forecast: OnceLock::new(),
        }
    }

    /// Returns the classifier, loading and validating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or is inconsistent.
    pub fn classifier(&self) -> Result<&ClassifierArtifact, MlError> {
        if let Some(artifact) = self.classifier.get() {
            return Ok(artifact);
        }
        let artifact: ClassifierArtifact = self.load("classification", Self::CLASSIFIER_FILE)?;
        artifact.validate("classification")?;
        info!(file = Self::CLASSIFIER_FILE, "Loaded classification artifact");
        Ok(self.classifier.get_or_init(|| artifact))
    }

    /// Returns the clustering pipeline, loading and validating it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or is inconsistent.
    pub fn clustering(&self) -> Result<&ClusteringArtifact, MlError> {
        if let Some(artifact) = self.clustering.get() {
            return Ok(artifact);
        }
        let artifact: ClusteringArtifact = self.load("clustering", Self::CLUSTERING_FILE)?;
        artifact.validate("clustering")?;
        info!(file = Self::CLUSTERING_FILE, "Loaded clustering artifact");
        Ok(self.clustering.get_or_init(|| artifact))
    }

    /// Returns the forecaster, loading and validating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or is inconsistent.
    pub fn forecast(&self) -> Result<&ForecastArtifact, MlError> {
        if let Some(artifact) = self.forecast.get() {
            return Ok(artifact);
        }
        let artifact: ForecastArtifact = self.load("forecast", Self::FORECAST_FILE)?;
        artifact.validate("forecast")?;
        info!(file = Self::FORECAST_FILE, "Loaded forecast artifact");
        Ok(self.forecast.get_or_init(|| artifact))
    }

    fn load<T: DeserializeOwned>(&self, model: &str, file: &str) -> Result<T, MlError> {
        let path: PathBuf = self.models_dir.join(file);
        let raw: String =
            std::fs::read_to_string(&path).map_err(|e| MlError::ArtifactUnavailable {
                model: model.to_string(),
                reason: format!("{}: {e}", path.display()),
            })?;
        serde_json::from_str(&raw).map_err(|e| MlError::MalformedArtifact {
            model: model.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;
    use std::path::PathBuf;

    use serde_json::json;

    use super::ModelRegistry;
    use crate::error::MlError;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir: PathBuf =
            std::env::temp_dir().join(format!("tracer-ml-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn a_missing_artifact_is_reported_not_cached() {
        let registry: ModelRegistry = ModelRegistry::new(scratch_dir("missing"));

        let err: MlError = registry.forecast().unwrap_err();
        assert!(matches!(err, MlError::ArtifactUnavailable { .. }));
    }

    #[test]
    fn a_classifier_artifact_loads_once_and_predicts() {
        let dir: PathBuf = scratch_dir("classifier");
        let artifact = json!({
            "features": ["salary_wait"],
            "labels": ["Low salary", "High salary"],
            "weights": [[-1.0], [1.0]],
            "intercepts": [0.0, 0.0],
        });
        std::fs::write(
            dir.join(ModelRegistry::CLASSIFIER_FILE),
            serde_json::to_string(&artifact).unwrap(),
        )
        .unwrap();

        let registry: ModelRegistry = ModelRegistry::new(dir);
        let payload: HashMap<String, f64> = HashMap::from([(String::from("salary_wait"), 2.0)]);

        let outcome = registry.classifier().unwrap().predict(&payload).unwrap();
        assert_eq!(outcome.label, "High salary");

        // The second access must hit the cache and agree with the first.
        let again = registry.classifier().unwrap().predict(&payload).unwrap();
        assert_eq!(outcome, again);
    }

    #[test]
    fn an_inconsistent_artifact_is_rejected_at_load() {
        let dir: PathBuf = scratch_dir("inconsistent");
        let artifact = json!({
            "features": ["salary_wait"],
            "labels": ["Low salary", "High salary"],
            "weights": [[-1.0]],
            "intercepts": [0.0, 0.0],
        });
        std::fs::write(
            dir.join(ModelRegistry::CLASSIFIER_FILE),
            serde_json::to_string(&artifact).unwrap(),
        )
        .unwrap();

        let registry: ModelRegistry = ModelRegistry::new(dir);
        let err: MlError = registry.classifier().unwrap_err();
        assert!(matches!(err, MlError::MalformedArtifact { .. }));
    }
}
