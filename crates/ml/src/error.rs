// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for model loading and inference.

use thiserror::Error;

/// Errors raised while loading an artifact or running inference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MlError {
    /// The artifact file could not be read.
    #[error("Model '{model}' is unavailable: {reason}")]
    ArtifactUnavailable {
        /// The model the artifact belongs to.
        model: String,
        /// Why the artifact could not be read.
        reason: String,
    },
    /// The artifact file was read but its contents are inconsistent.
    #[error("Model '{model}' artifact is malformed: {reason}")]
    MalformedArtifact {
        /// The model the artifact belongs to.
        model: String,
        /// What is wrong with the artifact.
        reason: String,
    },
    /// The request payload lacks a feature the model requires.
    #[error("Missing feature '{name}' in the request payload")]
    MissingFeature {
        /// The feature the model expects.
        name: String,
    },
    /// The requested forecast horizon is out of range.
    #[error("Forecast horizon must be at least 1, got {horizon}")]
    InvalidHorizon {
        /// The rejected horizon.
        horizon: i64,
    },
}
