// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inference over exported analytics artifacts for the Tracer Study
//! Platform.
//!
//! The offline training pipeline exports three models as JSON artifacts: a
//! linear classifier for salary-band prediction, a clustering pipeline for
//! respondent segmentation, and an autoregressive graduate-count
//! forecaster. This crate loads those artifacts from a models directory on
//! first use and runs the inference math in-process; there is no training
//! and no external runtime.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

pub mod artifacts;
pub mod error;
pub mod registry;

pub use artifacts::{
    Classification, ClassifierArtifact, ClusterAssignment, ClusteringArtifact, Forecast,
    ForecastArtifact, LabelScore, Scaler,
};
pub use error::MlError;
pub use registry::ModelRegistry;
