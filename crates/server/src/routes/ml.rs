// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Analytics inference routes backed by the exported model artifacts.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State as AxumState;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracer_ml::{Classification, ClusterAssignment, Forecast};

use crate::error::HttpError;
use crate::state::{AppState, authenticate};

/// Request for a classification or clustering prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesRequest {
    /// The named feature values; every feature the model declares must be
    /// present.
    pub features: HashMap<String, f64>,
}

/// Request for a graduate-count forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// How many periods ahead to forecast; must be at least 1.
    pub horizon: i64,
}

/// Handler for POST `/api/ml/classification`.
pub async fn handle_classification(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<FeaturesRequest>,
) -> Result<Json<Classification>, HttpError> {
    authenticate(&app_state, &headers).await?;
    info!("Handling classification request");

    let outcome: Classification = app_state.models.classifier()?.predict(&req.features)?;

    Ok(Json(outcome))
}

/// Handler for POST `/api/ml/clustering`.
pub async fn handle_clustering(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<FeaturesRequest>,
) -> Result<Json<ClusterAssignment>, HttpError> {
    authenticate(&app_state, &headers).await?;
    info!("Handling clustering request");

    let assignment: ClusterAssignment = app_state.models.clustering()?.predict(&req.features)?;

    Ok(Json(assignment))
}

/// Handler for POST `/api/ml/forecast`.
pub async fn handle_forecast(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<ForecastRequest>,
) -> Result<Json<Forecast>, HttpError> {
    authenticate(&app_state, &headers).await?;
    info!(horizon = req.horizon, "Handling forecast request");

    let forecast: Forecast = app_state.models.forecast()?.forecast(req.horizon)?;

    Ok(Json(forecast))
}
