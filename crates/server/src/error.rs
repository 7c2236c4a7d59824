// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP error mapping.
//!
//! Every API-layer error maps onto exactly one status code so clients can
//! branch on the status without parsing messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;
use tracer_api::{ApiError, AuthError};
use tracer_ml::MlError;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
}

impl HttpError {
    /// An error for a missing or malformed bearer token.
    pub fn missing_bearer() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing or malformed Authorization header"),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        let status: StatusCode = match &err {
            AuthError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            AuthError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<MlError> for HttpError {
    fn from(err: MlError) -> Self {
        let status: StatusCode = match &err {
            MlError::MissingFeature { .. } | MlError::InvalidHorizon { .. } => {
                StatusCode::BAD_REQUEST
            }
            MlError::ArtifactUnavailable { .. } | MlError::MalformedArtifact { .. } => {
                error!(error = %err, "Model artifact error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}
