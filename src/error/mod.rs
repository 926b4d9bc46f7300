//! Centralized API error handling for the Terragrids auth service
//!
//! This module provides a unified error type for API responses with proper
//! HTTP status code mapping and flat JSON error bodies of the form
//! `{"error": "<ErrorName>", "message": "<text>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::{AuthError, ChallengeError};

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("The authenticated user is not authorized to perform this action")]
    UserUnauthorized,

    #[error("{0} must be specified")]
    MissingParameter(String),

    #[error("{0} is not valid")]
    ParameterNotValid(String),

    #[error("{message}")]
    Repository {
        message: String,
        info: Option<String>,
    },
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ApiError {
    /// Get the error name reported to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::TokenInvalid => "TokenInvalidError",
            ApiError::TokenExpired => "TokenExpiredError",
            ApiError::UserUnauthorized => "UserUnauthorizedError",
            ApiError::MissingParameter(_) => "MissingParameterError",
            ApiError::ParameterNotValid(_) => "ParameterNotValidError",
            ApiError::Repository { .. } => "RepositoryError",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TokenInvalid | ApiError::TokenExpired => StatusCode::UNAUTHORIZED,
            ApiError::UserUnauthorized => StatusCode::FORBIDDEN,
            ApiError::MissingParameter(_) | ApiError::ParameterNotValid(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Drop diagnostic detail from the body when running in production
    pub fn redacted(self, production: bool) -> Self {
        match self {
            ApiError::Repository { message, .. } if production => {
                ApiError::Repository { message, info: None }
            }
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Log server errors
        match &self {
            ApiError::Repository { info, .. } => {
                tracing::error!(error = %message, info = ?info, code = %error_code, "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %message, code = %error_code, "Client error occurred");
            }
        }

        let info = match self {
            ApiError::Repository { info, .. } => info,
            _ => None,
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
            info,
        };

        (status, Json(body)).into_response()
    }
}

// Convenience conversions from common error types

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenInvalid => ApiError::TokenInvalid,
            AuthError::TokenExpired => ApiError::TokenExpired,
        }
    }
}

impl From<ChallengeError> for ApiError {
    fn from(err: ChallengeError) -> Self {
        match err {
            ChallengeError::InvalidWalletAddress(_) => {
                ApiError::ParameterNotValid("wallet".to_string())
            }
            ChallengeError::Storage(e) => ApiError::Repository {
                message: "Unable to put auth".to_string(),
                info: Some(e.to_string()),
            },
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "request".to_string());
        ApiError::ParameterNotValid(field)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ApiError::ParameterNotValid("request body".to_string())
    }
}
