//! RPC error types and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use evote_ballot::CastError;
use evote_eligibility::EligibilityError;
use evote_store::StoreError;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    /// The request was abandoned before its storage work committed.
    #[error("{0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Cancelled(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::BadRequest(_) => "bad_request",
            Self::Cancelled(_) => "timeout",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<CastError> for RpcError {
    fn from(e: CastError) -> Self {
        match e {
            CastError::NotFound(_) => Self::NotFound(e.to_string()),
            CastError::Closed | CastError::NotStarted | CastError::Ended => {
                Self::Forbidden(e.to_string())
            }
            CastError::Forbidden(reason) => Self::Forbidden(reason),
            CastError::AlreadyVoted => Self::Conflict(e.to_string()),
            CastError::Unauthorized => Self::Unauthorized(e.to_string()),
            CastError::Cancelled => Self::Cancelled(e.to_string()),
            CastError::Internal(detail) => Self::Internal(detail),
        }
    }
}

impl From<EligibilityError> for RpcError {
    fn from(e: EligibilityError) -> Self {
        match e {
            EligibilityError::VoterNotFound(_) => {
                Self::Unauthorized("voter identity is missing or unknown".to_string())
            }
            EligibilityError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for RpcError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => Self::NotFound(format!("{key} not found")),
            StoreError::Aborted(_) => Self::Cancelled("request cancelled".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for RpcError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Forbidden(_) | AuthError::NotAVoter => Self::Forbidden(e.to_string()),
            AuthError::Missing | AuthError::Invalid(_) => Self::Unauthorized(e.to_string()),
        }
    }
}
