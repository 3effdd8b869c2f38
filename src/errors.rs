//! Request-path error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::utils::constants::{BUDGET_EXCEEDED_MSG, INVALID_NUMBER_ID_MSG};

pub type ServiceResult<T, E = ServiceError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Category key outside of {p, f, e, r}.
    #[error("{}", INVALID_NUMBER_ID_MSG)]
    InvalidCategory(String),
    /// Token exchange with the auth endpoint failed.
    #[error("Auth token request failed: {0}")]
    AuthFailure(String),
    /// Numbers request failed after the allowed retry.
    #[error("{0}")]
    UpstreamFailure(String),
    /// Fetch + merge took longer than the response budget; the window is already updated.
    #[error("{}", BUDGET_EXCEEDED_MSG)]
    BudgetExceeded { elapsed_ms: u128, budget_ms: u64 },
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            ServiceError::AuthFailure(_)
            | ServiceError::UpstreamFailure(_)
            | ServiceError::BudgetExceeded { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label, used as a metrics dimension
    pub fn reason(&self) -> &'static str {
        match self {
            ServiceError::InvalidCategory(_) => "invalid_category",
            ServiceError::AuthFailure(_) => "auth",
            ServiceError::UpstreamFailure(_) => "upstream",
            ServiceError::BudgetExceeded { .. } => "budget",
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::UpstreamFailure(format!("upstream request timed out: {}", err))
        } else {
            ServiceError::UpstreamFailure(format!("upstream request failed: {}", err))
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
