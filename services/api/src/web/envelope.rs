//! services/api/src/web/envelope.rs
//!
//! The uniform `{ success, error }` envelope every mutation answers with when it
//! has no entity to return, and the failure type every handler returns.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use slidecraft_core::ports::PortError;
use tracing::{error, warn};
use utoipa::ToSchema;

/// The outcome of a mutation that returns no entity.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            error: None,
        })
    }
}

/// A failed request. Renders as an `ActionResult` with `success: false`.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Converts a port error, logging it under the name of the failed action.
    pub fn from_port(action: &str, e: PortError) -> Self {
        match e {
            PortError::NotFound(message) => {
                warn!("{}: {}", action, message);
                Self {
                    status: StatusCode::NOT_FOUND,
                    message,
                }
            }
            PortError::Invalid(message) => {
                warn!("{}: {}", action, message);
                Self::bad_request(message)
            }
            PortError::Unexpected(detail) => {
                error!("{}: {}", action, detail);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("{} failed", action),
                }
            }
        }
    }
}

impl From<PortError> for ApiFailure {
    fn from(e: PortError) -> Self {
        Self::from_port("Request", e)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ActionResult {
            success: false,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}
