//INFO: Gateway error responses
//NOTE: Callers only learn whether a fetch worked; details stay in the server log

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Access token required")]
    MissingAccessToken,

    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl GatewayError {
    pub fn upstream(message: &'static str, source: anyhow::Error) -> Self {
        Self::Upstream { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingAccessToken => StatusCode::UNAUTHORIZED,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

//INFO: `{ "error": "..." }` body shared by every failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
