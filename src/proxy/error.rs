use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Failures of the proxy endpoints, each rendered as the JSON body callers expect.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("a valid videoUrl is required")]
    InvalidVideoUrl,
    #[error("{0} parameter is missing")]
    MissingParameter(&'static str),
    #[error("Request failed: {} - {body}", .status.as_u16())]
    Upstream { status: StatusCode, body: String },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ProxyError::InvalidVideoUrl => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ProxyError::MissingParameter(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            ProxyError::Upstream { status, .. } => {
                (status, Json(json!({ "status": 500, "error": message }))).into_response()
            }
            ProxyError::Request(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
        }
    }
}
