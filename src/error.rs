//! Error types for the OTU loader

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::html::failure_page;

/// Why a submission could not be relayed.
///
/// Every variant ends up as a warning banner on the rendered page. A plain
/// page view is not an error and is represented by `RelayResult::no_action`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("unspecified action")]
    UnspecifiedAction,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Remote repository unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Could not reach the database: {0}")]
    TransportError(String),

    #[error("The database rejected the upload: {0}")]
    Rejected(String),

    #[error("{0}")]
    NotImplemented(String),
}

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors that abort rendering of a page
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] RelayError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            failure_page(&message),
        )
            .into_response()
    }
}
