//! # error
//!
//! Error types for the quote pipeline.
//!
//! * [`ValidationError`] — a raw tick was rejected by the parser.
//! * [`IngestError`]     — anything that stops one tick from being ingested.
//! * [`AppError`]        — what HTTP handlers return.  Axum's `IntoResponse`
//!   impl turns it into a structured JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ─── Validation ───────────────────────────────────────────────────────────────

/// Why a raw tick line could not be parsed.
///
/// Deliberately coarse: a field that fails to parse is reported the same way
/// regardless of which field it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong field count, or a numeric / timestamp field with a bad format.
    #[error("malformed tick")]
    MalformedInput,

    /// A field is blank after trimming.
    #[error("tick has a missing field")]
    MissingField,
}

// ─── Ingestion ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The quote store failed; passed through untouched.
    #[error("quote store error: {0}")]
    Store(#[source] anyhow::Error),
}

// ─── HTTP ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    /// The request payload was syntactically correct but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(e) => AppError::BadRequest(e.to_string()),
            IngestError::Store(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {err}"),
            ),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
