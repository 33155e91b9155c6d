use crate::vendor::VendorError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

/// Which family of tool raised an error; shapes the client-facing error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Conversion,
    Compression,
    Ocr,
}

impl ErrorContext {
    /// Lowercase form used in "Internal conversion error"
    fn noun(self) -> &'static str {
        match self {
            ErrorContext::Conversion => "conversion",
            ErrorContext::Compression => "compression",
            ErrorContext::Ocr => "OCR",
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorContext::Conversion => "Conversion",
            ErrorContext::Compression => "Compression",
            ErrorContext::Ocr => "OCR",
        };
        f.write_str(name)
    }
}

#[derive(ThisError, Debug)]
pub enum Error {
    /// Upload missing or not acceptable for the route
    #[error("{message}")]
    BadRequest { message: String },

    /// Upload exceeded the configured size cap
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// No route matched
    #[error("{message}")]
    NotFound { message: String, hint: Option<String> },

    /// The vendor answered with a non-success status
    #[error("{context} API error: {status}")]
    Upstream { context: ErrorContext, status: u16, details: String },

    /// The vendor could not be reached, timed out, or sent an unreadable body
    #[error("Internal {} error", .context.noun())]
    Internal { context: ErrorContext, details: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Error {
    /// Map a vendor failure into the error for the given tool family
    pub fn from_vendor(context: ErrorContext, err: VendorError) -> Self {
        match err {
            VendorError::Upstream { status, body } => Error::Upstream {
                context,
                status,
                details: if body.is_empty() { "Unknown API error".to_string() } else { body },
            },
            other => Error::Internal {
                context,
                details: other.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            Error::Upstream { details, .. } | Error::Internal { details, .. } => ErrorResponse {
                error: self.to_string(),
                details: Some(details.clone()),
                message: None,
            },
            Error::NotFound { message, hint } => ErrorResponse {
                error: message.clone(),
                details: None,
                message: hint.clone(),
            },
            Error::Other(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                details: None,
                message: None,
            },
            Error::BadRequest { message } | Error::PayloadTooLarge { message } => ErrorResponse {
                error: message.clone(),
                details: None,
                message: None,
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal { details, .. } => {
                tracing::error!(details = %details, "{}", self);
            }
            Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Upstream { status, details, .. } => {
                tracing::warn!(vendor_status = status, details = %details, "{}", self);
            }
            Error::BadRequest { .. } | Error::PayloadTooLarge { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Type alias for handler results
pub type Result<T> = std::result::Result<T, Error>;
