//! Receiving and validating uploaded files.
//!
//! Uploads arrive as the multipart field `file`. They are buffered in memory for the
//! duration of one request, never touch disk, and are checked against the size cap while
//! they stream in so an oversized upload is rejected before it is fully read.

use axum::extract::{Multipart, multipart::MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};

use crate::errors::{Error, Result};
use crate::formatting::format_file_size;
use crate::types::{FileKind, mime_essence};

/// Multipart field the frontend attaches the file to
pub const FILE_FIELD: &str = "file";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const FALLBACK_FILENAME: &str = "upload";

/// A file received from the client
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reject the upload unless its content type or extension fits `kind`
    pub fn ensure_kind(&self, kind: FileKind) -> Result<()> {
        if kind.accepts(&self.content_type, &self.filename) {
            Ok(())
        } else {
            tracing::debug!(
                filename = %self.filename,
                content_type = %self.content_type,
                expected = ?kind,
                "Rejecting upload with unsupported type"
            );
            Err(Error::BadRequest {
                message: kind.rejection_message().to_string(),
            })
        }
    }

    /// Read the `file` field out of a multipart body, enforcing `max_file_size`
    pub async fn from_multipart(multipart: &mut Multipart, max_file_size: u64) -> Result<Self> {
        while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, max_file_size))? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let filename = field.file_name().map(str::to_string).filter(|name| !name.is_empty());
            let declared_type = field.content_type().map(str::to_string);

            let mut buffer = BytesMut::new();
            let mut chunk_stream = field;
            while let Some(chunk) = chunk_stream.chunk().await.map_err(|e| multipart_error(e, max_file_size))? {
                if (buffer.len() + chunk.len()) as u64 > max_file_size {
                    tracing::warn!(
                        filename = ?filename,
                        received = buffer.len() + chunk.len(),
                        max_file_size = max_file_size,
                        "File size limit exceeded, aborting upload"
                    );
                    return Err(too_large(max_file_size));
                }
                buffer.extend_from_slice(&chunk);
            }

            // An empty file input still posts a `file` part, with no name and no bytes
            if filename.is_none() && buffer.is_empty() {
                return Err(no_file());
            }

            let filename = filename.unwrap_or_else(|| FALLBACK_FILENAME.to_string());
            let content_type = resolve_content_type(declared_type.as_deref(), &filename);

            tracing::info!(
                filename = %filename,
                content_type = %content_type,
                size = buffer.len(),
                "Received upload"
            );

            return Ok(Upload::new(filename, content_type, buffer.freeze()));
        }

        Err(no_file())
    }
}

pub fn no_file() -> Error {
    Error::BadRequest {
        message: "No file uploaded".to_string(),
    }
}

fn too_large(max_file_size: u64) -> Error {
    Error::PayloadTooLarge {
        message: format!("File too large. Maximum size is {}.", format_file_size(max_file_size)),
    }
}

fn multipart_error(err: MultipartError, max_file_size: u64) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_file_size)
    } else {
        Error::BadRequest {
            message: format!("Failed to parse multipart data: {}", err.body_text()),
        }
    }
}

/// Use the declared content type unless it is missing or generic, then guess from the name
fn resolve_content_type(declared: Option<&str>, filename: &str) -> String {
    match declared.map(mime_essence) {
        Some(essence) if !essence.is_empty() && essence != FALLBACK_CONTENT_TYPE => essence,
        _ => mime_guess::from_path(filename)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
    }
}
