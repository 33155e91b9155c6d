//! HTTP surface of the service.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Response bodies and the upload form schema
//!
//! # Routes
//!
//! - `GET /` and `GET /api/health`: service information and liveness
//! - `POST /api/pdf-to-word`, `/api/word-to-pdf`, `/api/compress-pdf`, `/api/image-to-pdf`,
//!   `/api/pdf-to-jpg`, `/api/ocr-text`: file conversions
//!
//! Every conversion route takes a `multipart/form-data` body with the file in the `file`
//! field and answers with the converted file base64-encoded in JSON. Documentation is served
//! at `/api/docs`.

pub mod handlers;
pub mod models;
