//! Service-level routes: liveness, self-description and the JSON 404 fallbacks.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    AppState,
    api::models::service::{EndpointIndex, HealthResponse, ServiceInfo, ServiceLimits},
    errors::Error,
    formatting::format_file_size,
};

const SERVICE_NAME: &str = "PDFINDI Backend";
const VERSION: &str = env!("CARGO_PKG_VERSION");

const ALLOWED_TYPES: [&str; 11] = ["PDF", "DOC", "DOCX", "RTF", "ODT", "JPEG", "PNG", "GIF", "BMP", "TIFF", "WebP"];

/// Liveness check. Answers without contacting the vendor.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "service",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        environment: state.config.environment.clone(),
        version: VERSION.to_string(),
    })
}

/// Service description with the route list and upload limits
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    summary = "Service information",
    responses(
        (status = 200, description = "Route list and limits", body = ServiceInfo),
    )
)]
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: format!("{SERVICE_NAME} API"),
        version: VERSION.to_string(),
        status: "online".to_string(),
        endpoints: EndpointIndex {
            health: "GET /api/health".to_string(),
            pdf_to_word: "POST /api/pdf-to-word".to_string(),
            word_to_pdf: "POST /api/word-to-pdf".to_string(),
            compress_pdf: "POST /api/compress-pdf".to_string(),
            image_to_pdf: "POST /api/image-to-pdf".to_string(),
            pdf_to_jpg: "POST /api/pdf-to-jpg".to_string(),
            ocr_text: "POST /api/ocr-text".to_string(),
        },
        documentation: "API endpoints accept multipart/form-data with file uploads".to_string(),
        limits: ServiceLimits {
            max_file_size: format_file_size(state.config.uploads.max_file_size),
            timeout: format!("{} seconds", state.config.vendor.timeout.as_secs()),
            allowed_types: ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        },
    })
}

/// Fallback for unknown `/api/*` paths
pub async fn api_not_found() -> Error {
    Error::NotFound {
        message: "API endpoint not found".to_string(),
        hint: None,
    }
}

/// Fallback for every other unknown path when no static directory is served
pub async fn route_not_found() -> Error {
    Error::NotFound {
        message: "Route not found".to_string(),
        hint: Some("This is an API server. Use /api/* endpoints or visit / for API info.".to_string()),
    }
}
