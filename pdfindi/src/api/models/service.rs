use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness report. Never depends on the vendor being reachable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    #[schema(example = "PDFINDI Backend")]
    pub service: String,
    /// Deployment name, from `NODE_ENV` on hosting platforms
    pub environment: String,
    pub version: String,
}

/// Self-description served at `/`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
    pub endpoints: EndpointIndex,
    pub documentation: String,
    pub limits: ServiceLimits,
}

/// Method and path of each public route
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointIndex {
    pub health: String,
    pub pdf_to_word: String,
    pub word_to_pdf: String,
    pub compress_pdf: String,
    pub image_to_pdf: String,
    pub pdf_to_jpg: String,
    pub ocr_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLimits {
    #[schema(example = "50MB")]
    pub max_file_size: String,
    #[schema(example = "30 seconds")]
    pub timeout: String,
    pub allowed_types: Vec<String>,
}
