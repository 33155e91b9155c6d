use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart body accepted by every conversion route
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// The file to convert
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Converted file returned inline as base64.
///
/// `compressedSize` and `compressionRatio` are only present on `/api/compress-pdf`, `format`
/// only on `/api/pdf-to-jpg`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub success: bool,
    /// Suggested download name, with the extension of the produced format
    #[schema(example = "report.docx")]
    pub filename: String,
    /// Output file, standard base64 with padding
    pub base64: String,
    /// Size of the uploaded file in bytes
    pub original_size: u64,
    /// Size of the produced file in bytes
    pub converted_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    /// Size reduction with one decimal place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "20.0%")]
    pub compression_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "PNG")]
    pub format: Option<String>,
    pub message: String,
}

/// Text recognized in an uploaded image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub success: bool,
    pub filename: String,
    pub extracted_text: String,
    /// Whether the vendor reported the recognition as successful
    pub confidence: bool,
    pub original_size: u64,
    pub message: String,
}
