//! HTTP handlers for the file conversion tools.
//!
//! Every handler runs the same pipeline: read the `file` field, check it against the tool's
//! allow-list, call the vendor, and wrap the output in a JSON envelope. Nothing is kept between
//! requests.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use bytes::Bytes;
use std::time::Instant;
use tracing::{info, instrument};

use crate::{
    AppState,
    api::models::conversions::{ConversionResponse, OcrResponse, UploadForm},
    errors::{Error, ErrorContext, ErrorResponse, Result},
    formatting::{compression_ratio, encode_base64, swap_extension},
    types::{DOCX_MIME, Tool, VendorOperation},
    upload::{self, Upload},
};

/// Filename the intermediate Word document is re-uploaded under while compressing
const INTERMEDIATE_DOCX_NAME: &str = "temp.docx";

fn error_context(tool: Tool) -> ErrorContext {
    match tool {
        Tool::CompressPdf => ErrorContext::Compression,
        Tool::OcrText => ErrorContext::Ocr,
        _ => ErrorContext::Conversion,
    }
}

/// Extract the upload and check it is acceptable input for `tool`
async fn receive(state: &AppState, multipart: std::result::Result<Multipart, MultipartRejection>, tool: Tool) -> Result<Upload> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%tool, "Request is not multipart: {}", rejection);
        upload::no_file()
    })?;

    let upload = Upload::from_multipart(&mut multipart, state.config.uploads.max_file_size).await?;
    upload.ensure_kind(tool.input_kind())?;
    Ok(upload)
}

async fn call_vendor(state: &AppState, tool: Tool, operation: VendorOperation, upload: &Upload) -> Result<Bytes> {
    let started = Instant::now();
    let output = state
        .vendor
        .convert(operation, upload)
        .await
        .map_err(|e| Error::from_vendor(error_context(tool), e))?;

    info!(
        %tool,
        %operation,
        input_size = upload.size(),
        output_size = output.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Vendor call completed"
    );
    Ok(output)
}

/// Build the success envelope for a single-step conversion
fn converted(tool: Tool, upload: &Upload, output: &[u8]) -> ConversionResponse {
    let filename = match tool.output_extension() {
        Some(target) => swap_extension(&upload.filename, tool.input_kind().extensions(), target),
        None => upload.filename.clone(),
    };

    ConversionResponse {
        success: true,
        filename,
        base64: encode_base64(output),
        original_size: upload.size(),
        converted_size: output.len() as u64,
        compressed_size: None,
        compression_ratio: None,
        format: (tool == Tool::PdfToImage).then(|| "PNG".to_string()),
        message: tool.success_message().to_string(),
    }
}

async fn convert_with(state: &AppState, multipart: std::result::Result<Multipart, MultipartRejection>, tool: Tool) -> Result<Json<ConversionResponse>> {
    let operation = tool
        .operation()
        .ok_or_else(|| anyhow::anyhow!("{tool} has no single vendor operation"))?;

    let upload = receive(state, multipart, tool).await?;
    let output = call_vendor(state, tool, operation, &upload).await?;

    Ok(Json(converted(tool, &upload, &output)))
}

/// Convert a PDF to an editable Word document
#[utoipa::path(
    post,
    path = "/api/pdf-to-word",
    tag = "conversions",
    summary = "PDF to Word",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Word document, base64-encoded", body = ConversionResponse),
        (status = 400, description = "No file, or the file is not a PDF", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Vendor unreachable or timed out", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn pdf_to_word(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>> {
    convert_with(&state, multipart, Tool::PdfToWord).await
}

/// Convert a Word, RTF or ODT document to PDF
#[utoipa::path(
    post,
    path = "/api/word-to-pdf",
    tag = "conversions",
    summary = "Word to PDF",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF, base64-encoded", body = ConversionResponse),
        (status = 400, description = "No file, or the file is not a document", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Vendor unreachable or timed out", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn word_to_pdf(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>> {
    convert_with(&state, multipart, Tool::WordToPdf).await
}

/// Compress a PDF by round-tripping it through Word.
///
/// The PDF is converted to DOCX and the DOCX back to PDF. If the second call fails the whole
/// request fails; the intermediate document is never returned.
#[utoipa::path(
    post,
    path = "/api/compress-pdf",
    tag = "conversions",
    summary = "Compress PDF",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Compressed PDF with size reduction", body = ConversionResponse),
        (status = 400, description = "No file, or the file is not a PDF", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Vendor unreachable or timed out", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn compress_pdf(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>> {
    let tool = Tool::CompressPdf;
    let upload = receive(&state, multipart, tool).await?;

    let docx = call_vendor(&state, tool, VendorOperation::PdfToDocx, &upload).await?;
    let intermediate = Upload::new(INTERMEDIATE_DOCX_NAME, DOCX_MIME, docx);
    let compressed = call_vendor(&state, tool, VendorOperation::DocxToPdf, &intermediate).await?;

    let ratio = compression_ratio(upload.size(), compressed.len() as u64);
    info!(
        filename = %upload.filename,
        original_size = upload.size(),
        compressed_size = compressed.len(),
        ratio = %ratio,
        "PDF compressed"
    );

    let mut response = converted(tool, &upload, &compressed);
    response.compressed_size = Some(compressed.len() as u64);
    response.message = format!("{} ({} size reduction)", tool.success_message(), ratio);
    response.compression_ratio = Some(ratio);

    Ok(Json(response))
}

/// Convert an image to a single-page PDF
#[utoipa::path(
    post,
    path = "/api/image-to-pdf",
    tag = "conversions",
    summary = "Image to PDF",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF, base64-encoded", body = ConversionResponse),
        (status = 400, description = "No file, or the file is not an image", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Vendor unreachable or timed out", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn image_to_pdf(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>> {
    convert_with(&state, multipart, Tool::ImageToPdf).await
}

/// Render a PDF to an image.
///
/// Despite the route name the output is PNG, reported via `format: "PNG"` and a `.png`
/// filename.
#[utoipa::path(
    post,
    path = "/api/pdf-to-jpg",
    tag = "conversions",
    summary = "PDF to image",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PNG image, base64-encoded", body = ConversionResponse),
        (status = 400, description = "No file, or the file is not a PDF", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Vendor unreachable or timed out", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn pdf_to_jpg(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResponse>> {
    convert_with(&state, multipart, Tool::PdfToImage).await
}

/// Extract text from an image
#[utoipa::path(
    post,
    path = "/api/ocr-text",
    tag = "conversions",
    summary = "Image OCR",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Recognized text", body = OcrResponse),
        (status = 400, description = "No file, or the file is not an image", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Vendor unreachable, timed out or sent unreadable JSON", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn ocr_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>> {
    let tool = Tool::OcrText;
    let upload = receive(&state, multipart, tool).await?;

    let recognized = state
        .vendor
        .recognize_text(&upload)
        .await
        .map_err(|e| Error::from_vendor(error_context(tool), e))?;

    info!(
        filename = %upload.filename,
        text_length = recognized.text.len(),
        successful = recognized.successful,
        "Text extracted"
    );

    Ok(Json(OcrResponse {
        success: true,
        filename: upload.filename.clone(),
        extracted_text: recognized.text,
        confidence: recognized.successful,
        original_size: upload.size(),
        message: tool.success_message().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeVendor, create_test_config, create_test_server};
    use crate::vendor::mock::MOCK_OCR_TEXT;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use base64::{Engine, engine::general_purpose::STANDARD};
    use std::sync::Arc;

    const CONVERSION_ROUTES: [(&str, &str, &str); 6] = [
        ("/api/pdf-to-word", "report.pdf", "application/pdf"),
        ("/api/word-to-pdf", "letter.docx", DOCX_MIME),
        ("/api/compress-pdf", "big.pdf", "application/pdf"),
        ("/api/image-to-pdf", "photo.jpg", "image/jpeg"),
        ("/api/pdf-to-jpg", "slides.pdf", "application/pdf"),
        ("/api/ocr-text", "scan.png", "image/png"),
    ];

    fn file_form(filename: &str, mime: &str, bytes: &[u8]) -> MultipartForm {
        MultipartForm::new().add_part("file", Part::bytes(bytes.to_vec()).file_name(filename).mime_type(mime))
    }

    fn decode(base64: &str) -> Vec<u8> {
        STANDARD.decode(base64).expect("response base64 should decode")
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_file_is_rejected_on_every_route() {
        let vendor = Arc::new(FakeVendor::new());
        let server = create_test_server(create_test_config(), vendor.clone());

        for (route, _, _) in CONVERSION_ROUTES {
            let response = server.post(route).multipart(MultipartForm::new().add_text("other", "value")).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = response.json();
            assert_eq!(body.error, "No file uploaded", "route {route}");

            // Not multipart at all
            let response = server.post(route).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<ErrorResponse>().error, "No file uploaded", "route {route}");
        }

        assert!(vendor.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_wrong_type_never_reaches_vendor() {
        let vendor = Arc::new(FakeVendor::new());
        let server = create_test_server(create_test_config(), vendor.clone());

        let wrong_inputs = [
            ("/api/pdf-to-word", "notes.txt", "text/plain", "File must be a PDF"),
            ("/api/word-to-pdf", "scan.png", "image/png", "File must be a Word document (DOC, DOCX, RTF or ODT)"),
            ("/api/compress-pdf", "letter.docx", DOCX_MIME, "File must be a PDF"),
            ("/api/image-to-pdf", "report.pdf", "application/pdf", "File must be an image (JPEG, PNG, GIF, BMP, TIFF, WebP)"),
            ("/api/pdf-to-jpg", "photo.jpg", "image/jpeg", "File must be a PDF"),
            ("/api/ocr-text", "report.pdf", "application/pdf", "File must be an image (JPEG, PNG, GIF, BMP, TIFF, WebP)"),
        ];

        for (route, filename, mime, message) in wrong_inputs {
            let response = server.post(route).multipart(file_form(filename, mime, b"data")).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<ErrorResponse>().error, message, "route {route}");
        }

        assert!(vendor.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_vendor_output_is_returned_verbatim() {
        let payloads = [
            (VendorOperation::PdfToDocx, b"PK\x03\x04 docx \x00\xfe\xff".to_vec()),
            (VendorOperation::DocxToPdf, b"%PDF-1.7 from docx \x00\xc3\x28".to_vec()),
            (VendorOperation::ImageToPdf, b"%PDF-1.4 from image \xff\xd8\x00".to_vec()),
            (VendorOperation::PdfToPng, b"\x89PNG\r\n\x1a\n\x00\x80\x81".to_vec()),
        ];
        let payload_for = |operation: VendorOperation| {
            payloads.iter().find(|(op, _)| *op == operation).map(|(_, bytes)| bytes.clone()).unwrap()
        };

        // Compression returns whatever the second (docx to pdf) call produced
        let binary_routes = [
            ("/api/pdf-to-word", VendorOperation::PdfToDocx),
            ("/api/word-to-pdf", VendorOperation::DocxToPdf),
            ("/api/compress-pdf", VendorOperation::DocxToPdf),
            ("/api/image-to-pdf", VendorOperation::ImageToPdf),
            ("/api/pdf-to-jpg", VendorOperation::PdfToPng),
        ];

        for (route, final_operation) in binary_routes {
            let vendor = payloads
                .iter()
                .fold(FakeVendor::new(), |vendor, (op, bytes)| vendor.with_output(*op, bytes.clone()));
            let vendor = Arc::new(vendor);
            let server = create_test_server(create_test_config(), vendor.clone());
            let (_, filename, mime) = CONVERSION_ROUTES.iter().find(|(r, _, _)| *r == route).unwrap();
            let input = b"input \x00\x01 bytes";

            let response = server.post(route).multipart(file_form(filename, mime, input)).await;

            response.assert_status_ok();
            let body: ConversionResponse = response.json();
            let expected = payload_for(final_operation);
            assert!(body.success, "route {route}");
            assert_eq!(decode(&body.base64), expected, "route {route}");
            assert_eq!(body.converted_size, expected.len() as u64, "route {route}");
            assert_eq!(body.original_size, input.len() as u64, "route {route}");
            assert_eq!(vendor.calls().last().map(|(op, _)| *op), Some(final_operation), "route {route}");
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_image_to_pdf_response_shape() {
        let output = b"%PDF-1.7 vendor output \x00\xff".to_vec();
        let vendor = Arc::new(FakeVendor::new().with_output(VendorOperation::ImageToPdf, output.clone()));
        let server = create_test_server(create_test_config(), vendor.clone());

        let response = server.post("/api/image-to-pdf").multipart(file_form("Holiday.JPEG", "image/jpeg", b"jpeg bytes")).await;

        response.assert_status_ok();
        let body: ConversionResponse = response.json();
        assert_eq!(body.filename, "Holiday.pdf");
        assert_eq!(decode(&body.base64), output);
        assert_eq!(body.original_size, 10);
        assert_eq!(body.message, "Image successfully converted to PDF");
        assert!(body.compression_ratio.is_none());
        assert!(body.format.is_none());

        assert_eq!(vendor.calls(), vec![(VendorOperation::ImageToPdf, "Holiday.JPEG".to_string())]);
    }

    #[test_log::test(tokio::test)]
    async fn test_output_filenames() {
        let vendor = Arc::new(FakeVendor::new());
        let server = create_test_server(create_test_config(), vendor);

        let cases = [
            ("/api/pdf-to-word", "report.PDF", "application/pdf", "report.docx"),
            ("/api/pdf-to-word", "noext", "application/pdf", "noext"),
            ("/api/word-to-pdf", "cv.rtf", "application/rtf", "cv.pdf"),
            ("/api/pdf-to-jpg", "slides.pdf", "application/pdf", "slides.png"),
            ("/api/compress-pdf", "big.pdf", "application/pdf", "big.pdf"),
        ];

        for (route, filename, mime, expected) in cases {
            let response = server.post(route).multipart(file_form(filename, mime, b"input")).await;
            response.assert_status_ok();
            assert_eq!(response.json::<ConversionResponse>().filename, expected, "route {route}");
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_extension_alone_is_accepted() {
        let vendor = Arc::new(FakeVendor::new());
        let server = create_test_server(create_test_config(), vendor.clone());

        let response = server
            .post("/api/word-to-pdf")
            .multipart(file_form("minutes.odt", "application/octet-stream", b"odt"))
            .await;

        response.assert_status_ok();
        assert_eq!(vendor.calls().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn test_pdf_to_jpg_reports_png() {
        let vendor = Arc::new(FakeVendor::new().with_output(VendorOperation::PdfToPng, b"\x89PNG".to_vec()));
        let server = create_test_server(create_test_config(), vendor);

        let response = server.post("/api/pdf-to-jpg").multipart(file_form("deck.pdf", "application/pdf", b"%PDF")).await;

        response.assert_status_ok();
        let body: ConversionResponse = response.json();
        assert_eq!(body.format.as_deref(), Some("PNG"));
        assert_eq!(body.filename, "deck.png");
        assert_eq!(body.message, "PDF successfully converted to image");
    }

    #[test_log::test(tokio::test)]
    async fn test_compression_chains_two_calls() {
        let vendor = Arc::new(
            FakeVendor::new()
                .with_output(VendorOperation::PdfToDocx, b"PK docx".to_vec())
                .with_output(VendorOperation::DocxToPdf, vec![b'x'; 800]),
        );
        let server = create_test_server(create_test_config(), vendor.clone());

        let response = server.post("/api/compress-pdf").multipart(file_form("big.pdf", "application/pdf", &[b'p'; 1000])).await;

        response.assert_status_ok();
        let body: ConversionResponse = response.json();
        assert_eq!(body.original_size, 1000);
        assert_eq!(body.compressed_size, Some(800));
        assert_eq!(body.converted_size, 800);
        assert_eq!(body.compression_ratio.as_deref(), Some("20.0%"));
        assert_eq!(body.message, "PDF compressed successfully (20.0% size reduction)");
        assert_eq!(decode(&body.base64), vec![b'x'; 800]);

        assert_eq!(
            vendor.calls(),
            vec![
                (VendorOperation::PdfToDocx, "big.pdf".to_string()),
                (VendorOperation::DocxToPdf, INTERMEDIATE_DOCX_NAME.to_string()),
            ]
        );
        let uploads = vendor.uploads();
        assert_eq!(uploads[1].content_type, DOCX_MIME);
        assert_eq!(uploads[1].bytes.as_ref(), b"PK docx");
    }

    #[test_log::test(tokio::test)]
    async fn test_compression_that_grows_reports_zero() {
        let vendor = Arc::new(FakeVendor::new().with_output(VendorOperation::DocxToPdf, vec![0; 1200]));
        let server = create_test_server(create_test_config(), vendor);

        let response = server.post("/api/compress-pdf").multipart(file_form("tiny.pdf", "application/pdf", &[0; 1000])).await;

        response.assert_status_ok();
        let body: ConversionResponse = response.json();
        assert_eq!(body.compression_ratio.as_deref(), Some("0.0%"));
        assert_eq!(body.compressed_size, Some(1200));
    }

    #[test_log::test(tokio::test)]
    async fn test_compression_fails_when_second_call_fails() {
        let vendor = Arc::new(FakeVendor::new().with_failure(VendorOperation::DocxToPdf, 502, "bad gateway"));
        let server = create_test_server(create_test_config(), vendor.clone());

        let response = server.post("/api/compress-pdf").multipart(file_form("big.pdf", "application/pdf", b"%PDF")).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Compression API error: 502");
        assert_eq!(body.details.as_deref(), Some("bad gateway"));
        assert_eq!(vendor.calls().len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_upstream_status_is_passed_through() {
        let vendor = Arc::new(FakeVendor::new().with_failure(VendorOperation::PdfToDocx, 401, "Invalid API key"));
        let server = create_test_server(create_test_config(), vendor);

        let response = server.post("/api/pdf-to-word").multipart(file_form("a.pdf", "application/pdf", b"%PDF")).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Conversion API error: 401");
        assert_eq!(body.details.as_deref(), Some("Invalid API key"));
    }

    #[test_log::test(tokio::test)]
    async fn test_timeout_is_internal_and_isolated() {
        let vendor = Arc::new(FakeVendor::new().with_timeout(VendorOperation::PdfToPng));
        let server = create_test_server(create_test_config(), vendor);

        let response = server.post("/api/pdf-to-jpg").multipart(file_form("a.pdf", "application/pdf", b"%PDF")).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Internal conversion error");
        assert!(body.details.unwrap().contains("timed out"));

        // A following independent request is unaffected
        let response = server.post("/api/pdf-to-word").multipart(file_form("a.pdf", "application/pdf", b"%PDF")).await;
        response.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_ocr_returns_text() {
        let vendor = Arc::new(FakeVendor::new().with_text("Invoice #42", true));
        let server = create_test_server(create_test_config(), vendor.clone());

        let response = server.post("/api/ocr-text").multipart(file_form("invoice.png", "image/png", b"\x89PNG")).await;

        response.assert_status_ok();
        let body: OcrResponse = response.json();
        assert!(body.success);
        assert_eq!(body.filename, "invoice.png");
        assert_eq!(body.extracted_text, "Invoice #42");
        assert!(body.confidence);
        assert_eq!(body.original_size, 4);
        assert_eq!(body.message, "Text successfully extracted from image");
        assert_eq!(vendor.calls(), vec![(VendorOperation::ImageToText, "invoice.png".to_string())]);
    }

    #[test_log::test(tokio::test)]
    async fn test_ocr_errors_use_ocr_wording() {
        let vendor = Arc::new(FakeVendor::new().with_failure(VendorOperation::ImageToText, 500, ""));
        let server = create_test_server(create_test_config(), vendor);

        let response = server.post("/api/ocr-text").multipart(file_form("scan.jpg", "image/jpeg", b"jpg")).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "OCR API error: 500");
        assert_eq!(body.details.as_deref(), Some("Unknown API error"));
    }

    #[test_log::test(tokio::test)]
    async fn test_oversized_upload_is_rejected() {
        let mut config = create_test_config();
        config.uploads.max_file_size = 1024 * 1024;
        let vendor = Arc::new(FakeVendor::new());
        let server = create_test_server(config, vendor.clone());

        let response = server
            .post("/api/pdf-to-word")
            .multipart(file_form("huge.pdf", "application/pdf", &vec![b'a'; 1024 * 1024 + 1]))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json::<ErrorResponse>().error, "File too large. Maximum size is 1MB.");
        assert!(vendor.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_sub_megabyte_limit_is_reported_in_kilobytes() {
        let mut config = create_test_config();
        config.uploads.max_file_size = 1024;
        let vendor = Arc::new(FakeVendor::new());
        let server = create_test_server(config, vendor.clone());

        let response = server
            .post("/api/image-to-pdf")
            .multipart(file_form("photo.png", "image/png", &[0u8; 1025]))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json::<ErrorResponse>().error, "File too large. Maximum size is 1KB.");
        assert!(vendor.calls().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_mock_vendor_end_to_end() {
        let config = create_test_config();
        let server = crate::Application::new(config).expect("mock application builds").into_test_server();

        let response = server.post("/api/ocr-text").multipart(file_form("scan.png", "image/png", b"\x89PNG")).await;
        response.assert_status_ok();
        assert_eq!(response.json::<OcrResponse>().extracted_text, MOCK_OCR_TEXT);

        let response = server.post("/api/word-to-pdf").multipart(file_form("memo.doc", "application/msword", b"doc")).await;
        response.assert_status_ok();
        assert!(decode(&response.json::<ConversionResponse>().base64).starts_with(b"%PDF-"));
    }
}
