//! OpenAPI documentation for the HTTP API, served at `/api/docs`.

use utoipa::OpenApi;

use crate::api::handlers::{conversions, service};
use crate::api::models::{
    conversions::{ConversionResponse, OcrResponse, UploadForm},
    service::{EndpointIndex, HealthResponse, ServiceInfo, ServiceLimits},
};
use crate::errors::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        service::health,
        service::service_info,
        conversions::pdf_to_word,
        conversions::word_to_pdf,
        conversions::compress_pdf,
        conversions::image_to_pdf,
        conversions::pdf_to_jpg,
        conversions::ocr_text,
    ),
    components(schemas(
        UploadForm,
        ConversionResponse,
        OcrResponse,
        ErrorResponse,
        HealthResponse,
        ServiceInfo,
        EndpointIndex,
        ServiceLimits,
    )),
    tags(
        (name = "conversions", description = "Document and image conversion. Upload the file as multipart field `file`."),
        (name = "service", description = "Health and service information"),
    ),
    info(
        title = "PDFINDI API",
        version = "1.0.0",
        description = "Document conversion service. Every tool takes a single uploaded file and returns the result inline.

## Uploads

Send `multipart/form-data` with the file in the `file` field. Files up to 50MB are accepted by default.

## Responses

Converted files are returned base64-encoded in the `base64` field together with a suggested `filename`.

## Errors

Errors are JSON objects with an `error` field and, for vendor failures, a `details` field:

```json
{
  \"error\": \"Conversion API error: 401\",
  \"details\": \"Invalid API key\"
}
```",
    ),
)]
pub struct ApiDoc;
