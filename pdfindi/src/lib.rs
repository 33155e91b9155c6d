//! # pdfindi: document conversion backend
//!
//! `pdfindi` is the HTTP backend of the PDFINDI web tools. A browser uploads one file to a
//! tool route, the service checks it and forwards it to a third-party conversion API, and the
//! result comes back base64-encoded in JSON so the frontend can offer it as a download.
//!
//! ## Overview
//!
//! The service does no document processing of its own. Every tool maps to one call against the
//! vendor API, except compression, which chains PDF to Word and Word back to PDF and reports the
//! size difference. Nothing is stored: uploads live in memory for the duration of one request.
//!
//! ### Request Flow
//!
//! 1. The `file` multipart field is streamed in and capped at `uploads.max_file_size`
//!    ([`upload`]).
//! 2. The upload is checked against the route's allow-list by content type or extension
//!    ([`types`]).
//! 3. The configured [`vendor::ConversionClient`] performs the conversion.
//! 4. The output is wrapped in a JSON envelope with sizes and a renamed filename
//!    ([`formatting`], [`api`]).
//!
//! Failures map onto distinct statuses: 400/413 for bad uploads, the vendor's own status for
//! vendor errors, 500 for timeouts and transport failures ([`errors`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use pdfindi::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = pdfindi::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     pdfindi::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod config;
pub mod errors;
pub mod formatting;
mod openapi;
pub mod telemetry;
pub mod types;
pub mod upload;
pub mod vendor;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::handlers::{conversions, service},
    config::CorsOrigin,
    openapi::ApiDoc,
    vendor::ConversionClient,
};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{self, HeaderValue, Method},
    routing::{any, get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Application state shared across all request handlers.
///
/// Both fields are immutable after startup; handlers only read them.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(Arc::new(config))
///     .vendor(vendor)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Arc<Config>,
    pub vendor: Arc<dyn ConversionClient>,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut exact = Vec::new();
        let mut patterns = Vec::new();
        for origin in &cors_config.allowed_origins {
            match origin {
                CorsOrigin::Url(url) => exact.push(url.origin().ascii_serialization().parse::<HeaderValue>()?),
                CorsOrigin::Pattern(pattern) => patterns.push(pattern.clone()),
                CorsOrigin::Wildcard => {}
            }
        }

        if patterns.is_empty() {
            AllowOrigin::list(exact)
        } else {
            AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &http::request::Parts| {
                exact.contains(origin) || origin.to_str().is_ok_and(|o| patterns.iter().any(|p| p.matches(o)))
            })
        }
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all routes and middleware.
///
/// Adds the tool routes, service routes, OpenAPI docs, the JSON (or static file) fallbacks,
/// optional Prometheus metrics, CORS and request tracing.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let body_limit = usize::try_from(state.config.uploads.max_file_size.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX);

    let router = Router::new()
        .route("/", get(service::service_info))
        .route("/api/health", get(service::health))
        .route("/api/pdf-to-word", post(conversions::pdf_to_word))
        .route("/api/word-to-pdf", post(conversions::word_to_pdf))
        .route("/api/compress-pdf", post(conversions::compress_pdf))
        .route("/api/image-to-pdf", post(conversions::image_to_pdf))
        .route("/api/pdf-to-jpg", post(conversions::pdf_to_jpg))
        .route("/api/ocr-text", post(conversions::ocr_text))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()))
        .route("/api/{*path}", any(service::api_not_found))
        .layer(DefaultBodyLimit::max(body_limit));

    let router = match &state.config.static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            router.fallback_service(ServeDir::new(dir))
        }
        None => router.fallback(service::route_not_found),
    };

    let mut router = router.with_state(state.clone()).layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured server, ready to bind.
pub struct Application {
    router: Router,
    config: Arc<Config>,
}

impl Application {
    /// Create the application with the vendor client selected by `config.vendor.mode`
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let vendor = vendor::create_client(&config.vendor)?;
        Self::with_client(config, vendor)
    }

    /// Create the application around an existing vendor client
    pub fn with_client(config: Config, vendor: Arc<dyn ConversionClient>) -> anyhow::Result<Self> {
        debug!(
            vendor_mode = ?config.vendor.mode,
            vendor_url = %config.vendor.base_url,
            static_dir = ?config.static_dir,
            "Building application"
        );

        let config = Arc::new(config);
        let state = AppState::builder().config(config.clone()).vendor(vendor).build();
        let router = build_router(&state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            environment = %self.config.environment,
            vendor_mode = ?self.config.vendor.mode,
            max_file_size = self.config.uploads.max_file_size,
            "PDFINDI backend listening on http://{}, available at http://localhost:{}",
            bind_addr,
            self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
