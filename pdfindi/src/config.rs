//! Application configuration management.
//!
//! Configuration is loaded from an optional YAML file with environment variable overrides. The
//! configuration file path defaults to `config.yaml` but can be specified via `-f` flag or the
//! `PDFINDI_CONFIG` environment variable. A missing file is not an error: every field has a
//! default, so the service can be configured from the environment alone.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `PDFINDI_` override YAML values
//! 3. **Platform variables** - `PORT`, `NODE_ENV` and `CLOUDMERSIVE_API_KEY`, as set by hosting
//!    platforms, override `port`, `environment` and `vendor.api_key`
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `PDFINDI_VENDOR__TIMEOUT=10s` sets the `vendor.timeout` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use pdfindi::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example
//!
//! ```yaml
//! port: 8080
//! environment: production
//! vendor:
//!   mode: cloudmersive
//!   timeout: 30s
//! cors:
//!   allowed_origins:
//!     - https://pdfindi.com
//!     - https://*.vercel.app
//!   allow_credentials: true
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "PDFINDI_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Deployment name reported by the health check (`NODE_ENV` on hosting platforms)
    pub environment: String,
    /// Conversion vendor settings
    pub vendor: VendorConfig,
    /// Upload limits
    pub uploads: UploadConfig,
    /// Cross-origin settings for the browser frontend
    pub cors: CorsConfig,
    /// Directory of frontend files to serve for non-API paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// Which vendor client the service talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorMode {
    /// The real Cloudmersive API (requires an API key)
    Cloudmersive,
    /// Canned responses for local development, no network access
    Mock,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct VendorConfig {
    pub mode: VendorMode,
    /// API key sent in the `Apikey` header. Usually supplied via `CLOUDMERSIVE_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL the vendor operation paths are joined onto
    pub base_url: Url,
    /// Per-request timeout for every vendor call
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            mode: VendorMode::Cloudmersive,
            api_key: None,
            base_url: Url::parse("https://api.cloudmersive.com/").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Largest accepted upload in bytes
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
        }
    }
}

/// CORS configuration for the frontend origins
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<CorsOrigin>,
    pub allow_credentials: bool,
    /// Seconds browsers may cache a preflight response
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: Some(3600),
        }
    }
}

/// CORS origin specification.
///
/// Either a wildcard (`*`) to allow all origins, a subdomain pattern such as
/// `https://*.vercel.app`, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard", serialize_with = "serialize_wildcard")]
    Wildcard,
    /// Any subdomain of a host, e.g. `https://*.vercel.app`
    #[serde(deserialize_with = "parse_pattern")]
    Pattern(OriginPattern),
    /// Specific origin URL (e.g., `https://pdfindi.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

/// A `scheme://*.domain` origin pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct OriginPattern {
    pub scheme: String,
    /// Domain without the leading `*.`, e.g. `vercel.app`
    pub domain: String,
}

impl OriginPattern {
    pub fn parse(s: &str) -> Option<Self> {
        let (scheme, rest) = s.split_once("://")?;
        let domain = rest.strip_prefix("*.")?.trim_end_matches('/');
        if scheme.is_empty() || domain.is_empty() || domain.contains('*') {
            return None;
        }
        Some(Self {
            scheme: scheme.to_ascii_lowercase(),
            domain: domain.to_ascii_lowercase(),
        })
    }

    /// Whether an `Origin` header value is a subdomain of the pattern's domain
    pub fn matches(&self, origin: &str) -> bool {
        let Some((scheme, host)) = origin.split_once("://") else {
            return false;
        };
        if !scheme.eq_ignore_ascii_case(&self.scheme) {
            return false;
        }
        let host = host.to_ascii_lowercase();
        match host.strip_suffix(&self.domain) {
            Some(prefix) => prefix.len() > 1 && prefix.ends_with('.'),
            None => false,
        }
    }
}

impl From<OriginPattern> for String {
    fn from(pattern: OriginPattern) -> Self {
        format!("{}://*.{}", pattern.scheme, pattern.domain)
    }
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn serialize_wildcard<S>(serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("*")
}

fn parse_pattern<'de, D>(deserializer: D) -> Result<OriginPattern, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    OriginPattern::parse(&s).ok_or_else(|| serde::de::Error::custom("Expected 'scheme://*.domain'"))
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            vendor: VendorConfig::default(),
            uploads: UploadConfig::default(),
            cors: CorsConfig::default(),
            static_dir: None,
            enable_metrics: false,
            enable_otel_export: false,
        }
    }
}

/// Reasons a loaded configuration is refused
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CLOUDMERSIVE_API_KEY environment variable is required when vendor.mode is 'cloudmersive'")]
    MissingApiKey,
    #[error("uploads.max_file_size must be greater than zero")]
    ZeroFileSize,
    #[error("vendor.timeout must be greater than zero")]
    ZeroTimeout,
    #[error("cors.allow_credentials cannot be combined with a '*' origin")]
    WildcardWithCredentials,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vendor.mode == VendorMode::Cloudmersive && self.vendor.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            return Err(ConfigError::MissingApiKey);
        }

        if self.uploads.max_file_size == 0 {
            return Err(ConfigError::ZeroFileSize);
        }

        if self.vendor.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        if self.cors.allow_credentials && self.cors.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
            return Err(ConfigError::WildcardWithCredentials);
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            // PDFINDI_CONFIG names the file itself and is not a field
            .merge(Env::prefixed("PDFINDI_").ignore(&["config"]).split("__"))
            // Variables set by hosting platforms
            .merge(Env::raw().only(&["PORT"]))
            .merge(Env::raw().only(&["NODE_ENV"]).map(|_| "environment".into()))
            .merge(Env::raw().only(&["CLOUDMERSIVE_API_KEY"]).map(|_| "vendor.api_key".into()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
