//! HTTP request handlers.
//!
//! - [`conversions`]: the six file tools, each a receive, validate, vendor call, format pipeline
//! - [`service`]: health check, service information and the JSON 404 fallbacks

pub mod conversions;
pub mod service;
