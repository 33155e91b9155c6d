//! Request and response bodies for the HTTP API.

pub mod conversions;
pub mod service;
