//! Test utilities: configuration, a scriptable vendor and server construction.

use crate::config::{Config, VendorMode};
use crate::types::VendorOperation;
use crate::upload::Upload;
use crate::vendor::{ConversionClient, RecognizedText, Result, VendorError};
use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.vendor.mode = VendorMode::Mock;
    config
}

/// Build a test server around a given vendor client
pub fn create_test_server(config: Config, vendor: Arc<dyn ConversionClient>) -> TestServer {
    crate::Application::with_client(config, vendor)
        .expect("Failed to create application")
        .into_test_server()
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(Bytes),
    Failure { status: u16, body: String },
    Timeout,
}

/// Vendor double that records every call and answers from a per-operation script.
///
/// Unscripted conversions return a small fixed payload; unscripted OCR returns empty text.
#[derive(Default)]
pub struct FakeVendor {
    script: HashMap<VendorOperation, Scripted>,
    text: Option<RecognizedText>,
    uploads: Mutex<Vec<(VendorOperation, Upload)>>,
}

impl FakeVendor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, operation: VendorOperation, bytes: Vec<u8>) -> Self {
        self.script.insert(operation, Scripted::Output(Bytes::from(bytes)));
        self
    }

    pub fn with_failure(mut self, operation: VendorOperation, status: u16, body: &str) -> Self {
        self.script.insert(
            operation,
            Scripted::Failure {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn with_timeout(mut self, operation: VendorOperation) -> Self {
        self.script.insert(operation, Scripted::Timeout);
        self
    }

    pub fn with_text(mut self, text: &str, successful: bool) -> Self {
        self.text = Some(RecognizedText {
            text: text.to_string(),
            successful,
        });
        self
    }

    /// Operations called so far, with the filename each was sent
    pub fn calls(&self) -> Vec<(VendorOperation, String)> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(operation, upload)| (*operation, upload.filename.clone()))
            .collect()
    }

    /// Uploads as the vendor received them, in call order
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().iter().map(|(_, upload)| upload.clone()).collect()
    }

    fn record(&self, operation: VendorOperation, upload: &Upload) -> Option<Scripted> {
        self.uploads.lock().unwrap().push((operation, upload.clone()));
        self.script.get(&operation).cloned()
    }
}

fn scripted_error(scripted: Scripted) -> VendorError {
    match scripted {
        Scripted::Failure { status, body } => VendorError::Upstream { status, body },
        _ => VendorError::Timeout(Duration::from_secs(30)),
    }
}

#[async_trait]
impl ConversionClient for FakeVendor {
    async fn convert(&self, operation: VendorOperation, upload: &Upload) -> Result<Bytes> {
        match self.record(operation, upload) {
            Some(Scripted::Output(bytes)) => Ok(bytes),
            Some(other) => Err(scripted_error(other)),
            None => Ok(Bytes::from_static(b"converted")),
        }
    }

    async fn recognize_text(&self, upload: &Upload) -> Result<RecognizedText> {
        match self.record(VendorOperation::ImageToText, upload) {
            Some(Scripted::Output(_)) | None => Ok(self.text.clone().unwrap_or(RecognizedText {
                text: String::new(),
                successful: false,
            })),
            Some(other) => Err(scripted_error(other)),
        }
    }
}
