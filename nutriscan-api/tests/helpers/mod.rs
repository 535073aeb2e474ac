//! Shared test helpers: in-process fakes for the OCR and language model
//! collaborators, plus request/response utilities.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Response;
use http_body_util::BodyExt;
use serde_json::Value;

use nutriscan_api::services::{
    ChatModel, LabelAnalyzer, LlmError, OcrError, TextRecognizer, TextSegment, EXTRACTION_PROMPT,
};
use nutriscan_api::{build_router, AppState};

/// Recognizer that returns fixed segments
pub struct FakeRecognizer {
    segments: Vec<TextSegment>,
}

impl FakeRecognizer {
    pub fn new(segments: Vec<TextSegment>) -> Self {
        Self { segments }
    }

    pub fn reading(text: &str) -> Self {
        Self::new(vec![TextSegment::new(text, 0.95)])
    }
}

#[async_trait]
impl TextRecognizer for FakeRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<Vec<TextSegment>, OcrError> {
        Ok(self.segments.clone())
    }
}

/// Recognizer whose sidecar is down
pub struct BrokenRecognizer;

#[async_trait]
impl TextRecognizer for BrokenRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<Vec<TextSegment>, OcrError> {
        Err(OcrError::Network("connection refused".to_string()))
    }
}

/// Language model with separate canned replies for extraction and advice
pub struct FakeModel {
    extraction: Result<String, String>,
    advice: Result<String, String>,
    advice_calls: AtomicUsize,
}

impl FakeModel {
    pub fn new(extraction: &str, advice: Result<&str, &str>) -> Self {
        Self {
            extraction: Ok(extraction.to_string()),
            advice: advice.map(str::to_string).map_err(str::to_string),
            advice_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_extraction(reason: &str) -> Self {
        Self {
            extraction: Err(reason.to_string()),
            advice: Err(reason.to_string()),
            advice_calls: AtomicUsize::new(0),
        }
    }

    pub fn advice_calls(&self) -> usize {
        self.advice_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn complete(&self, system_prompt: &str, _user_content: &str) -> Result<String, LlmError> {
        let reply = if system_prompt == EXTRACTION_PROMPT {
            &self.extraction
        } else {
            self.advice_calls.fetch_add(1, Ordering::SeqCst);
            &self.advice
        };
        reply.clone().map_err(LlmError::Network)
    }
}

/// Router wired to the given fakes
pub fn test_app(recognizer: impl TextRecognizer + 'static, model: Arc<FakeModel>) -> axum::Router {
    build_router(test_state(recognizer, model))
}

/// State with an API key configured, for inspecting state after requests
pub fn test_state(recognizer: impl TextRecognizer + 'static, model: Arc<FakeModel>) -> AppState {
    let analyzer = LabelAnalyzer::new(Arc::new(recognizer), model, 0.5);
    AppState::new(analyzer, true)
}

/// State as started without a language model API key
pub fn keyless_state(recognizer: impl TextRecognizer + 'static, model: Arc<FakeModel>) -> AppState {
    let analyzer = LabelAnalyzer::new(Arc::new(recognizer), model, 0.5);
    AppState::new(analyzer, false)
}

pub const BOUNDARY: &str = "nutriscan-test-boundary";

/// Multipart body with a single part named `field`
pub fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"label.jpg\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
