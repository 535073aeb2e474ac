//! OCR client
//!
//! Text recognition is delegated to an OCR sidecar (e.g. an EasyOCR or
//! PaddleOCR HTTP wrapper). The sidecar receives the image as a multipart
//! `file` part and answers with recognized segments:
//!
//! ```json
//! [{"text": "Total Sugars 15.1 g", "confidence": 0.93}, ...]
//! ```
//!
//! A `{"results": [...]}` envelope is accepted as well, and `prob` is accepted
//! as an alias of `confidence`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::OcrConfig;

/// OCR errors
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("OCR service error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One recognized run of text
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextSegment {
    pub text: String,
    #[serde(alias = "prob")]
    pub confidence: f64,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Image → recognized text segments
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<TextSegment>, OcrError>;
}

/// Join segments above `min_confidence` with single spaces
///
/// Segments whose confidence is at or below the threshold are dropped.
pub fn join_confident_text(segments: &[TextSegment], min_confidence: f64) -> String {
    segments
        .iter()
        .filter(|s| s.confidence > min_confidence)
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OcrResponse {
    Segments(Vec<TextSegment>),
    Envelope { results: Vec<TextSegment> },
}

impl OcrResponse {
    fn into_segments(self) -> Vec<TextSegment> {
        match self {
            OcrResponse::Segments(segments) => segments,
            OcrResponse::Envelope { results } => results,
        }
    }
}

fn parse_ocr_response(body: &str) -> Result<Vec<TextSegment>, OcrError> {
    serde_json::from_str::<OcrResponse>(body)
        .map(OcrResponse::into_segments)
        .map_err(|e| OcrError::Parse(e.to_string()))
}

/// OCR sidecar HTTP client
pub struct HttpOcrClient {
    http_client: reqwest::Client,
    url: String,
}

impl HttpOcrClient {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl TextRecognizer for HttpOcrClient {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<TextSegment>, OcrError> {
        tracing::debug!(bytes = image.len(), url = %self.url, "Sending image to OCR service");

        let part = reqwest::multipart::Part::bytes(image.to_vec()).file_name("label.jpg");
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OcrError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OcrError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OcrError::Network(e.to_string()))?;

        let segments = parse_ocr_response(&body)?;
        tracing::debug!(segments = segments.len(), "OCR complete");
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_drops_low_confidence() {
        let segments = vec![
            TextSegment::new("Total Sugars: 15.1 g", 0.91),
            TextSegment::new("smudge", 0.12),
            TextSegment::new("Sodium: 3.3 mg", 0.77),
        ];

        assert_eq!(
            join_confident_text(&segments, 0.5),
            "Total Sugars: 15.1 g Sodium: 3.3 mg"
        );
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let segments = vec![TextSegment::new("Protein", 0.5)];
        assert_eq!(join_confident_text(&segments, 0.5), "");
    }

    #[test]
    fn test_join_skips_blank_segments() {
        let segments = vec![
            TextSegment::new("  ", 0.99),
            TextSegment::new(" Fiber 2 g ", 0.99),
        ];
        assert_eq!(join_confident_text(&segments, 0.5), "Fiber 2 g");
    }

    #[test]
    fn test_parse_bare_array() {
        let body = r#"[{"text": "Energy 60.8 kcal", "confidence": 0.88}]"#;
        let segments = parse_ocr_response(body).unwrap();
        assert_eq!(segments, vec![TextSegment::new("Energy 60.8 kcal", 0.88)]);
    }

    #[test]
    fn test_parse_envelope_with_prob_alias() {
        let body = r#"{"results": [{"text": "Protein 0.0 g", "prob": 0.64}]}"#;
        let segments = parse_ocr_response(body).unwrap();
        assert_eq!(segments, vec![TextSegment::new("Protein 0.0 g", 0.64)]);
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert!(matches!(
            parse_ocr_response(r#"{"status": "busy"}"#),
            Err(OcrError::Parse(_))
        ));
    }
}
