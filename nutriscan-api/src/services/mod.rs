//! Collaborator services around the scoring core
//!
//! - OCR sidecar client (image → text)
//! - Chat-completions client (text generation)
//! - Nutrient extractor (text → reading)
//! - Advisor (reading + tier → advice draft)
//! - Label analyzer (the full pipeline)

pub mod advisor;
pub mod label_analyzer;
pub mod llm_client;
pub mod nutrient_extractor;
pub mod ocr_client;

pub use advisor::LlmAdvisor;
pub use label_analyzer::{AnalysisError, LabelAnalysis, LabelAnalyzer};
pub use llm_client::{ChatCompletionsClient, ChatModel, LlmError};
pub use nutrient_extractor::{ExtractionError, NutrientExtractor, EXTRACTION_PROMPT};
pub use ocr_client::{join_confident_text, HttpOcrClient, OcrError, TextRecognizer, TextSegment};
