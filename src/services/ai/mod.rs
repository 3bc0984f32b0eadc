//! Clients for the two external AI backends.
//!
//! Both are pure transforms behind traits so the pipeline can be tested
//! without the network: `TextRecognizer` (vision OCR) and
//! `EssayEvaluator` (text reconstruction + rubric scoring).

pub mod gemini;
pub mod rubric;
pub mod vision;

pub use gemini::{AiEvaluationResult, GeminiClient};
pub use vision::GoogleVisionClient;

use async_trait::async_trait;

use crate::errors::Result;

/// Raw OCR output for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutcome {
    pub text: String,
    /// Mean page confidence in [0, 1]
    pub confidence: f64,
}

/// Extracts text from an image reachable at a public URL.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn extract_text(&self, image_url: &str) -> Result<OcrOutcome>;
}

/// Generative text backend: reconstructs OCR output into clean prose and
/// scores a transcription against the ENEM rubric.
#[async_trait]
pub trait EssayEvaluator: Send + Sync {
    async fn reconstruct(&self, raw_text: &str) -> Result<String>;
    async fn evaluate(&self, transcription: &str) -> Result<AiEvaluationResult>;
}
