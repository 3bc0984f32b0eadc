//! Google Vision OCR client.
//!
//! Calls the `images:annotate` REST endpoint with document text detection
//! tuned for handwritten Portuguese essays. The call is a pure transform
//! over a public image URL; nothing is persisted here.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{OcrOutcome, TextRecognizer};
use crate::config::AppConfig;
use crate::errors::{EssaySystemError, Result};

/// Confidence reported when the backend returns no page confidences.
const DEFAULT_CONFIDENCE: f64 = 0.9;

pub struct GoogleVisionClient {
    client: Client,
    api_key: String,
    endpoint: String,
    language_hint: String,
}

impl GoogleVisionClient {
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self {
            client: Client::new(),
            api_key: config.ocr.api_key.clone(),
            endpoint: config.ocr.endpoint.clone(),
            language_hint: config.ocr.language_hint.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageRequest {
    image: ImageSource,
    features: Vec<Feature>,
    image_context: ImageContext,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageSource {
    source: ImageUri,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageUri {
    image_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    max_results: u32,
    model: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext {
    language_hints: Vec<String>,
    text_detection_params: TextDetectionParams,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextDetectionParams {
    enable_text_detection_confidence_score: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    responses: Option<Vec<AnnotateImageResponse>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    error: Option<ApiError>,
    full_text_annotation: Option<FullTextAnnotation>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullTextAnnotation {
    text: Option<String>,
    pages: Option<Vec<Page>>,
}

#[derive(Deserialize)]
struct Page {
    confidence: Option<f64>,
}

#[async_trait]
impl TextRecognizer for GoogleVisionClient {
    async fn extract_text(&self, image_url: &str) -> Result<OcrOutcome> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageSource {
                    source: ImageUri {
                        image_uri: image_url.to_string(),
                    },
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION",
                    max_results: 150,
                    model: "builtin/latest",
                }],
                image_context: ImageContext {
                    language_hints: vec![self.language_hint.clone()],
                    text_detection_params: TextDetectionParams {
                        enable_text_detection_confidence_score: true,
                    },
                },
            }],
        };

        debug!("Sending OCR request for image: {}", image_url);

        let response = self
            .client
            .post(format!("{}/images:annotate", self.endpoint))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                EssaySystemError::ocr_service(format!("Vision HTTP request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(EssaySystemError::ocr_service(format!(
                "Vision API returned {status}: {error_body}"
            )));
        }

        let annotate: AnnotateResponse = response.json().await.map_err(|e| {
            EssaySystemError::ocr_service(format!("Failed to parse Vision response: {e}"))
        })?;

        let result = annotate
            .responses
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| EssaySystemError::ocr_service("No response from Vision API"))?;

        if let Some(error) = result.error {
            return Err(EssaySystemError::ocr_service(format!(
                "Vision API error: {}",
                error.message.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        let annotation = result
            .full_text_annotation
            .ok_or_else(|| EssaySystemError::ocr_empty_result("No text found in image"))?;

        let text = annotation
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| EssaySystemError::ocr_empty_result("No text found in image"))?;

        let confidence = mean_page_confidence(annotation.pages.as_deref().unwrap_or(&[]));

        Ok(OcrOutcome { text, confidence })
    }
}

/// Mean of the page-level confidences, rounded to two decimals;
/// falls back to the default when the backend reports none.
fn mean_page_confidence(pages: &[Page]) -> f64 {
    let confidences: Vec<f64> = pages.iter().filter_map(|p| p.confidence).collect();

    let confidence = if confidences.is_empty() {
        DEFAULT_CONFIDENCE
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    };

    (confidence * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_confidence_defaults_when_absent() {
        assert_eq!(mean_page_confidence(&[]), 0.9);
        assert_eq!(
            mean_page_confidence(&[Page { confidence: None }]),
            0.9
        );
    }

    #[test]
    fn test_mean_confidence_averages_and_rounds() {
        let pages = [
            Page {
                confidence: Some(0.8),
            },
            Page {
                confidence: Some(0.9),
            },
        ];
        assert_eq!(mean_page_confidence(&pages), 0.85);

        let pages = [
            Page {
                confidence: Some(0.333),
            },
            Page {
                confidence: Some(0.333),
            },
            Page {
                confidence: Some(0.333),
            },
        ];
        assert_eq!(mean_page_confidence(&pages), 0.33);
    }

    #[test]
    fn test_mean_confidence_skips_missing_pages() {
        let pages = [
            Page {
                confidence: Some(0.6),
            },
            Page { confidence: None },
            Page {
                confidence: Some(1.0),
            },
        ];
        assert_eq!(mean_page_confidence(&pages), 0.8);
    }
}
