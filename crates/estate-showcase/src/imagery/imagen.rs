use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::generator::{ApiCredential, GeneratedImage, GenerationError, ImageGenerator};
use super::prompt::photo_brief;
use crate::config::ImageryConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
const ASPECT_RATIO: &str = "4:3";
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

/// Imagen `:predict` adapter producing one JPEG per call.
#[derive(Debug, Clone)]
pub struct ImagenClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ImagenClient {
    pub fn new(config: &ImageryConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_http(http, config))
    }

    pub fn with_http(http: reqwest::Client, config: &ImageryConfig) -> Self {
        let endpoint = format!(
            "{}/models/{}:predict",
            config.api_base_url.trim_end_matches('/'),
            config.model
        );
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate(
        &self,
        credential: &ApiCredential,
        prompt: &str,
    ) -> Result<GeneratedImage, GenerationError> {
        let brief = photo_brief(prompt);
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", credential.expose())
            .json(&PredictRequest::single_jpeg(&brief))
            .send()
            .await
            .map_err(|err| GenerationError::other(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            // The status alone decides a 429, even when the body is cut short.
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|err| GenerationError::other(format!("unable to read response: {err}")))?;
        parse_prediction(&body)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest<'a> {
    instances: [PredictInstance<'a>; 1],
    parameters: PredictParameters,
}

impl<'a> PredictRequest<'a> {
    fn single_jpeg(prompt: &'a str) -> Self {
        Self {
            instances: [PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: ASPECT_RATIO,
                output_options: OutputOptions {
                    mime_type: mime::IMAGE_JPEG.essence_str().to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u8,
    aspect_ratio: &'static str,
    output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions {
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Map a non-success response onto the generation error kinds.
///
/// Quota exhaustion is reported either as HTTP 429 or as a
/// `RESOURCE_EXHAUSTED` status in the error body; both are rate limits.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || parsed.as_ref().is_some_and(|envelope| {
            envelope.error.code == Some(429) || envelope.error.status == RESOURCE_EXHAUSTED
        })
        || body.contains(RESOURCE_EXHAUSTED);

    let detail = match parsed {
        Some(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.chars().take(200).collect(),
    };
    let message = format!("HTTP {}: {}", status.as_u16(), detail);

    if rate_limited {
        GenerationError::rate_limited(message)
    } else {
        GenerationError::other(message)
    }
}

pub(crate) fn parse_prediction(body: &str) -> Result<GeneratedImage, GenerationError> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|err| GenerationError::other(format!("malformed prediction response: {err}")))?;

    let prediction = response
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::other("no image returned"))?;

    let bytes = prediction
        .bytes_base64_encoded
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| GenerationError::other("prediction carried no image bytes"))?;

    Ok(match prediction.mime_type {
        Some(mime_type) => GeneratedImage {
            mime_type,
            base64_bytes: bytes,
        },
        None => GeneratedImage::jpeg(bytes),
    })
}
