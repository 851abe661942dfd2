use async_trait::async_trait;
use std::fmt;

/// Credential for the image-generation API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(<redacted>)")
    }
}

/// Encoded photo returned by the generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub base64_bytes: String,
}

impl GeneratedImage {
    pub fn jpeg(base64_bytes: impl Into<String>) -> Self {
        Self {
            mime_type: mime::IMAGE_JPEG.essence_str().to_string(),
            base64_bytes: base64_bytes.into(),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_bytes)
    }
}

/// How a failed generation call should be treated by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// The request quota was exceeded; the call may succeed later.
    RateLimited,
    /// Anything else: transport, auth, malformed or empty responses.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: GenerationErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: GenerationErrorKind::Other,
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == GenerationErrorKind::RateLimited
    }
}

/// Boundary to the external image-generation API.
///
/// Implementations issue exactly one request per call and classify failures;
/// retry policy lives with the caller.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        credential: &ApiCredential,
        prompt: &str,
    ) -> Result<GeneratedImage, GenerationError>;
}
