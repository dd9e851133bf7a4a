//! VLM provider trait and request/response types.
//!
//! Defines the interface the describe pipeline calls through, so the HTTP
//! layer and the retry loop can be tested against a mock provider.

use crate::error::DescribeError;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to a VLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a MIME type hint.
    ///
    /// Only `image/*` hints are honored; anything else falls back to
    /// `image/png`, matching what callers send when they don't know better.
    pub fn from_bytes(bytes: &[u8], media_type: Option<&str>) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: normalize_media_type(media_type),
        }
    }

    /// Wrap already-encoded base64 data (no data-URL prefix expected).
    ///
    /// The payload is not validated; the backend rejects garbage on its own.
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: "image/png".to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Pick a usable media type from an optional Content-Type hint.
fn normalize_media_type(hint: Option<&str>) -> String {
    match hint {
        Some(value) => {
            // Strip parameters like "; charset=binary"
            let essence = value.split(';').next().unwrap_or(value).trim();
            if essence.starts_with("image/") {
                essence.to_string()
            } else {
                "image/png".to_string()
            }
        }
        None => "image/png".to_string(),
    }
}

/// A single request to generate an image description.
#[derive(Debug, Clone)]
pub struct VlmRequest {
    /// The image to describe
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// The response from a VLM description call.
#[derive(Debug, Clone)]
pub struct VlmResponse {
    /// Generated text description (trimmed)
    pub text: String,
    /// Model identifier reported by the backend
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that VLM backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the generator holds a `Box<dyn VlmProvider>`).
#[async_trait]
pub trait VlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "azure/inference").
    fn name(&self) -> &str;

    /// Generate a description for the given request.
    async fn generate(&self, request: &VlmRequest) -> Result<VlmResponse, DescribeError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_from_bytes_jpeg() {
        let input = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], Some("image/jpeg"));
        assert_eq!(input.media_type, "image/jpeg");
        assert!(!input.data.is_empty());
    }

    #[test]
    fn test_image_input_from_bytes_strips_parameters() {
        let input = ImageInput::from_bytes(&[1, 2, 3], Some("image/webp; charset=binary"));
        assert_eq!(input.media_type, "image/webp");
    }

    #[test]
    fn test_image_input_non_image_hint_defaults_to_png() {
        let input = ImageInput::from_bytes(&[1, 2, 3], Some("text/html"));
        assert_eq!(input.media_type, "image/png");
    }

    #[test]
    fn test_image_input_no_hint_defaults_to_png() {
        let input = ImageInput::from_bytes(&[1, 2, 3], None);
        assert_eq!(input.media_type, "image/png");
    }

    #[test]
    fn test_image_input_data_url() {
        let input = ImageInput::from_bytes(&[1, 2, 3], Some("image/jpeg"));
        let url = input.data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_from_base64_keeps_payload_verbatim() {
        let input = ImageInput::from_base64("aGVsbG8=");
        assert_eq!(input.data, "aGVsbG8=");
        assert_eq!(input.data_url(), "data:image/png;base64,aGVsbG8=");
    }
}
