//! The describe pipeline: validate, normalize, invoke with bounded retries.
//!
//! One request in, one outbound VLM call out (plus retries on 5xx). The
//! wall clock starts just before the first attempt and covers retries and
//! the fixed delays between them.

use super::fetch::fetch_image;
use super::provider::{ImageInput, VlmProvider, VlmRequest};
use super::retry;
use crate::config::VlmConfig;
use crate::error::DescribeError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Input for one describe request.
#[derive(Debug, Clone, Default)]
pub struct DescribeInput {
    /// Base64-encoded image (no data-URL prefix)
    pub image_base64: Option<String>,
    /// Publicly reachable image URL, fetched server-side
    pub image_url: Option<String>,
    /// Caller-supplied identifier, echoed back
    pub image_id: Option<String>,
}

/// Result of one describe request.
#[derive(Debug, Clone)]
pub struct DescribeOutcome {
    /// Echoed caller identifier
    pub image_id: Option<String>,
    /// Generated description (trimmed)
    pub description: String,
    /// Wall-clock duration of the invocation, retries included
    pub processing_ms: u64,
}

/// Describe pipeline around a single VLM provider.
pub struct Generator {
    provider: Arc<dyn VlmProvider>,
    fetch_client: reqwest::Client,
    prompt: String,
    options: VlmConfig,
}

impl Generator {
    pub fn new(provider: Box<dyn VlmProvider>, prompt: String, options: VlmConfig) -> Self {
        Self {
            provider: Arc::from(provider),
            fetch_client: reqwest::Client::new(),
            prompt,
            options,
        }
    }

    /// Run one describe request end to end.
    ///
    /// Validates that an image is present, fetches the URL form if needed,
    /// then calls the provider with up to `options.attempts` tries. Only
    /// 5xx backend errors are retried; the delay between attempts is fixed.
    pub async fn describe(&self, input: DescribeInput) -> Result<DescribeOutcome, DescribeError> {
        let image = self.normalize(&input).await?;

        let request = VlmRequest {
            image,
            prompt: self.prompt.clone(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let start = Instant::now();
        tracing::info!(provider = self.provider.name(), "calling VLM");

        let mut last_error = DescribeError::Vlm {
            message: "VLM call never attempted".to_string(),
            status_code: None,
        };

        for attempt in 1..=self.options.attempts {
            if attempt > 1 {
                tokio::time::sleep(retry::retry_delay(self.options.retry_delay_ms)).await;
            }

            match tokio::time::timeout(
                Duration::from_millis(self.options.timeout_ms),
                self.provider.generate(&request),
            )
            .await
            {
                Ok(Ok(response)) => {
                    let processing_ms = start.elapsed().as_millis() as u64;
                    tracing::info!(
                        model = %response.model,
                        latency_ms = response.latency_ms,
                        processing_ms,
                        "VLM responded"
                    );
                    return Ok(DescribeOutcome {
                        image_id: input.image_id,
                        description: response.text,
                        processing_ms,
                    });
                }
                Ok(Err(e)) => {
                    let retryable = retry::is_retryable(&e);
                    tracing::warn!(
                        attempt,
                        attempts = self.options.attempts,
                        retryable,
                        "VLM attempt failed: {e}"
                    );
                    last_error = e;
                    if !retryable {
                        break;
                    }
                }
                Err(_) => {
                    last_error = DescribeError::Timeout {
                        timeout_ms: self.options.timeout_ms,
                    };
                    tracing::warn!(
                        attempt,
                        attempts = self.options.attempts,
                        "VLM attempt timed out after {}ms",
                        self.options.timeout_ms
                    );
                    break;
                }
            }
        }

        Err(last_error)
    }

    /// Turn the request into an [`ImageInput`], fetching the URL if needed.
    async fn normalize(&self, input: &DescribeInput) -> Result<ImageInput, DescribeError> {
        match (&input.image_base64, &input.image_url) {
            (Some(data), _) => Ok(ImageInput::from_base64(data.clone())),
            (None, Some(url)) => {
                fetch_image(&self.fetch_client, url, self.options.fetch_timeout_ms).await
            }
            (None, None) => Err(DescribeError::MissingImage),
        }
    }
}
