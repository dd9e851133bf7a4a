//! Remote image download for URL-based describe requests.
//!
//! Fetch failures propagate unmodified to the caller; no validation of the
//! downloaded bytes beyond the HTTP status.

use super::provider::ImageInput;
use crate::error::DescribeError;
use std::time::Duration;

/// Fetch an image from a public URL and wrap it for the VLM call.
///
/// Follows redirects (reqwest default, up to 10 hops) and applies a bounded
/// timeout. The response `Content-Type` header supplies the media type when
/// it names an image type.
pub async fn fetch_image(
    client: &reqwest::Client,
    url: &str,
    timeout_ms: u64,
) -> Result<ImageInput, DescribeError> {
    tracing::info!(url, "fetching image from URL");

    let resp = client
        .get(url)
        .timeout(Duration::from_millis(timeout_ms))
        .send()
        .await
        .map_err(|e| DescribeError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DescribeError::Fetch {
            url: url.to_string(),
            message: format!("HTTP {status}"),
        });
    }

    let media_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let bytes = resp.bytes().await.map_err(|e| DescribeError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(ImageInput::from_bytes(&bytes, media_type.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_fetch_error() {
        let client = reqwest::Client::new();
        // Reserved TEST-NET-1 address, nothing listens there
        let err = fetch_image(&client, "http://192.0.2.1/image.png", 200)
            .await
            .unwrap_err();
        match err {
            DescribeError::Fetch { url, .. } => {
                assert_eq!(url, "http://192.0.2.1/image.png");
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_fetch_error() {
        let client = reqwest::Client::new();
        let err = fetch_image(&client, "not-a-url", 200).await.unwrap_err();
        assert!(matches!(err, DescribeError::Fetch { .. }));
    }
}
