//! HTTP surface: root, health, and the describe endpoint.
//!
//! Three routes on top of the core describe pipeline. The generator is
//! optional in app state so the service can come up (and report healthy)
//! even when no VLM credentials are configured; only the describe route
//! needs them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use beholder_core::{DescribeInput, Generator};

/// Service identifier reported on the root route.
pub const SERVICE_NAME: &str = "beholder-api";

/// Shared per-process state.
#[derive(Clone)]
pub struct AppState {
    /// Describe pipeline, present only when credentials resolved at startup.
    pub generator: Option<Arc<Generator>>,
}

/// Wire format of a describe request.
#[derive(Debug, Deserialize)]
pub struct DescribeRequest {
    /// Base64-encoded image (PNG/JPEG, no data-URL prefix)
    pub image_base64: Option<String>,
    /// Publicly reachable image URL, fetched by the server
    pub image_url: Option<String>,
    /// Caller-supplied identifier, echoed back
    pub image_id: Option<String>,
}

/// Wire format of a describe response.
#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub image_id: Option<String>,
    pub description: String,
    pub processing_ms: u64,
}

/// Errors rendered as `{"detail": ...}` with the matching status code.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::ServiceUnavailable(detail) => (StatusCode::SERVICE_UNAVAILABLE, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/describe", post(describe))
        .with_state(state)
}

/// GET / - Service identity
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "service": SERVICE_NAME }))
}

/// GET /health - Liveness check
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// POST /api/describe - Describe an image via the configured VLM.
async fn describe(
    State(state): State<AppState>,
    Json(request): Json<DescribeRequest>,
) -> Result<Json<DescribeResponse>, ApiError> {
    let generator = state.generator.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable(
            "VLM credentials not configured. Set AZURE_INFERENCE_* or AZURE_OPENAI_* \
             environment variables."
                .to_string(),
        )
    })?;

    let outcome = generator
        .describe(DescribeInput {
            image_base64: request.image_base64,
            image_url: request.image_url,
            image_id: request.image_id,
        })
        .await
        .map_err(|e| {
            if e.is_client_error() {
                ApiError::BadRequest(e.to_string())
            } else {
                // Specifics go to the log, not the client
                tracing::error!("describe request failed: {e}");
                ApiError::Internal("Description failed".to_string())
            }
        })?;

    Ok(Json(DescribeResponse {
        image_id: outcome.image_id,
        description: outcome.description,
        processing_ms: outcome.processing_ms,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use beholder_core::{DescribeError, VlmConfig, VlmProvider, VlmRequest, VlmResponse};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    struct MockProvider {
        result: Box<dyn Fn() -> Result<VlmResponse, DescribeError> + Send + Sync>,
    }

    impl MockProvider {
        fn success(text: &str) -> Self {
            let text = text.to_string();
            Self {
                result: Box::new(move || {
                    Ok(VlmResponse {
                        text: text.clone(),
                        model: "mock-v1".to_string(),
                        latency_ms: 5,
                    })
                }),
            }
        }

        fn failing(status_code: u16) -> Self {
            Self {
                result: Box::new(move || {
                    Err(DescribeError::Vlm {
                        message: format!("HTTP {status_code}"),
                        status_code: Some(status_code),
                    })
                }),
            }
        }
    }

    #[async_trait]
    impl VlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, _request: &VlmRequest) -> Result<VlmResponse, DescribeError> {
            (self.result)()
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(60)
        }
    }

    fn test_options() -> VlmConfig {
        VlmConfig {
            timeout_ms: 5_000,
            attempts: 1,
            retry_delay_ms: 10,
            fetch_timeout_ms: 200,
            max_tokens: 100,
            temperature: 0.3,
        }
    }

    fn router_with(provider: MockProvider) -> Router {
        let generator = Generator::new(
            Box::new(provider),
            "Describe this image.".to_string(),
            test_options(),
        );
        build_router(AppState {
            generator: Some(Arc::new(generator)),
        })
    }

    fn router_unconfigured() -> Router {
        build_router(AppState { generator: None })
    }

    fn describe_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/describe")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_reports_service_name() {
        let response = router_unconfigured()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["service"], "beholder-api");
    }

    #[tokio::test]
    async fn test_health_succeeds_without_configuration() {
        let response = router_unconfigured()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_describe_missing_both_fields_is_400() {
        let response = router_with(MockProvider::success("unused"))
            .oneshot(describe_request(serde_json::json!({ "image_id": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("image_base64"));
    }

    #[tokio::test]
    async fn test_describe_echoes_image_id() {
        let response = router_with(MockProvider::success("A settings screen."))
            .oneshot(describe_request(serde_json::json!({
                "image_base64": "aW1hZ2UgYnl0ZXM=",
                "image_id": "shot-42"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["image_id"], "shot-42");
        assert_eq!(json["description"], "A settings screen.");
        assert!(json["processing_ms"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_describe_unconfigured_is_503() {
        let response = router_unconfigured()
            .oneshot(describe_request(serde_json::json!({
                "image_base64": "aW1hZ2U="
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("credentials"));
    }

    #[tokio::test]
    async fn test_describe_provider_failure_is_generic_500() {
        let response = router_with(MockProvider::failing(401))
            .oneshot(describe_request(serde_json::json!({
                "image_base64": "aW1hZ2U="
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Backend specifics stay out of the response body
        assert_eq!(json["detail"], "Description failed");
    }
}
