/// Generation backend — the single point of entry for text-completion calls.
///
/// Callers depend on the `GenerationBackend` trait; `OllamaClient` is the HTTP
/// implementation used in production. Tests substitute their own backends.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Model identifiers the service accepts.
pub const SUPPORTED_MODELS: [&str; 4] = ["llama3.2", "llama3.1", "mistral", "phi3"];
pub const DEFAULT_MODEL: &str = "llama3.2";

const GENERATE_PATH: &str = "/api/generate";
/// One initial attempt plus a single retry.
const MAX_ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response body: {0}")]
    Parse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl GenerationError {
    fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Http(_) | GenerationError::Timeout(_) => true,
            GenerationError::Api { status, .. } => *status == 429 || *status >= 500,
            GenerationError::Parse(_) => false,
        }
    }
}

pub fn is_supported_model(model: &str) -> bool {
    SUPPORTED_MODELS.contains(&model)
}

/// A remote text-completion service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Ollama `/api/generate` client with a bounded per-attempt timeout and one retry.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GenerationError> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    async fn attempt(&self, request: &GenerateRequest<'_>) -> Result<String, GenerationError> {
        let call = async {
            let response = self.client.post(&self.endpoint).json(request).send().await?;
            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                let message = serde_json::from_str::<OllamaError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateResponse = serde_json::from_str(&body)
                .map_err(|e| GenerationError::Parse(e.to_string()))?;
            debug!("Generation succeeded: eval_count={:?}", parsed.eval_count);
            Ok::<_, GenerationError>(parsed.response)
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        "Generation attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        RETRY_DELAY.as_millis()
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[derive(Clone)]
    struct Stub {
        calls: Arc<AtomicU32>,
        fail_first: u32,
        status: StatusCode,
        body: Value,
        delay: Duration,
    }

    impl Stub {
        fn ok(body: Value) -> Self {
            Self {
                calls: Arc::new(AtomicU32::new(0)),
                fail_first: 0,
                status: StatusCode::OK,
                body,
                delay: Duration::ZERO,
            }
        }
    }

    async fn stub_handler(
        State(stub): State<Stub>,
        Json(req): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let n = stub.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(stub.delay).await;
        assert_eq!(req["stream"], json!(false));
        if n < stub.fail_first {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "model loading"})),
            );
        }
        let mut body = stub.body.clone();
        if body.get("response") == Some(&json!("echo")) {
            let model = req["model"].as_str().unwrap();
            let prompt = req["prompt"].as_str().unwrap();
            body["response"] = json!(format!("{model}:{prompt}"));
        }
        (stub.status, Json(body))
    }

    async fn spawn_stub(stub: Stub) -> String {
        let app = Router::new()
            .route(GENERATE_PATH, post(stub_handler))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_generate_returns_response_field() {
        let url = spawn_stub(Stub::ok(json!({"response": "echo", "done": true}))).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();

        let text = client.generate("hello", "mistral").await.unwrap();
        assert_eq!(text, "mistral:hello");
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let url = spawn_stub(Stub::ok(json!({"response": "ok"}))).await;
        let client = OllamaClient::new(&format!("{url}/"), Duration::from_secs(5)).unwrap();
        assert_eq!(client.generate("p", "phi3").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_single_retry_recovers_from_server_error() {
        let stub = Stub {
            fail_first: 1,
            ..Stub::ok(json!({"response": "recovered"}))
        };
        let calls = stub.calls.clone();
        let url = spawn_stub(stub).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();

        assert_eq!(client.generate("p", "llama3.2").await.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_second_failure() {
        let stub = Stub {
            fail_first: 10,
            ..Stub::ok(json!({"response": "never"}))
        };
        let calls = stub.calls.clone();
        let url = spawn_stub(stub).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();

        let err = client.generate("p", "llama3.2").await.unwrap_err();
        match err {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model loading");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let stub = Stub {
            status: StatusCode::NOT_FOUND,
            ..Stub::ok(json!({"error": "model 'nope' not found"}))
        };
        let calls = stub.calls.clone();
        let url = spawn_stub(stub).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();

        let err = client.generate("p", "nope").await.unwrap_err();
        assert!(matches!(err, GenerationError::Api { status: 404, .. }));
        assert!(err.to_string().contains("not found"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_response_field_is_parse_error() {
        let url = spawn_stub(Stub::ok(json!({"done": true}))).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();

        let err = client.generate("p", "llama3.1").await.unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[tokio::test]
    async fn test_blank_response_is_passed_through() {
        let url = spawn_stub(Stub::ok(json!({"response": "   "}))).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();
        assert_eq!(client.generate("p", "llama3.1").await.unwrap(), "   ");

        let url = spawn_stub(Stub::ok(json!({"response": ""}))).await;
        let client = OllamaClient::new(&url, Duration::from_secs(5)).unwrap();
        assert_eq!(client.generate("p", "phi3").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let stub = Stub {
            delay: Duration::from_secs(5),
            ..Stub::ok(json!({"response": "late"}))
        };
        let url = spawn_stub(stub).await;
        let client = OllamaClient::new(&url, Duration::from_millis(100)).unwrap();

        let err = client.generate("p", "llama3.2").await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OllamaClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client.generate("p", "llama3.2").await.unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)));
    }

    #[test]
    fn test_supported_models() {
        assert!(is_supported_model(DEFAULT_MODEL));
        assert!(is_supported_model("phi3"));
        assert!(!is_supported_model("gpt-4"));
        assert!(!is_supported_model(""));
    }
}
