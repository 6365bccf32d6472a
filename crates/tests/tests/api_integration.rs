use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use hemline_agents::SupportAgent;
use hemline_api::{build_router, ApiState};
use hemline_core::{replies, IntentTable};
use hemline_observability::AppMetrics;
use hemline_provider::{CompletionProvider, ProviderError};
use serde_json::json;
use tower::ServiceExt;

struct ScriptedProvider {
    calls: AtomicUsize,
    answer: Option<String>,
}

impl ScriptedProvider {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            answer: Some(text.to_string()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            answer: None,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        _system_instruction: &str,
        _user_message: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::Connection("connection refused".to_string())),
        }
    }
}

fn app_with(provider: Arc<ScriptedProvider>) -> Router {
    let table = IntentTable::from_json_str(
        r#"{
            "intents": [
                {
                    "patterns": ["return policy"],
                    "responses": ["Returns accepted within 30 days.", "unused string"]
                },
                {
                    "patterns": ["delivery"],
                    "responses": ["Standard delivery takes 3-5 business days."]
                }
            ]
        }"#,
    )
    .expect("test table should parse");

    let metrics = AppMetrics::shared();
    let agent = Arc::new(SupportAgent::new(table, provider, metrics.clone()));

    build_router(ApiState { agent, metrics })
}

fn chat_request(message: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "message": message }).to_string()))
        .unwrap()
}

async fn reply_text(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    parsed["reply"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_reports_online() {
    let app = app_with(ScriptedProvider::answering("unused"));

    for uri in ["/", "/health"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "online");
        assert!(parsed.get("metrics").is_some());
    }
}

#[tokio::test]
async fn chat_answers_from_the_intent_table() {
    let provider = ScriptedProvider::answering("unused");
    let app = app_with(provider.clone());

    let response = app
        .oneshot(chat_request("what is your return policy?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(reply_text(response).await, "Returns accepted within 30 days.");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn chat_prompts_on_empty_message() {
    let provider = ScriptedProvider::answering("unused");
    let app = app_with(provider.clone());

    let response = app.oneshot(chat_request("   ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(reply_text(response).await, replies::EMPTY_PROMPT);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn chat_falls_back_to_the_provider() {
    let provider = ScriptedProvider::answering("We restock jackets every Friday.");
    let app = app_with(provider.clone());

    let response = app
        .oneshot(chat_request("I want a refund for my broken jacket"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(reply_text(response).await, "We restock jackets every Friday.");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn provider_failure_becomes_the_apology_reply() {
    let provider = ScriptedProvider::failing();
    let app = app_with(provider.clone());

    let response = app
        .oneshot(chat_request("I want a refund for my broken jacket"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(reply_text(response).await, replies::PROVIDER_APOLOGY);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn health_metrics_count_handled_chats() {
    let app = app_with(ScriptedProvider::answering("unused"));

    let chat_response = app
        .clone()
        .oneshot(chat_request("how long does delivery take?"))
        .await
        .unwrap();
    assert_eq!(
        reply_text(chat_response).await,
        "Standard delivery takes 3-5 business days."
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["metrics"]["requests_total"], 1);
    assert_eq!(parsed["metrics"]["faq_hits_total"], 1);
    assert_eq!(parsed["metrics"]["fallback_total"], 0);
}
