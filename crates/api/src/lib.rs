use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use hemline_agents::SupportAgent;
use hemline_core::replies;
use hemline_core::{ChatReply, ChatRequest, IntentTable};
use hemline_observability::{AppMetrics, MetricsSnapshot};
use hemline_provider::{CompletionProvider, OpenAiProvider};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

const DEFAULT_INTENTS_PATH: &str = "config/intents.json";

pub struct ApiState<P>
where
    P: CompletionProvider,
{
    pub agent: Arc<SupportAgent<P>>,
    pub metrics: Arc<AppMetrics>,
}

impl<P> Clone for ApiState<P>
where
    P: CompletionProvider,
{
    fn clone(&self) -> Self {
        Self {
            agent: Arc::clone(&self.agent),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Wire everything from the environment: intent table from
/// `HEMLINE_INTENTS_PATH`, completion provider from the
/// `HEMLINE_OPENAI_*` variables. Any failure here is fatal; the relay
/// never starts with a missing or malformed table.
pub fn build_app() -> Result<Router> {
    let intents_path =
        env::var("HEMLINE_INTENTS_PATH").unwrap_or_else(|_| DEFAULT_INTENTS_PATH.to_string());
    let table = IntentTable::from_path(&intents_path)
        .with_context(|| format!("failed loading intent table from {intents_path}"))?;

    let provider = Arc::new(OpenAiProvider::from_env()?);
    let metrics = AppMetrics::shared();
    let agent = Arc::new(SupportAgent::new(table, provider, metrics.clone()));

    Ok(build_router(ApiState { agent, metrics }))
}

pub fn build_router<P>(state: ApiState<P>) -> Router
where
    P: CompletionProvider + 'static,
{
    Router::new()
        .route("/", get(health::<P>))
        .route("/health", get(health::<P>))
        .route("/chat", post(chat::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
}

/// Liveness signal the desktop client polls. Stays independent of
/// dispatch: it answers even when the completion provider is down.
async fn health<P>(State(state): State<ApiState<P>>) -> impl IntoResponse
where
    P: CompletionProvider + 'static,
{
    let payload = HealthResponse {
        status: "online",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn chat<P>(
    State(state): State<ApiState<P>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse
where
    P: CompletionProvider + 'static,
{
    match state.agent.handle_message(&request.message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReply { reply })),
        Err(error) => {
            // The dispatcher propagates provider failures untranslated;
            // this boundary owns turning them into a user-safe reply.
            tracing::warn!(error = %error, "completion provider failed");
            (
                StatusCode::OK,
                Json(ChatReply {
                    reply: replies::PROVIDER_APOLOGY.to_string(),
                }),
            )
        }
    }
}
