use std::env;

use anyhow::Result;
use hemline_api::build_app;
use hemline_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("hemline_api");

    let bind = env::var("HEMLINE_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

    let app = build_app()?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "hemline support relay started");

    axum::serve(listener, app).await?;
    Ok(())
}
