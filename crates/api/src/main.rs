use std::sync::Arc;

use anyhow::Result;
use appscout_agents::IntentRouter;
use appscout_api::{build_app, ApiConfig};
use appscout_core::Settings;
use appscout_ml::ClassifierStack;
use appscout_observability::{init_tracing, AppMetrics};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("appscout_api");

    let settings = Settings::from_env()?;
    let config = ApiConfig::from_env();

    let stack = ClassifierStack::from_settings(&settings.llm);
    let router = Arc::new(IntentRouter::new(stack, AppMetrics::shared()));
    let app = build_app(router, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(bind = %config.bind, "appscout api started");

    axum::serve(listener, app).await?;
    Ok(())
}
