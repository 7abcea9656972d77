use std::sync::Arc;

use anyhow::Result;
use appscout_agents::IntentRouter;
use appscout_bot::run_polling;
use appscout_core::Settings;
use appscout_ml::ClassifierStack;
use appscout_observability::{init_tracing, AppMetrics};
use teloxide::Bot;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("appscout_bot");

    let settings = Settings::from_env().inspect_err(|err| {
        error!(error = %err, "invalid configuration, bot not started");
    })?;
    let credentials = settings.require_credentials().inspect_err(|err| {
        error!(error = %err, "missing credentials, bot not started");
    })?;

    let stack = ClassifierStack::from_settings(&settings.llm);
    let router = Arc::new(IntentRouter::new(stack, AppMetrics::shared()));

    info!(model = %settings.llm.model, "appscout bot starting");
    run_polling(Bot::new(credentials.telegram_token), router).await;
    Ok(())
}
