use std::sync::Arc;

use appscout_agents::IntentRouter;
use teloxide::prelude::*;
use tracing::{error, info};

/// Bot commands (`/start`, `/help@bot`) never reach the router. Telegram only
/// marks a command when the slash is the first character.
pub fn is_command(text: &str) -> bool {
    text.starts_with('/')
}

/// Reply text for an inbound message, or `None` when nothing should be sent.
pub async fn reply_for(router: &IntentRouter, text: Option<&str>) -> Option<String> {
    if text.is_some_and(is_command) {
        return None;
    }

    router.handle(text).await.map(|reply| reply.reply_text)
}

pub async fn run_polling(bot: Bot, router: Arc<IntentRouter>) {
    let handler = dptree::entry().branch(Update::filter_message().endpoint({
        let router = Arc::clone(&router);
        move |msg: Message, bot: Bot| {
            let router = Arc::clone(&router);
            async move {
                handle_message(&router, &bot, &msg).await;
                respond(())
            }
        }
    }));

    info!(remote_classifier = router.remote_enabled(), "telegram polling started");

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(router: &IntentRouter, bot: &Bot, msg: &Message) {
    let Some(reply) = reply_for(router, msg.text()).await else {
        return;
    };

    if let Err(err) = bot.send_message(msg.chat.id, reply).await {
        error!(chat_id = msg.chat.id.0, error = %err, "failed to send reply");
    }
}
