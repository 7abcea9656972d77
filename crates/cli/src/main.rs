use std::io::{self, Write};

use anyhow::{Context, Result};
use appscout_agents::IntentRouter;
use appscout_core::{classify_fallback, dispatch_label, LlmSettings, Settings};
use appscout_ml::ClassifierStack;
use appscout_observability::{init_tracing, AppMetrics};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "appscout")]
#[command(about = "AppScout intent router CLI")]
struct Cli {
    /// Skip the remote classifier even when a key is configured.
    #[arg(long)]
    offline: bool,

    #[arg(long, env = "APPSCOUT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify one message and print the prediction as JSON.
    Classify { text: String },
    /// Run only the keyword classifier.
    Fallback { text: String },
    /// Classify and dispatch one message.
    Route { text: String },
    /// Render the reply for an explicit intent label.
    Reply {
        #[arg(long)]
        intent: String,
        text: String,
    },
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("appscout_cli");
    let cli = Cli::parse();

    let settings = Settings::from_env().context("invalid environment configuration")?;
    let router = build_router(&cli, settings.llm);

    match cli.command {
        Command::Classify { text } => {
            let prediction = router.classify(&text).await;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Command::Fallback { text } => {
            println!("{}", classify_fallback(&text));
        }
        Command::Route { text } => match router.handle(Some(&text)).await {
            Some(reply) => println!("{}", serde_json::to_string_pretty(&reply)?),
            None => println!("(no reply)"),
        },
        Command::Reply { intent, text } => {
            println!("{}", dispatch_label(&intent, &text));
        }
        Command::Chat => run_chat(&router).await?,
    }

    Ok(())
}

async fn run_chat(router: &IntentRouter) -> Result<()> {
    println!("AppScout chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim_end_matches(['\r', '\n']);
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if let Some(reply) = router.handle(Some(message)).await {
            println!("\n[{} via {}] {}\n", reply.intent, reply.source.as_code(), reply.reply_text);
        }
    }

    Ok(())
}

fn build_router(cli: &Cli, mut llm: LlmSettings) -> IntentRouter {
    if let Some(model) = cli.model.as_ref() {
        llm.model = model.clone();
    }

    let stack = if cli.offline {
        ClassifierStack::fallback_only()
    } else {
        ClassifierStack::from_settings(&llm)
    };

    IntentRouter::new(stack, AppMetrics::shared())
}
