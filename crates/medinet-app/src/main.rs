//! Medinet console binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the HTTP search and webhook clients
//! 4. Run the chat loop on stdin until `/quit` or EOF

mod cli;
mod console;

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use medinet_chat::{
    ActionOutcome, ChatError, ChatOrchestrator, HttpSearchClient, HttpWebhookClient,
};
use medinet_core::config::MedinetConfig;

use cli::CliArgs;
use console::{format_panel, format_turn, Command, HELP};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = MedinetConfig::load_or_default(&config_file);
    if let Some(ref url) = args.webhook_url {
        config.chat.webhook_url = url.clone();
    }
    if let Some(ref url) = args.search_url {
        config.search.endpoint = url.clone();
    }

    // Tracing. RUST_LOG wins over the configured level.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Medinet v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Backends.
    let webhook = HttpWebhookClient::new(&config.chat)?;
    let search = HttpSearchClient::new(&config.search)?;
    tracing::info!(
        webhook = %config.chat.webhook_url,
        search = %config.search.endpoint,
        "Backends configured"
    );

    let orchestrator = ChatOrchestrator::new(Arc::new(webhook), Arc::new(search), &config);

    println!("{}", "=== Medinet Assistant ===".bright_cyan().bold());
    println!("{}", HELP.dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Unknown(input) => {
                println!("{}", format!("Unknown command: {}", input).yellow());
            }
            Command::Submit(text) => submit(&orchestrator, &text).await,
            Command::Click(n) => click(&orchestrator, n).await,
            Command::Open(n) => open(&orchestrator, n),
        }
    }

    tracing::info!(turns = orchestrator.transcript().len(), "Session ended");
    Ok(())
}

async fn submit(orchestrator: &ChatOrchestrator, text: &str) {
    match orchestrator.submit(text).await {
        Ok(submission) => {
            println!("{}", format_turn(&submission.turn));
            if let Some(enrichment) = submission.enrichment {
                if let Err(e) = enrichment.await {
                    tracing::debug!(error = %e, "Background search task aborted");
                }
                print_panel(orchestrator);
            }
        }
        Err(e @ (ChatError::EmptyMessage | ChatError::MessageTooLong(_) | ChatError::Busy)) => {
            println!("{}", e.to_string().yellow());
        }
        Err(e) => tracing::error!(error = %e, "Submit failed"),
    }
}

async fn click(orchestrator: &ChatOrchestrator, n: usize) {
    let actions = orchestrator.last_actions();
    let Some(action) = actions.get(n - 1) else {
        println!("{}", format!("No action [{}]", n).yellow());
        return;
    };

    match orchestrator.handle_action(action).await {
        Ok(ActionOutcome::Navigate { route }) => println!("{} {}", "->".cyan(), route),
        Ok(ActionOutcome::Turn(turn)) => {
            println!("{}", format_turn(&turn));
            print_panel(orchestrator);
        }
        Err(e) => println!("{}", e.to_string().yellow()),
    }
}

fn open(orchestrator: &ChatOrchestrator, n: usize) {
    let panel = orchestrator.panel();
    match panel.results.get(n - 1) {
        Some(result) => println!("{} {}", "->".cyan(), result.route()),
        None => println!("{}", format!("No result {}", n).yellow()),
    }
}

fn print_panel(orchestrator: &ChatOrchestrator) {
    if let Some(panel) = format_panel(&orchestrator.panel()) {
        println!("{}", panel);
    }
}
