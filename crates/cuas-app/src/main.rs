//! `cuas` binary - composition root.
//!
//! 1. Load configuration from TOML and the environment
//! 2. Start loading the knowledge base in the background
//! 3. Build the text-generation backend
//! 4. Run the requested subcommand

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use cuas_chat::ChatService;
use cuas_core::config::CuasConfig;
use cuas_insight::{load_reviews, product_average, ReviewSummarizer};
use cuas_knowledge::{KnowledgeSource, KnowledgeStore, LoadState};
use cuas_llm::{check_backend, GeminiClient, TextGenerator};

use cli::{CliArgs, Command};

const CHAT_HELP: &str = "Commands: /products, /focus [name], /clear, /history, /help, /quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = CuasConfig::load_or_default(&config_file);
    config.apply_env();

    // Tracing. RUST_LOG wins over the configured level.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting cuas v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    // Knowledge base.
    let source = KnowledgeSource::parse(&args.resolve_knowledge(&config.knowledge.source));
    tracing::info!(source = %source, "Loading knowledge base");
    let store = Arc::new(KnowledgeStore::new(
        source,
        Duration::from_secs(config.knowledge.timeout_secs),
    ));
    let loader = store.spawn_load();
    let readiness = Duration::from_millis(config.knowledge.readiness_timeout_ms);

    // Backend.
    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(&config.backend)?);

    match args.command {
        Command::Ask {
            question,
            product,
            json,
        } => {
            let service = ChatService::new(store, generator, readiness, config.chat.clone());
            service.set_focus(product)?;
            let (_, reply) = service
                .send_message_with_outcome(&question.join(" "))
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.text);
            }
        }
        Command::Chat { product } => {
            let service = ChatService::new(store, generator, readiness, config.chat.clone());
            service.set_focus(product)?;
            run_chat(&service).await?;
        }
        Command::Products { json } => {
            if let Err(e) = loader.await {
                tracing::error!(error = %e, "Knowledge load task failed");
            }
            let state = store.state();
            if json {
                let report = serde_json::json!({
                    "state": state,
                    "products": store.product_names(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if state == LoadState::Failed {
                return Err("knowledge base failed to load".into());
            } else {
                for name in store.product_names() {
                    println!("{}", name);
                }
            }
        }
        Command::Summarize {
            product,
            reviews,
            brief,
        } => {
            let reviews = load_reviews(&reviews).await?;
            let summarizer = ReviewSummarizer::new(generator);
            if let Some(avg) = product_average(&reviews) {
                println!("Average rating: {:.1}/5 across {} reviews\n", avg, reviews.len());
            }
            let summary = if brief {
                summarizer.summarize_brief(&product, &reviews).await
            } else {
                summarizer.summarize(&product, &reviews).await
            };
            println!("{}", summary);
        }
        Command::Draft { prompt } => {
            let summarizer = ReviewSummarizer::new(generator);
            println!("{}", summarizer.draft_review(&prompt.join(" ")).await);
        }
        Command::Check => {
            if !config.backend.has_api_key() {
                return Err(format!(
                    "no usable API key; set {} or [backend] api_key",
                    cuas_core::config::API_KEY_ENV
                )
                .into());
            }
            match check_backend(generator.as_ref()).await {
                Ok(reply) => {
                    println!("API key is valid ({}).", config.backend.model);
                    println!("Response: {}", reply);
                }
                Err(e) => {
                    println!("API key is invalid or the backend is unreachable.");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

/// Interactive loop over stdin lines until EOF or `/quit`.
async fn run_chat(service: &ChatService) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(message) = service.messages().first() {
        println!("{}\n", message.text);
    }
    println!("{}", CHAT_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let (name, arg) = match command.split_once(' ') {
                Some((name, arg)) => (name, arg.trim()),
                None => (command, ""),
            };
            match name {
                "quit" | "exit" => break,
                "help" => println!("{}", CHAT_HELP),
                "clear" => {
                    service.clear_messages()?;
                    println!("Conversation cleared.");
                }
                "products" => {
                    let names = service.available_products();
                    if names.is_empty() {
                        println!("No products loaded yet.");
                    } else {
                        println!("{}", names.join("\n"));
                    }
                }
                "focus" => {
                    let focus = (!arg.is_empty()).then(|| arg.to_string());
                    service.set_focus(focus)?;
                    match service.focus()? {
                        Some(p) => println!("Focused on {}.", p),
                        None => println!("Focus cleared."),
                    }
                }
                "history" => {
                    for message in service.messages() {
                        println!("{}: {}", message.speaker(), message.text);
                    }
                }
                other => println!("Unknown command /{}. {}", other, CHAT_HELP),
            }
            continue;
        }

        match service.send_message(line).await {
            Ok(reply) => println!("\n{}\n", reply.text),
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
