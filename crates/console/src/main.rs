//! LegalMind console entry point
//!
//! Interactive chat with the legal assistant on stdin/stdout. Logs go to
//! stderr so the conversation stays readable.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use legalmind_agent::{
    AgentError, ConversationSession, RateLimiter, ResponseEngine, SubmitOutcome,
};
use legalmind_config::{load_settings, Settings};
use legalmind_console::command::HELP;
use legalmind_console::{admit_message, Command, FileDocument, LoggingObserver};
use legalmind_text_processing::DocumentAnalyzer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("LEGALMIND_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting LegalMind console v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let engine = ResponseEngine::from_path(config.knowledge_base_path.as_deref())
        .context("failed to load knowledge base")?;
    tracing::info!(topics = engine.knowledge_base().len(), "Knowledge base ready");

    let session = Arc::new(ConversationSession::new(Arc::new(engine), config.chat.clone()));
    session.add_observer(Arc::new(LoggingObserver));

    let limiter = RateLimiter::new(config.rate_limit.clone());
    let analyzer = DocumentAnalyzer::new();
    let user_id = std::env::var("USER").unwrap_or_else(|_| "local".to_string());

    print_transcript(&session);
    println!("\nType /help for commands.\n");

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };

                match Command::parse(&line) {
                    Command::Message(text) => {
                        if text.is_empty() {
                            continue;
                        }
                        match admit_message(&session, &limiter, &user_id) {
                            Ok(()) => {}
                            Err(AgentError::Busy) => {
                                println!("Please wait for the current reply.");
                                continue;
                            }
                            Err(e) => {
                                tracing::warn!(user = %user_id, error = %e, "Message rejected");
                                println!("{}", e);
                                continue;
                            }
                        }

                        println!("{} is typing...", config.chat.assistant_label);
                        let session = session.clone();
                        let reply_tx = reply_tx.clone();
                        tokio::spawn(async move {
                            let _ = reply_tx.send(session.submit(&text).await);
                        });
                    }
                    Command::Reset => {
                        session.reset();
                        println!();
                        print_transcript(&session);
                    }
                    Command::Export(None) => println!("{}", session.export_transcript()),
                    Command::Export(Some(path)) => {
                        match tokio::fs::write(&path, session.export_transcript()).await {
                            Ok(()) => println!("Transcript saved to {}", path.display()),
                            Err(e) => {
                                tracing::warn!(path = %path.display(), error = %e, "Export failed");
                                println!("Could not save transcript: {}", e);
                            }
                        }
                    }
                    Command::Share => println!("{}", session.share_text()),
                    Command::Analyze(path) => {
                        let document = FileDocument::new(path);
                        match analyzer.analyze_from(&document).await {
                            Ok(analysis) => {
                                let summary = analysis.summary();
                                println!("{}", summary.executive_summary);
                                for point in summary.key_points {
                                    println!("  - {}", point);
                                }
                            }
                            Err(e) => {
                                tracing::warn!(
                                    path = %document.path().display(),
                                    error = %e,
                                    "Document analysis failed"
                                );
                                println!("Could not analyze document: {}", e);
                            }
                        }
                    }
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Unknown(message) => println!("{}", message),
                }
            }
            Some(result) = reply_rx.recv() => {
                match result {
                    Ok(SubmitOutcome::Replied(message)) => {
                        println!("{}: {}\n", config.chat.assistant_label, message.text);
                    }
                    Ok(SubmitOutcome::Cancelled) | Ok(SubmitOutcome::Ignored) => {}
                    Err(e) => println!("{}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, exiting");
                break;
            }
        }
    }

    tracing::info!(messages = session.message_count(), "Console session ended");
    Ok(())
}

fn print_transcript(session: &ConversationSession) {
    println!("{}", session.export_transcript());
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("legalmind={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
