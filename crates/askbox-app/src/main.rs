//! askbox binary - composition root.
//!
//! Wires the HTTP answer client and the platform speech adapters into the
//! session controller and drives it from a minimal line-oriented front
//! end standing in for the floating panel:
//! - a plain line submits a question
//! - `:talk` starts a single-shot listen
//! - `:close` resets the session (the panel close action)
//! - `:quit` or end-of-input fires the unload notification and exits

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use askbox_client::HttpAnswerClient;
use askbox_core::config::AskboxConfig;
use askbox_core::types::{Message, Role};
use askbox_session::{SessionController, SubmitOutcome};
use askbox_speech::{PlatformSpeechInput, PlatformSpeechOutput};

#[derive(Parser, Debug)]
#[command(name = "askbox", version, about = "Voice-enabled chat widget client")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the answer service base URL.
    #[arg(long)]
    base_url: Option<String>,
}

/// Resolve the config file path (flag, ASKBOX_CONFIG env, or
/// ~/.askbox/config.toml).
fn config_path(cli: &Cli) -> PathBuf {
    if let Some(path) = &cli.config {
        return path.clone();
    }
    if let Ok(path) = std::env::var("ASKBOX_CONFIG") {
        return PathBuf::from(path);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".askbox").join("config.toml");
    }
    PathBuf::from("config.toml")
}

/// Print history entries appended since the last call.
fn render_new(history: &[Message], printed: &mut usize) {
    if *printed > history.len() {
        // History shrank (session reset); start over.
        *printed = 0;
    }
    for msg in &history[*printed..] {
        match msg.role {
            Role::User => println!("you  > {}", msg.text),
            Role::Agent => println!("agent> {}", msg.text),
        }
    }
    *printed = history.len();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Config.
    let cli = Cli::parse();
    let config_file = config_path(&cli);
    let mut config = AskboxConfig::load_or_default(&config_file);

    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    } else if let Ok(base_url) = std::env::var("ASKBOX_API_BASE") {
        config.service.base_url = base_url;
    }

    tracing::info!(
        base_url = %config.service.base_url,
        speech = config.speech.enabled,
        "Starting askbox v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Wiring.
    let client = HttpAnswerClient::new(&config.service)?;
    let speech_in = PlatformSpeechInput::new(&config.speech.locale);
    let speech_out = PlatformSpeechOutput::new(&config.speech.locale);
    let controller = SessionController::new(config.chat.clone(), client, speech_in, speech_out);

    let mut printed = 0usize;
    render_new(&controller.history(), &mut printed);

    // Front end loop.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "" => {}
            ":quit" => break,
            ":close" => {
                controller.reset_session();
                println!("(session closed)");
                printed = 0;
                render_new(&controller.history(), &mut printed);
            }
            ":talk" => {
                if !config.speech.enabled {
                    println!("(notice: speech is disabled in the configuration)");
                    continue;
                }
                match controller.trigger_listen().await {
                    Ok(_) => render_new(&controller.history(), &mut printed),
                    Err(e) => println!("(notice: {})", e),
                }
            }
            _ => {
                controller.set_draft(&line);
                match controller.submit_text(&line).await {
                    SubmitOutcome::RequestInFlight => println!("(still thinking, hold on)"),
                    SubmitOutcome::TooLong => println!("(question too long)"),
                    _ => {}
                }
                render_new(&controller.history(), &mut printed);
            }
        }
    }

    // Tab-close equivalent: tell the backend the session is gone.
    controller.notify_unload().await;

    Ok(())
}
