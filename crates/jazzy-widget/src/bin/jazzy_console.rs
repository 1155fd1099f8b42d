//! Terminal front end for the Jazzy chat.
//!
//! Reads lines from stdin and posts them to a running server. `/mic` toggles
//! speech input, `/open` toggles the panel flag, `/quit` exits.

use jazzy_voice::{NoopSpeech, ProcessSpeech, SpeechConfig, SpeechIo};
use jazzy_widget::{ConversationView, HttpChatBackend};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/jazzy-chat";

fn resolve_endpoint() -> String {
    if let Some(endpoint) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return endpoint;
    }

    match std::env::var("JAZZY_ENDPOINT") {
        Ok(endpoint) if !endpoint.trim().is_empty() => endpoint,
        _ => DEFAULT_ENDPOINT.to_string(),
    }
}

fn speech_from_env() -> Arc<dyn SpeechIo> {
    let enabled = std::env::var("JAZZY_SPEECH")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if !enabled {
        return Arc::new(NoopSpeech);
    }

    let config = SpeechConfig {
        enabled: true,
        ..SpeechConfig::default()
    };
    match ProcessSpeech::from_config(&config) {
        Ok(speech) => Arc::new(speech),
        Err(e) => {
            tracing::warn!("speech disabled: {}", e);
            Arc::new(NoopSpeech)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let endpoint = resolve_endpoint();
    let backend = HttpChatBackend::new(endpoint.as_str()).expect("failed to build HTTP client");
    let mut view = ConversationView::new(Arc::new(backend), speech_from_env());
    view.toggle_open();

    println!("Chat with Jazzy ({}). /mic, /quit", endpoint);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("failed to read stdin: {}", e);
                        break;
                    }
                };

                match line.trim() {
                    "/quit" => break,
                    "/open" => {
                        let open = view.toggle_open();
                        println!("[panel {}]", if open { "open" } else { "closed" });
                    }
                    "/mic" => {
                        if !view.snapshot().mic_available {
                            println!("[speech input not available]");
                        } else if view.toggle_mic() {
                            println!("[listening…]");
                        }
                    }
                    "" => {}
                    text => {
                        view.set_input(text);
                        println!("Jazzy is thinking…");
                        match view.send().await {
                            Some(turn) => println!("Jazzy: {}", turn.content()),
                            None => println!("[no reply, try again]"),
                        }
                    }
                }
            }
            Some(_) = view.next_speech_event() => {
                if !view.input().is_empty() && !view.is_listening() {
                    println!("You said: {}", view.input());
                    println!("Jazzy is thinking…");
                    if let Some(turn) = view.send().await {
                        println!("Jazzy: {}", turn.content());
                    }
                }
            }
        }
    }
}
