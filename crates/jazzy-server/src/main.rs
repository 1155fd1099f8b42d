//! Jazzy server binary.
//!
//! Starts an axum HTTP server with structured logging and graceful shutdown
//! on SIGTERM/SIGINT.

use jazzy_actions::ActionDispatcher;
use jazzy_llm::{ChatPipeline, OpenAiClient};
use jazzy_server::config::{self, ConfigLocation};
use jazzy_server::{app, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let location = ConfigLocation::from_process();
    let config = config::load_config(Some(location.path()))
        .expect("failed to load configuration: the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        origin = location.origin(),
        path = location.path(),
        "loaded configuration"
    );

    if !config.llm.has_api_key() {
        tracing::warn!("OPENAI_API_KEY is not set; chat requests will fail as upstream errors");
    }

    tracing::info!(
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        "configured completion provider"
    );

    let temperature = config.llm.temperature;
    let client = OpenAiClient::new(config.llm.clone()).expect("failed to build completion client");
    let pipeline = ChatPipeline::new(Arc::new(client)).with_temperature(temperature);

    let dispatcher = ActionDispatcher::with_builtin_handlers(&config.actions);
    tracing::debug!(?dispatcher, "registered action handlers");

    // Build application
    let state = AppState::new(pipeline, dispatcher, &config.widget.frame_url);
    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting jazzy server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address: is another process using this port?");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("jazzy server shut down");
}

/// Resolves once the process is asked to stop.
async fn shutdown_signal() {
    let signal = tokio::select! {
        _ = tokio::signal::ctrl_c() => "interrupt",
        _ = terminate() => "terminate",
    };
    tracing::info!(signal, "stopping, draining open connections");
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::warn!("cannot listen for SIGTERM: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
