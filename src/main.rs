mod config;
mod error;
mod net;
mod services;
mod state;
mod widgets;

use std::sync::Arc;
use std::time::Duration;

use dashboard::input::InputEvent;
use dashboard::widget::ProviderRegistry;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::net::{HttpBackend, WsTransport};
use crate::services::bridge::NetworkBridge;
use crate::services::panels::FeedStatus;
use crate::state::{FeedPlan, Shell};
use crate::widgets::weather::OpenMeteo;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ShellError> {
    tracing_subscriber::fmt::init();

    let config = ShellConfig::from_env();
    let backend = Arc::new(HttpBackend::new(&config)?);
    let weather_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ShellError::fetch("https://api.open-meteo.com", e))?;

    let mut providers = ProviderRegistry::new();
    widgets::register_builtin(&mut providers, Arc::new(OpenMeteo::new(weather_http)));

    info!(backend = %config.base_url, "wallboard starting");
    let mut shell = Shell::new(config.viewport, backend, providers);
    let report = shell.bootstrap().await;

    let bridge = match report.feed {
        FeedPlan::Connect(port) => {
            let (status_tx, mut status_rx) = mpsc::unbounded_channel::<FeedStatus>();
            tokio::spawn(async move {
                while let Some(status) = status_rx.recv().await {
                    info!(status = status.text(), class = status.class(), "feed status");
                }
            });
            Some(NetworkBridge::new(Arc::new(WsTransport), config.feed_url(port), shell.panels(), status_tx).spawn())
        }
        FeedPlan::NoPort => {
            warn!("telemetry enabled but no feed port configured");
            None
        }
        FeedPlan::Disabled => None,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_line(&mut shell, &line),
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "stdin read failed");
                    break;
                }
            },
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }
    }

    if let Some(bridge) = bridge {
        bridge.abort();
    }
    info!(pending = shell.pending_writes(), "draining pending writes");
    let summary = shell.flush().await;
    info!(saved = summary.saved, failed = summary.failed, "wallboard stopped");
    Ok(())
}

/// One JSON-encoded [`InputEvent`] per line; blank lines are ignored.
fn handle_line(shell: &mut Shell, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    let event = match serde_json::from_str::<InputEvent>(line) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "unrecognised input line");
            return;
        }
    };
    for action in shell.handle(event) {
        info!(?action, "action");
    }
    debug!(interaction = ?shell.dashboard().interaction(), "input handled");
}
