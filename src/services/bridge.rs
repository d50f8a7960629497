//! Telemetry push feed bridge.
//!
//! DESIGN
//! ======
//! One background task owns the feed connection. Each text message is
//! decoded as a [`TelemetryMessage`] snapshot and written into the shared
//! [`NetworkPanels`]. When the connection ends, for any reason, the bridge
//! waits a fixed [`RECONNECT_DELAY`] and connects again. There is no
//! backoff and no attempt limit.
//!
//! Status changes go to the panels and to an unbounded channel so the host
//! can report them as they happen:
//!
//! ```text
//! Connecting -> Connected -> (close) Disconnected -> 3s -> Connecting
//! Connecting -> (connect error) Error -> Disconnected -> 3s -> Connecting
//! ```
//!
//! ERROR HANDLING
//! ==============
//! A malformed message is logged and skipped; the connection stays up. A
//! transport error mid-stream reports `Error` and ends the connection.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::panels::{FeedStatus, NetworkPanels, TelemetryMessage};
use crate::net::{FeedStream, FeedTransport};

/// Fixed delay between a lost connection and the next attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

pub struct NetworkBridge {
    transport: Arc<dyn FeedTransport>,
    url: String,
    panels: Arc<RwLock<NetworkPanels>>,
    status_tx: mpsc::UnboundedSender<FeedStatus>,
}

impl NetworkBridge {
    #[must_use]
    pub fn new(
        transport: Arc<dyn FeedTransport>,
        url: impl Into<String>,
        panels: Arc<RwLock<NetworkPanels>>,
        status_tx: mpsc::UnboundedSender<FeedStatus>,
    ) -> Self {
        Self { transport, url: url.into(), panels, status_tx }
    }

    /// Run the reconnect loop on a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        loop {
            self.report(FeedStatus::Connecting).await;
            info!(url = %self.url, "connecting to telemetry feed");
            match self.transport.connect(&self.url).await {
                Ok(stream) => {
                    info!("telemetry feed connected");
                    self.report(FeedStatus::Connected).await;
                    self.pump(stream).await;
                }
                Err(e) => {
                    warn!(error = %e, "telemetry feed connect failed");
                    self.report(FeedStatus::Error).await;
                }
            }
            self.report(FeedStatus::Disconnected).await;
            info!(delay_secs = RECONNECT_DELAY.as_secs(), "telemetry feed closed; retrying");
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// Apply messages until the stream ends.
    async fn pump(&self, mut stream: Box<dyn FeedStream>) {
        while let Some(next) = stream.next_text().await {
            let text = match next {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "telemetry feed error");
                    self.report(FeedStatus::Error).await;
                    return;
                }
            };
            match serde_json::from_str::<TelemetryMessage>(&text) {
                Ok(msg) => {
                    self.panels.write().await.apply(&msg);
                    debug!(listening = msg.listening_count, active = msg.active_count, "telemetry applied");
                }
                Err(e) => warn!(error = %e, "malformed telemetry message skipped"),
            }
        }
    }

    async fn report(&self, status: FeedStatus) {
        self.panels.write().await.set_status(status);
        let _ = self.status_tx.send(status);
    }
}
