//! Telemetry panel model fed by the push feed.
//!
//! DESIGN
//! ======
//! Each feed message is a full snapshot, so [`NetworkPanels::apply`]
//! rewrites every display field from it. Lists are fixed-width text tables
//! (left-aligned, space padded) so they line up in a monospace panel.

#[cfg(test)]
#[path = "panels_test.rs"]
mod panels_test;

use std::fmt::Write as _;

use dashboard::format::{format_bits, format_bytes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_LISTENING_PORTS: &str = "No listening ports found.";
pub const NO_ACTIVE_CONNECTIONS: &str = "No established connections found.";
pub const NO_TRAFFIC: &str = "Monitoring for new connections...";

// ── Feed messages ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListeningPort {
    #[serde(default)]
    pub port: Value,
    #[serde(default)]
    pub protocol: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub process: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActiveConnection {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub port: Value,
    #[serde(default)]
    pub protocol: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub process: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrafficEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub ip_port: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub process: String,
}

/// One snapshot pushed by the telemetry feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TelemetryMessage {
    #[serde(default)]
    pub upload_bps: f64,
    #[serde(default)]
    pub download_bps: f64,
    #[serde(default)]
    pub total_sent: f64,
    #[serde(default)]
    pub total_recv: f64,
    #[serde(default)]
    pub listening_count: u64,
    #[serde(default)]
    pub listening_ports: Vec<ListeningPort>,
    #[serde(default)]
    pub active_count: u64,
    #[serde(default)]
    pub active_connections: Vec<ActiveConnection>,
    /// Oldest first.
    #[serde(default)]
    pub live_traffic_log: Vec<TrafficEntry>,
}

// ── Connection indicator ────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FeedStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
    Error,
    /// The app config carries no feed port.
    NoPort,
}

impl FeedStatus {
    /// Indicator text.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
            Self::Error => "Error",
            Self::NoPort => "No Port",
        }
    }

    /// Indicator CSS class.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Connecting => "",
            Self::Connected => "connected",
            Self::Disconnected | Self::Error | Self::NoPort => "error",
        }
    }
}

// ── Panels ──────────────────────────────────────────────────────

/// Display fields of the four telemetry panels plus the indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkPanels {
    pub upload_speed: String,
    pub download_speed: String,
    pub total_sent: String,
    pub total_recv: String,
    pub listening_count: String,
    pub listening_list: String,
    pub active_count: String,
    pub active_list: String,
    pub traffic_log: String,
    pub status: FeedStatus,
}

impl Default for NetworkPanels {
    fn default() -> Self {
        Self {
            upload_speed: format_bits(0.0, true),
            download_speed: format_bits(0.0, true),
            total_sent: format_bytes(0.0),
            total_recv: format_bytes(0.0),
            listening_count: "(0)".to_owned(),
            listening_list: String::new(),
            active_count: "(0)".to_owned(),
            active_list: String::new(),
            traffic_log: String::new(),
            status: FeedStatus::Connecting,
        }
    }
}

impl NetworkPanels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite every display field from a snapshot. The status is untouched.
    pub fn apply(&mut self, msg: &TelemetryMessage) {
        self.upload_speed = format_bits(msg.upload_bps, true);
        self.download_speed = format_bits(msg.download_bps, true);
        self.total_sent = format_bytes(msg.total_sent);
        self.total_recv = format_bytes(msg.total_recv);
        self.listening_count = format!("({})", msg.listening_count);
        self.listening_list = listening_table(&msg.listening_ports);
        self.active_count = format!("({})", msg.active_count);
        self.active_list = active_table(&msg.active_connections);
        self.traffic_log = traffic_lines(&msg.live_traffic_log);
    }

    pub fn set_status(&mut self, status: FeedStatus) {
        self.status = status;
    }
}

/// Ports arrive as numbers or strings; render either bare.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn listening_table(ports: &[ListeningPort]) -> String {
    if ports.is_empty() {
        return NO_LISTENING_PORTS.to_owned();
    }
    let mut out = format!("{:<15}{:<15}Process\n", "Port/Protocol", "Type");
    for item in ports {
        let port = format!("{} ({})", plain(&item.port), item.protocol);
        let _ = writeln!(out, "{port:<15}{:<15}{}", item.kind, item.process);
    }
    out
}

fn active_table(connections: &[ActiveConnection]) -> String {
    if connections.is_empty() {
        return NO_ACTIVE_CONNECTIONS.to_owned();
    }
    let mut out = format!("{:<22}{:<10}{:<15}Process\n", "IP Address", "Protocol", "Type");
    for item in connections {
        let ip = format!("{}:{}", item.ip, plain(&item.port));
        let _ = writeln!(out, "{ip:<22}{:<10}{:<15}{}", item.protocol, item.kind, item.process);
    }
    out
}

fn traffic_lines(entries: &[TrafficEntry]) -> String {
    if entries.is_empty() {
        return NO_TRAFFIC.to_owned();
    }
    let mut out = String::new();
    for item in entries {
        let _ = writeln!(
            out,
            "{:<15}{:<10}{:<26}{:<10}{}",
            item.timestamp, item.kind, item.ip_port, item.protocol, item.process
        );
    }
    out
}
