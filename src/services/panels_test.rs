use serde_json::json;

use super::*;

fn snapshot() -> TelemetryMessage {
    serde_json::from_value(json!({
        "upload_bps": 1500,
        "download_bps": 2_000_000,
        "total_sent": 2048,
        "total_recv": 1_572_864,
        "listening_count": 1,
        "listening_ports": [{ "port": 22, "protocol": "TCP", "type": "IPv4", "process": "sshd" }],
        "active_count": 1,
        "active_connections": [
            { "ip": "10.0.0.2", "port": "443", "protocol": "TCP", "type": "IPv4", "process": "curl" }
        ],
        "live_traffic_log": [
            { "timestamp": "12:00:01", "type": "NEW", "ip_port": "10.0.0.2:443", "protocol": "TCP", "process": "curl" }
        ]
    }))
    .unwrap()
}

// =============================================================
// Counters and totals
// =============================================================

#[test]
fn apply_formats_rates_and_totals() {
    let mut panels = NetworkPanels::new();
    panels.apply(&snapshot());

    assert_eq!(panels.upload_speed, "1.5 Kbps");
    assert_eq!(panels.download_speed, "2 Mbps");
    assert_eq!(panels.total_sent, "2 KB");
    assert_eq!(panels.total_recv, "1.5 MB");
    assert_eq!(panels.listening_count, "(1)");
    assert_eq!(panels.active_count, "(1)");
}

#[test]
fn fresh_panels_show_zeroes() {
    let panels = NetworkPanels::new();
    assert_eq!(panels.upload_speed, "0 bps");
    assert_eq!(panels.total_sent, "0 B");
    assert_eq!(panels.status, FeedStatus::Connecting);
}

// =============================================================
// Tables
// =============================================================

#[test]
fn listening_table_is_padded() {
    let mut panels = NetworkPanels::new();
    panels.apply(&snapshot());

    let expected = format!("{:<15}{:<15}Process\n{:<15}{:<15}sshd\n", "Port/Protocol", "Type", "22 (TCP)", "IPv4");
    assert_eq!(panels.listening_list, expected);
}

#[test]
fn active_table_joins_ip_and_port() {
    let mut panels = NetworkPanels::new();
    panels.apply(&snapshot());

    let mut lines = panels.active_list.lines();
    assert_eq!(lines.next(), Some(format!("{:<22}{:<10}{:<15}Process", "IP Address", "Protocol", "Type").as_str()));
    assert_eq!(lines.next(), Some(format!("{:<22}{:<10}{:<15}curl", "10.0.0.2:443", "TCP", "IPv4").as_str()));
}

#[test]
fn traffic_log_line_layout() {
    let mut panels = NetworkPanels::new();
    panels.apply(&snapshot());

    let line = panels.traffic_log.lines().next().unwrap();
    assert_eq!(line.len(), 15 + 10 + 26 + 10 + "curl".len());
    assert!(line.starts_with("12:00:01       NEW       10.0.0.2:443"));
}

#[test]
fn empty_lists_show_placeholders() {
    let mut panels = NetworkPanels::new();
    panels.apply(&TelemetryMessage::default());

    assert_eq!(panels.listening_list, NO_LISTENING_PORTS);
    assert_eq!(panels.active_list, NO_ACTIVE_CONNECTIONS);
    assert_eq!(panels.traffic_log, NO_TRAFFIC);
    assert_eq!(panels.listening_count, "(0)");
}

#[test]
fn apply_keeps_status() {
    let mut panels = NetworkPanels::new();
    panels.set_status(FeedStatus::Connected);
    panels.apply(&snapshot());
    assert_eq!(panels.status, FeedStatus::Connected);
}

// =============================================================
// FeedStatus
// =============================================================

#[test]
fn status_text_and_class() {
    let table = [
        (FeedStatus::Connecting, "Connecting...", ""),
        (FeedStatus::Connected, "Connected", "connected"),
        (FeedStatus::Disconnected, "Disconnected", "error"),
        (FeedStatus::Error, "Error", "error"),
        (FeedStatus::NoPort, "No Port", "error"),
    ];
    for (status, text, class) in table {
        assert_eq!(status.text(), text);
        assert_eq!(status.class(), class);
    }
}
