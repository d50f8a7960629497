//! Feature flags and app config read at startup.
//!
//! The flag document gates the telemetry panels and the push feed; the app
//! config supplies the feed port. Both are read once.

#[cfg(test)]
#[path = "flags_test.rs"]
mod flags_test;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{APP_CONFIG_PATH, FLAGS_PATH};
use crate::net::Backend;

/// Container ids of the telemetry panels.
pub const TELEMETRY_CONTAINERS: [&str; 4] = ["traffic-data", "listening-ports", "live-traffic-log", "active-connections"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FeatureFlags {
    #[serde(rename = "Enable_Global_Widget", default)]
    pub global_widget: bool,
    /// Older name of the same switch.
    #[serde(rename = "Enable_Network_Widget", default)]
    pub network_widget: bool,
}

impl FeatureFlags {
    /// Either switch enables the telemetry panels.
    #[must_use]
    pub fn telemetry_enabled(&self) -> bool {
        self.global_widget || self.network_widget
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AppConfig {
    #[serde(default)]
    ws_port: Option<u16>,
}

/// Read the flag document. `None` when it cannot be read, in which case the
/// caller leaves the panels alone and starts no feed.
pub async fn load_flags(backend: &dyn Backend) -> Option<FeatureFlags> {
    let value = match backend.get_json(FLAGS_PATH).await {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "feature flags unavailable");
            return None;
        }
    };
    match serde_json::from_value::<FeatureFlags>(value) {
        Ok(flags) => {
            info!(telemetry = flags.telemetry_enabled(), "feature flags loaded");
            Some(flags)
        }
        Err(e) => {
            warn!(error = %e, "feature flags malformed");
            None
        }
    }
}

/// Read the push feed port. A missing, zero or unreadable port is `None`.
pub async fn load_feed_port(backend: &dyn Backend) -> Option<u16> {
    let config = match backend.get_json(APP_CONFIG_PATH).await {
        Ok(value) => serde_json::from_value::<AppConfig>(value).unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "app config unavailable");
            AppConfig::default()
        }
    };
    let port = config.ws_port.filter(|p| *p != 0);
    if port.is_none() {
        warn!("could not get ws_port from app config");
    }
    port
}
