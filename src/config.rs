//! Shell configuration parsed from environment variables.
//!
//! Every value has a default so the shell starts against a local backend
//! with no configuration at all. Endpoint paths are fixed by the backend and
//! are joined onto `WALLBOARD_BASE_URL`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use dashboard::geometry::Size;

pub const DEFAULT_BASE_URL: &str = "http://localhost:60600";
pub const DEFAULT_FEED_HOST: &str = "localhost";
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1920.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 1080.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ── Endpoints ───────────────────────────────────────────────────

pub const REGISTRY_PATH: &str = "/widgets/registry.json";
pub const WIDGETS_ROOT: &str = "/widgets";
pub const LAYOUT_PATH: &str = "/widget.json";
pub const LAYOUT_SAVE_PATH: &str = "/save_widget_positions";
pub const VISIBILITY_PATH: &str = "/widget_visibility.json";
pub const VISIBILITY_SAVE_PATH: &str = "/save_widget_visibility";
pub const STYLES_PATH: &str = "/widget_styles.json";
pub const STYLES_SAVE_PATH: &str = "/save_widget_styles";
pub const FLAGS_PATH: &str = "/config";
pub const APP_CONFIG_PATH: &str = "/app_config.json";

/// Runtime configuration of the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    /// Backend origin, without a trailing slash.
    pub base_url: String,
    /// Sent as the `User-Agent` header; the backend checks it on secured
    /// endpoints.
    pub auth_token: Option<String>,
    /// Host of the telemetry push feed. The port comes from the app config.
    pub feed_host: String,
    pub viewport: Size,
    pub request_timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            auth_token: None,
            feed_host: DEFAULT_FEED_HOST.to_owned(),
            viewport: Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ShellConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `WALLBOARD_BASE_URL`: default `http://localhost:60600`
    /// - `WALLBOARD_AUTH_TOKEN`: no header override when absent
    /// - `WALLBOARD_FEED_HOST`: default `localhost`
    /// - `WALLBOARD_VIEWPORT_WIDTH` / `WALLBOARD_VIEWPORT_HEIGHT`: default 1920x1080
    /// - `WALLBOARD_REQUEST_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Self {
        let base_url = std::env::var("WALLBOARD_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let auth_token = std::env::var("WALLBOARD_AUTH_TOKEN").ok().filter(|t| !t.is_empty());
        let feed_host = std::env::var("WALLBOARD_FEED_HOST").unwrap_or_else(|_| DEFAULT_FEED_HOST.to_owned());
        let viewport = Size::new(
            env_parse("WALLBOARD_VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH),
            env_parse("WALLBOARD_VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT),
        );
        let request_timeout_secs = env_parse("WALLBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS);
        Self { base_url, auth_token, feed_host, viewport, request_timeout_secs }
    }

    /// Absolute URL of a backend path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Push feed URL for `port`.
    #[must_use]
    pub fn feed_url(&self, port: u16) -> String {
        format!("ws://{}:{port}", self.feed_host)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
