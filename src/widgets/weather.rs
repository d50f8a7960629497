//! Weather widget backed by the Open-Meteo current-weather API.
//!
//! DESIGN
//! ======
//! `init` starts a refresh task that fetches immediately and then every
//! [`REFRESH_INTERVAL`]. While the reported weather code is a snow code, a
//! second task spawns a snowflake every [`SNOW_SPAWN_INTERVAL`]; each flake
//! lives for [`SNOWFLAKE_LIFETIME`]. `destroy` aborts both tasks and clears
//! the flakes.
//!
//! The HTTP call sits behind [`WeatherSource`] so tests can serve canned
//! forecasts.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch sets the condition line to `Error Loading` and keeps the
//! refresh task running.

#[cfg(test)]
#[path = "weather_test.rs"]
mod weather_test;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use dashboard::widget::{
    ContentDescriptor, OptionSpec, SettingKind, SettingSpec, StyleValues, WidgetHooks, WidgetProvider, WidgetSettings,
};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::ShellError;

pub const WIDGET_ID: &str = "weather";

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(900);
pub const SNOW_SPAWN_INTERVAL: Duration = Duration::from_millis(200);
pub const SNOWFLAKE_LIFETIME: Duration = Duration::from_secs(5);

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,weather_code,wind_speed_10m";
const FETCH_ERROR_TEXT: &str = "Error Loading";
const MIN_SIZE: &str = "320px";

// ── Config ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    /// `celsius` or `fahrenheit`.
    pub units: String,
    pub show_location: bool,
    pub show_date: bool,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            lat: 40.7128,
            lon: -74.0060,
            city: "New York".to_owned(),
            units: "celsius".to_owned(),
            show_location: true,
            show_date: true,
        }
    }
}

/// Coordinates are edited as text but may also be stored as numbers.
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl WeatherConfig {
    /// Take every recognised, non-empty key from `values`.
    pub fn merge(&mut self, values: &StyleValues) {
        let text = |key: &str| values.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
        if let Some(city) = text("city") {
            self.city = city.to_owned();
        }
        if let Some(lat) = values.get("lat").and_then(coordinate) {
            self.lat = lat;
        }
        if let Some(lon) = values.get("lon").and_then(coordinate) {
            self.lon = lon;
        }
        if let Some(units) = text("units") {
            self.units = units.to_owned();
        }
        if let Some(show) = text("showLocation") {
            self.show_location = show != "hide";
        }
        if let Some(show) = text("showDate") {
            self.show_date = show != "hide";
        }
    }

    fn temperature_unit(&self) -> &'static str {
        if self.units == "fahrenheit" { "fahrenheit" } else { "celsius" }
    }

    fn default_symbol(&self) -> &'static str {
        if self.units == "fahrenheit" { "°F" } else { "°C" }
    }

    #[must_use]
    pub fn forecast_url(&self) -> String {
        format!(
            "{FORECAST_URL}?latitude={}&longitude={}&current={CURRENT_FIELDS}&temperature_unit={}&timezone=auto",
            self.lat,
            self.lon,
            self.temperature_unit()
        )
    }
}

fn show_hide(show: bool) -> &'static str {
    if show { "show" } else { "hide" }
}

// ── Forecast ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub temperature_2m: f64,
    #[serde(default)]
    pub relative_humidity_2m: f64,
    #[serde(default)]
    pub apparent_temperature: f64,
    #[serde(default)]
    pub wind_speed_10m: f64,
    #[serde(default)]
    pub weather_code: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentUnits {
    #[serde(default)]
    pub temperature_2m: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Forecast {
    pub current: CurrentWeather,
    #[serde(default)]
    pub current_units: CurrentUnits,
}

/// Condition text for a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub text: &'static str,
    pub snow: bool,
}

#[must_use]
pub fn describe(code: i64) -> Condition {
    let (text, snow) = match code {
        0 => ("Clear Sky", false),
        1..=3 => ("Partly Cloudy", false),
        45..=48 => ("Foggy", false),
        51..=55 => ("Drizzle", false),
        61..=67 => ("Rain", false),
        71..=77 => ("Snowfall", true),
        80..=82 => ("Showers", false),
        85..=86 => ("Snow Showers", true),
        95.. => ("Thunderstorm", false),
        _ => ("Unknown", false),
    };
    Condition { text, snow }
}

/// Fetches current weather for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, config: &WeatherConfig) -> Result<Forecast, ShellError>;
}

/// Live Open-Meteo client.
pub struct OpenMeteo {
    http: reqwest::Client,
}

impl OpenMeteo {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteo {
    async fn current(&self, config: &WeatherConfig) -> Result<Forecast, ShellError> {
        let url = config.forecast_url();
        let response = self.http.get(&url).send().await.map_err(|e| ShellError::fetch(FORECAST_URL, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ShellError::fetch(FORECAST_URL, format!("status {}", status.as_u16())));
        }
        response.json::<Forecast>().await.map_err(|e| ShellError::parse("forecast", e))
    }
}

// ── View ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    /// Horizontal position, percent of the widget width.
    pub left_pct: f64,
    pub fall_secs: f64,
    pub size_px: f64,
    born: Instant,
}

/// What the weather widget currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub city: String,
    pub date: String,
    pub temp: String,
    pub condition: String,
    pub wind: String,
    pub humidity: String,
    pub feel: String,
    pub show_location: bool,
    pub show_date: bool,
    pub snowflakes: VecDeque<Snowflake>,
}

impl WeatherView {
    fn new(config: &WeatherConfig) -> Self {
        Self {
            city: "Loading...".to_owned(),
            date: String::new(),
            temp: "--".to_owned(),
            condition: "Fetching...".to_owned(),
            wind: "--".to_owned(),
            humidity: "--".to_owned(),
            feel: "--".to_owned(),
            show_location: config.show_location,
            show_date: config.show_date,
            snowflakes: VecDeque::new(),
        }
    }

    /// Fill the readings from a forecast. Returns the condition.
    pub fn apply(&mut self, forecast: &Forecast, config: &WeatherConfig) -> Condition {
        let current = &forecast.current;
        let symbol = forecast.current_units.temperature_2m.as_deref().unwrap_or_else(|| config.default_symbol());
        self.city.clone_from(&config.city);
        self.temp = format!("{}{symbol}", current.temperature_2m.round());
        self.wind = format!("{} km/h", current.wind_speed_10m);
        self.humidity = format!("{}%", current.relative_humidity_2m);
        self.feel = format!("{}{symbol}", current.apparent_temperature.round());
        let condition = describe(current.weather_code);
        self.condition = condition.text.to_owned();
        condition
    }
}

// ── Hooks ───────────────────────────────────────────────────────

struct Shared {
    source: Arc<dyn WeatherSource>,
    config: Mutex<WeatherConfig>,
    view: Mutex<WeatherView>,
    snow: Mutex<Option<JoinHandle<()>>>,
    /// Set by `init`, cleared by `destroy`. Snow only starts while set.
    mounted: AtomicBool,
}

impl Shared {
    fn config(&self) -> WeatherConfig {
        self.config.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn view(&self) -> std::sync::MutexGuard<'_, WeatherView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_date(&self) {
        self.view().date = Local::now().format("%a, %b %-d").to_string();
    }

    async fn refresh(self: &Arc<Self>) {
        let config = self.config();
        match self.source.current(&config).await {
            Ok(forecast) => {
                let condition = self.view().apply(&forecast, &config);
                debug!(city = %config.city, condition = condition.text, "weather refreshed");
                if condition.snow {
                    self.start_snow();
                } else {
                    self.stop_snow();
                }
            }
            Err(e) => {
                warn!(error = %e, "weather fetch failed");
                self.view().condition = FETCH_ERROR_TEXT.to_owned();
            }
        }
    }

    fn start_snow(self: &Arc<Self>) {
        let mut slot = self.snow.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() || !self.mounted.load(Ordering::SeqCst) {
            return;
        }
        let shared = self.clone();
        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(SNOW_SPAWN_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                shared.spawn_flake();
            }
        }));
    }

    fn spawn_flake(&self) {
        let now = Instant::now();
        let flake = {
            let mut rng = rand::rng();
            Snowflake {
                left_pct: rng.random_range(0.0..100.0),
                fall_secs: rng.random_range(2.0..5.0),
                size_px: rng.random_range(2.0..6.0),
                born: now,
            }
        };
        let mut view = self.view();
        while view.snowflakes.front().is_some_and(|f| now.duration_since(f.born) >= SNOWFLAKE_LIFETIME) {
            view.snowflakes.pop_front();
        }
        view.snowflakes.push_back(flake);
    }

    fn stop_snow(&self) {
        if let Some(handle) = self.snow.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
        self.view().snowflakes.clear();
    }
}

pub struct WeatherHooks {
    shared: Arc<Shared>,
    refresh: Mutex<Option<JoinHandle<()>>>,
    /// One-shot refetch started by `update_style`.
    restyle: Mutex<Option<JoinHandle<()>>>,
}

impl WeatherHooks {
    #[must_use]
    pub fn new(source: Arc<dyn WeatherSource>, config: WeatherConfig) -> Self {
        let view = WeatherView::new(&config);
        Self {
            shared: Arc::new(Shared {
                source,
                config: Mutex::new(config),
                view: Mutex::new(view),
                snow: Mutex::new(None),
                mounted: AtomicBool::new(false),
            }),
            refresh: Mutex::new(None),
            restyle: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn view(&self) -> WeatherView {
        self.shared.view().clone()
    }

    #[must_use]
    pub fn config(&self) -> WeatherConfig {
        self.shared.config()
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh.lock().unwrap_or_else(PoisonError::into_inner).as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn is_snowing(&self) -> bool {
        self.shared.snow.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl WidgetHooks for WeatherHooks {
    fn init(&self) {
        self.shared.mounted.store(true, Ordering::SeqCst);
        self.shared.update_date();
        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime; weather will not refresh");
            return;
        };
        let shared = self.shared.clone();
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(REFRESH_INTERVAL);
            loop {
                interval.tick().await;
                shared.refresh().await;
            }
        });
        if let Some(old) = self.refresh.lock().unwrap_or_else(PoisonError::into_inner).replace(handle) {
            old.abort();
        }
    }

    fn destroy(&self) {
        self.shared.mounted.store(false, Ordering::SeqCst);
        for slot in [&self.refresh, &self.restyle] {
            if let Some(handle) = slot.lock().unwrap_or_else(PoisonError::into_inner).take() {
                handle.abort();
            }
        }
        self.shared.stop_snow();
    }

    fn update_style(&self, values: &StyleValues) {
        let config = {
            let mut config = self.shared.config.lock().unwrap_or_else(PoisonError::into_inner);
            config.merge(values);
            config.clone()
        };
        {
            let mut view = self.shared.view();
            view.city.clone_from(&config.city);
            view.show_location = config.show_location;
            view.show_date = config.show_date;
        }
        if let Ok(runtime) = Handle::try_current() {
            let shared = self.shared.clone();
            let handle = runtime.spawn(async move { shared.refresh().await });
            if let Some(old) = self.restyle.lock().unwrap_or_else(PoisonError::into_inner).replace(handle) {
                old.abort();
            }
        }
    }
}

// ── Provider ────────────────────────────────────────────────────

fn markup(config: &WeatherConfig) -> String {
    let location = if config.show_location { "flex" } else { "none" };
    let date = if config.show_date { "block" } else { "none" };
    format!(
        concat!(
            "<div class=\"weather-content\">\n",
            "<div id=\"weather-snow-container\"></div>\n",
            "<div class=\"weather-top\">\n",
            "<div class=\"weather-location\" style=\"display: {location}\"><span id=\"weather-city\">Loading...</span></div>\n",
            "<div class=\"weather-date\" id=\"weather-date\" style=\"display: {date}\"></div>\n",
            "</div>\n",
            "<div class=\"weather-main\">\n",
            "<h1 class=\"weather-temp\" id=\"weather-temp\">--</h1>\n",
            "<p class=\"weather-condition\" id=\"weather-condition\">Fetching...</p>\n",
            "</div>\n",
            "<div class=\"weather-details\">\n",
            "<div class=\"weather-detail\"><span class=\"weather-label\">Wind</span><span class=\"weather-value\" id=\"weather-wind\">--</span></div>\n",
            "<div class=\"weather-detail\"><span class=\"weather-label\">Humidity</span><span class=\"weather-value\" id=\"weather-humidity\">--</span></div>\n",
            "<div class=\"weather-detail\"><span class=\"weather-label\">Feels</span><span class=\"weather-value\" id=\"weather-feel\">--</span></div>\n",
            "</div>\n",
            "</div>",
        ),
        location = location,
        date = date,
    )
}

fn show_options() -> Vec<OptionSpec> {
    vec![OptionSpec::new("show", "Show"), OptionSpec::new("hide", "Hide")]
}

fn editable_settings(config: &WeatherConfig) -> Vec<SettingSpec> {
    vec![
        SettingSpec::new("city", "City Name", SettingKind::String, config.city.as_str()),
        SettingSpec::new("lat", "Latitude", SettingKind::String, config.lat.to_string()),
        SettingSpec::new("lon", "Longitude", SettingKind::String, config.lon.to_string()),
        SettingSpec::new("units", "Units", SettingKind::Select, config.units.as_str()).with_options(vec![
            OptionSpec::new("celsius", "Celsius (°C)"),
            OptionSpec::new("fahrenheit", "Fahrenheit (°F)"),
        ]),
        SettingSpec::new("showLocation", "Show Location", SettingKind::Select, show_hide(config.show_location))
            .with_options(show_options()),
        SettingSpec::new("showDate", "Show Date", SettingKind::Select, show_hide(config.show_date))
            .with_options(show_options()),
    ]
}

/// Weather provider bound to a forecast source.
pub struct WeatherProvider {
    source: Arc<dyn WeatherSource>,
}

impl WeatherProvider {
    #[must_use]
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }
}

impl WidgetProvider for WeatherProvider {
    fn content(&self, saved: &StyleValues) -> ContentDescriptor {
        let mut config = WeatherConfig::default();
        config.merge(saved);
        ContentDescriptor::new(WIDGET_ID, markup(&config))
            .with_settings(WidgetSettings { min_width: Some(MIN_SIZE.to_owned()), min_height: Some(MIN_SIZE.to_owned()) })
            .with_editable_settings(editable_settings(&config))
            .with_hooks(WeatherHooks::new(self.source.clone(), config))
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{CurrentUnits, CurrentWeather, Forecast, WeatherConfig, WeatherSource};
    use crate::error::ShellError;

    /// Serves one fixed forecast, or fails every call.
    pub(crate) struct CannedSource {
        forecast: Option<Forecast>,
        calls: AtomicUsize,
        last_config: Mutex<Option<WeatherConfig>>,
    }

    impl CannedSource {
        pub(crate) fn with_code(code: i64) -> Self {
            let forecast = Forecast {
                current: CurrentWeather {
                    temperature_2m: 21.6,
                    relative_humidity_2m: 65.0,
                    apparent_temperature: 20.2,
                    wind_speed_10m: 12.5,
                    weather_code: code,
                },
                current_units: CurrentUnits { temperature_2m: Some("°C".to_owned()) },
            };
            Self { forecast: Some(forecast), calls: AtomicUsize::new(0), last_config: Mutex::new(None) }
        }

        pub(crate) fn clear() -> Self {
            Self::with_code(0)
        }

        pub(crate) fn failing() -> Self {
            Self { forecast: None, calls: AtomicUsize::new(0), last_config: Mutex::new(None) }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_config(&self) -> Option<WeatherConfig> {
            self.last_config.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherSource for CannedSource {
        async fn current(&self, config: &WeatherConfig) -> Result<Forecast, ShellError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_config.lock().unwrap() = Some(config.clone());
            self.forecast.clone().ok_or_else(|| ShellError::fetch("https://api.open-meteo.com", "status 503"))
        }
    }
}
