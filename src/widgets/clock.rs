//! Clock widget: 12-hour time and weekday, restyled live from settings.
//!
//! The ticker is a one-second tokio interval owned by the widget's hooks.
//! `init` starts it and `destroy` aborts it, so a hidden clock holds no
//! timer.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use dashboard::widget::{ContentDescriptor, OptionSpec, SettingKind, SettingSpec, StyleValues, WidgetHooks};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

pub const WIDGET_ID: &str = "clock";

const MARKUP: &str = "<div id=\"clock-time\"></div>\n<div id=\"clock-day\"></div>";
const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockStyle {
    pub align: String,
    pub time_color: String,
    pub day_color: String,
}

impl Default for ClockStyle {
    fn default() -> Self {
        Self { align: "right".to_owned(), time_color: "#ffffff".to_owned(), day_color: "#eaeaea".to_owned() }
    }
}

impl ClockStyle {
    /// Take every recognised, non-empty key from `values`.
    pub fn merge(&mut self, values: &StyleValues) {
        let text = |key: &str| values.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_owned);
        if let Some(align) = text("align") {
            self.align = align;
        }
        if let Some(color) = text("timeColor") {
            self.time_color = color;
        }
        if let Some(color) = text("dayColor") {
            self.day_color = color;
        }
    }

    fn from_saved(saved: &StyleValues) -> Self {
        let mut style = Self::default();
        style.merge(saved);
        style
    }
}

/// What the clock currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockFace {
    pub time: String,
    pub day: String,
    pub style: ClockStyle,
}

/// `hh:mm:ss AM|PM` and the full weekday name.
pub fn face_text<Tz>(now: &DateTime<Tz>) -> (String, String)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    (now.format("%I:%M:%S %p").to_string(), now.format("%A").to_string())
}

pub struct ClockHooks {
    face: Arc<Mutex<ClockFace>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl ClockHooks {
    #[must_use]
    pub fn new(style: ClockStyle) -> Self {
        Self { face: Arc::new(Mutex::new(ClockFace { style, ..ClockFace::default() })), ticker: Mutex::new(None) }
    }

    #[must_use]
    pub fn face(&self) -> ClockFace {
        self.face.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner).as_ref().is_some_and(|h| !h.is_finished())
    }

    fn tick(face: &Mutex<ClockFace>) {
        let (time, day) = face_text(&Local::now());
        let mut face = face.lock().unwrap_or_else(PoisonError::into_inner);
        face.time = time;
        face.day = day;
    }
}

impl WidgetHooks for ClockHooks {
    fn init(&self) {
        Self::tick(&self.face);
        let Ok(runtime) = Handle::try_current() else {
            debug!("no runtime; clock will not tick");
            return;
        };
        let face = self.face.clone();
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            interval.tick().await;
            loop {
                interval.tick().await;
                Self::tick(&face);
            }
        });
        if let Some(old) = self.ticker.lock().unwrap_or_else(PoisonError::into_inner).replace(handle) {
            old.abort();
        }
    }

    fn destroy(&self) {
        if let Some(handle) = self.ticker.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }

    fn update_style(&self, values: &StyleValues) {
        self.face.lock().unwrap_or_else(PoisonError::into_inner).style.merge(values);
        Self::tick(&self.face);
    }
}

fn editable_settings(style: &ClockStyle) -> Vec<SettingSpec> {
    vec![
        SettingSpec::new("align", "Alignment", SettingKind::Select, style.align.as_str()).with_options(vec![
            OptionSpec::new("left", "Left"),
            OptionSpec::new("center", "Center"),
            OptionSpec::new("right", "Right"),
        ]),
        SettingSpec::new("timeColor", "Time Color", SettingKind::Color, style.time_color.as_str()),
        SettingSpec::new("dayColor", "Day Color", SettingKind::Color, style.day_color.as_str()),
    ]
}

/// Clock provider.
pub fn content(saved: &StyleValues) -> ContentDescriptor {
    let style = ClockStyle::from_saved(saved);
    ContentDescriptor::new(WIDGET_ID, MARKUP)
        .with_editable_settings(editable_settings(&style))
        .with_hooks(ClockHooks::new(style))
}
