//! Per-widget style settings documents.
//!
//! The core never interprets these values. Each widget's settings schema
//! gives them meaning; the engine only reads the saved values into the
//! settings editor and writes the gathered values back under the widget id.

#[cfg(test)]
#[path = "styles_test.rs"]
mod styles_test;

use std::collections::BTreeMap;

use crate::widget::{SettingSpec, StyleValues};

/// Widget id to saved settings values.
pub type StyleSettingsMap = BTreeMap<String, StyleValues>;

/// Saved values for `widget_id`, or an empty map.
#[must_use]
pub fn saved_for(styles: &StyleSettingsMap, widget_id: &str) -> StyleValues {
    styles.get(widget_id).cloned().unwrap_or_default()
}

/// Current value of one setting: the saved value when present, else the
/// declared default.
#[must_use]
pub fn value_for(saved: &StyleValues, spec: &SettingSpec) -> serde_json::Value {
    saved.get(&spec.key).cloned().unwrap_or_else(|| spec.value.clone())
}

/// Replace the values stored for `widget_id`.
pub fn store(styles: &mut StyleSettingsMap, widget_id: &str, values: StyleValues) {
    styles.insert(widget_id.to_owned(), values);
}
