//! Settings editor: a form generated from a widget's settings schema.
//!
//! DESIGN
//! ======
//! The editor keeps the raw text of every field, as a form would. Typed
//! values are produced only when the form is applied: `integer` fields parse
//! as whole numbers (fractions truncate), `slider` fields parse as numbers
//! and are emitted as integers when integral, every other kind is kept as
//! the raw string. Numeric text that does not parse falls back to the
//! field's declared value, so applying never writes garbage into the style
//! document.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde_json::Value;

use crate::styles::value_for;
use crate::widget::{OptionSpec, SettingKind, SettingSpec, StyleValues};

/// Slider range used when the schema omits one.
const DEFAULT_RANGE: (f64, f64) = (0.0, 100.0);

/// Input control rendered for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text,
    Number,
    /// Range slider with a live percentage label.
    Range { min: f64, max: f64 },
    Color,
    Select { options: Vec<OptionSpec> },
}

impl FieldInput {
    fn for_spec(spec: &SettingSpec) -> Self {
        match spec.kind {
            SettingKind::String => Self::Text,
            SettingKind::Integer => Self::Number,
            SettingKind::Slider => Self::Range {
                min: spec.min.unwrap_or(DEFAULT_RANGE.0),
                max: spec.max.unwrap_or(DEFAULT_RANGE.1),
            },
            SettingKind::Color => Self::Color,
            SettingKind::Select => Self::Select { options: spec.options.clone() },
        }
    }
}

/// One labelled form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub spec: SettingSpec,
    pub input: FieldInput,
    /// Current text of the control.
    pub raw: String,
}

impl FormField {
    fn new(spec: &SettingSpec, saved: &StyleValues) -> Self {
        Self { input: FieldInput::for_spec(spec), raw: display(&value_for(saved, spec)), spec: spec.clone() }
    }

    /// Live `NN%` label of a range slider; `None` for other inputs.
    #[must_use]
    pub fn percent_label(&self) -> Option<String> {
        let FieldInput::Range { min, max } = self.input else {
            return None;
        };
        let value = parse_finite(&self.raw).unwrap_or(min);
        Some(format!("{}%", percent(value, min, max)))
    }

    /// Typed value of this field.
    #[must_use]
    pub fn value(&self) -> Value {
        match self.spec.kind {
            SettingKind::Integer => parse_integer(&self.raw).map_or_else(|| self.spec.value.clone(), Value::from),
            SettingKind::Slider => parse_number(&self.raw).unwrap_or_else(|| self.spec.value.clone()),
            SettingKind::String | SettingKind::Color | SettingKind::Select => Value::String(self.raw.clone()),
        }
    }
}

/// Open settings form for one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsEditor {
    pub widget_id: String,
    pub container_id: String,
    pub fields: Vec<FormField>,
}

impl SettingsEditor {
    /// One field per setting, pre-filled from `saved` or the declared default.
    #[must_use]
    pub fn open(widget_id: &str, container_id: &str, specs: &[SettingSpec], saved: &StyleValues) -> Self {
        Self {
            widget_id: widget_id.to_owned(),
            container_id: container_id.to_owned(),
            fields: specs.iter().map(|spec| FormField::new(spec, saved)).collect(),
        }
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.key == key)
    }

    /// Replace the text of field `key`. Returns `false` for unknown keys.
    pub fn set_input(&mut self, key: &str, raw: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.spec.key == key) {
            Some(field) => {
                field.raw = raw.to_owned();
                true
            }
            None => false,
        }
    }

    /// Gathered typed values keyed by setting key.
    #[must_use]
    pub fn values(&self) -> StyleValues {
        self.fields.iter().map(|f| (f.spec.key.clone(), f.value())).collect()
    }
}

/// Form text for a stored value.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    let n = parse_finite(trimmed)?;
    Some(n.trunc() as i64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn parse_number(raw: &str) -> Option<Value> {
    let n = parse_finite(raw)?;
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Some(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n).map(Value::Number)
}

#[allow(clippy::cast_possible_truncation)]
fn percent(value: f64, min: f64, max: f64) -> i64 {
    let span = max - min;
    if span <= 0.0 {
        return 0;
    }
    ((value - min) / span * 100.0).round() as i64
}
