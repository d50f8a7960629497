//! Widget content contract and provider registration.
//!
//! A widget module contributes a [`WidgetProvider`] under its registry id.
//! When loaded, the provider produces a [`ContentDescriptor`]: markup, size
//! constraints, an optional settings schema, and lifecycle hooks. The engine
//! reads a descriptor once per mount and never inspects widget-internal state.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Settings values keyed by `SettingSpec::key`.
pub type StyleValues = serde_json::Map<String, serde_json::Value>;

/// Size bounds a widget declares for its container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    /// CSS `min-width` applied inline to the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<String>,
    /// CSS `min-height` applied inline to the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
}

/// Input type of one editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    String,
    Integer,
    Slider,
    Color,
    Select,
}

/// One choice of a `select` setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub value: String,
    pub label: String,
}

impl OptionSpec {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

/// Declarative description of one editable setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingSpec {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SettingKind,
    /// Default value used when nothing has been saved.
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
}

impl SettingSpec {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: SettingKind,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self { key: key.into(), label: label.into(), kind, value: value.into(), min: None, max: None, options: Vec::new() }
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<OptionSpec>) -> Self {
        self.options = options;
        self
    }
}

/// Lifecycle hooks a widget may implement. Every hook defaults to a no-op.
///
/// `destroy` must release every timer and listener the widget started in
/// `init`; the render engine routes all teardown through it.
pub trait WidgetHooks: Send + Sync {
    fn init(&self) {}
    fn destroy(&self) {}
    /// Immediately restyle the widget with new settings values.
    fn update_style(&self, _values: &StyleValues) {}
}

struct NoHooks;

impl WidgetHooks for NoHooks {}

/// What a widget module hands to the engine.
pub struct ContentDescriptor {
    pub id: String,
    pub html: String,
    pub settings: WidgetSettings,
    pub editable_settings: Vec<SettingSpec>,
    hooks: Box<dyn WidgetHooks>,
}

impl ContentDescriptor {
    /// A descriptor with markup only and no-op hooks.
    #[must_use]
    pub fn new(id: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: html.into(),
            settings: WidgetSettings::default(),
            editable_settings: Vec::new(),
            hooks: Box::new(NoHooks),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: WidgetSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_editable_settings(mut self, specs: Vec<SettingSpec>) -> Self {
        self.editable_settings = specs;
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: impl WidgetHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Whether the widget declared a non-empty settings schema.
    #[must_use]
    pub fn has_settings(&self) -> bool {
        !self.editable_settings.is_empty()
    }

    pub fn init(&self) {
        self.hooks.init();
    }

    pub fn destroy(&self) {
        self.hooks.destroy();
    }

    pub fn update_style(&self, values: &StyleValues) {
        self.hooks.update_style(values);
    }
}

impl fmt::Debug for ContentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDescriptor")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .field("editable_settings", &self.editable_settings.len())
            .finish_non_exhaustive()
    }
}

/// Produces a widget's content descriptor.
///
/// `saved` holds the widget's persisted style settings (empty when none were
/// saved) so the descriptor can reflect them from the first render.
pub trait WidgetProvider: Send + Sync {
    fn content(&self, saved: &StyleValues) -> ContentDescriptor;
}

impl<F> WidgetProvider for F
where
    F: Fn(&StyleValues) -> ContentDescriptor + Send + Sync,
{
    fn content(&self, saved: &StyleValues) -> ContentDescriptor {
        self(saved)
    }
}

/// Central map from widget id to its provider.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn WidgetProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Returns `true` when it replaced an earlier one.
    pub fn register(&mut self, widget_id: impl Into<String>, provider: impl WidgetProvider + 'static) -> bool {
        self.providers.insert(widget_id.into(), Arc::new(provider)).is_some()
    }

    #[must_use]
    pub fn get(&self, widget_id: &str) -> Option<Arc<dyn WidgetProvider>> {
        self.providers.get(widget_id).cloned()
    }

    #[must_use]
    pub fn contains(&self, widget_id: &str) -> bool {
        self.providers.contains_key(widget_id)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry").field("ids", &self.ids()).finish()
    }
}
