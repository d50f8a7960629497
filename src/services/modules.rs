//! Widget module loader.
//!
//! DESIGN
//! ======
//! Loading a module means: make sure the folder's stylesheet and script tags
//! exist in the document head (once each), wait for the script asset to
//! arrive, then ask the provider registered under the widget id for its
//! content descriptor. Descriptors are cached per widget id, so a second
//! load returns the same instance without touching the head or the network.
//!
//! ERROR HANDLING
//! ==============
//! A script that cannot be fetched marks the entry `missing` (pruned by the
//! caller). A widget without a registered provider marks the entry `error`
//! with a message shown in the visibility list. Both are returned as
//! `ShellError::ModuleLoad` and neither stops the other widgets loading.

#[cfg(test)]
#[path = "modules_test.rs"]
mod modules_test;

use std::collections::HashMap;
use std::sync::Arc;

use dashboard::dom::{AssetKind, Document};
use dashboard::registry::RegistryEntry;
use dashboard::widget::{ContentDescriptor, ProviderRegistry, StyleValues};
use tracing::{debug, warn};

use crate::error::ShellError;
use crate::net::Backend;

pub struct ModuleLoader {
    widgets_root: String,
    providers: ProviderRegistry,
    cache: HashMap<String, Arc<ContentDescriptor>>,
}

impl ModuleLoader {
    #[must_use]
    pub fn new(widgets_root: impl Into<String>, providers: ProviderRegistry) -> Self {
        Self { widgets_root: widgets_root.into(), providers, cache: HashMap::new() }
    }

    fn asset_path(&self, folder: &str, file: &str) -> String {
        format!("{}/{folder}/{file}", self.widgets_root)
    }

    /// Load one registry entry and advance its status.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ModuleLoad`] when the script asset cannot be
    /// fetched (entry becomes `missing`) or no provider is registered for
    /// the widget id (entry becomes `error`).
    pub async fn load(
        &mut self,
        backend: &dyn Backend,
        doc: &mut Document,
        entry: &mut RegistryEntry,
        saved: &StyleValues,
    ) -> Result<Arc<ContentDescriptor>, ShellError> {
        if let Some(cached) = self.cache.get(&entry.id) {
            debug!(widget = %entry.id, "module already loaded");
            return Ok(cached.clone());
        }

        let stylesheet = self.asset_path(&entry.folder, "style.css");
        let script = self.asset_path(&entry.folder, "main.js");
        doc.insert_asset(AssetKind::Stylesheet, &stylesheet);
        if doc.insert_asset(AssetKind::Script, &script) {
            if let Err(e) = backend.fetch_text(&script).await {
                warn!(widget = %entry.id, error = %e, "widget script failed to load");
                doc.remove_asset(AssetKind::Script, &script);
                entry.mark_missing();
                return Err(ShellError::ModuleLoad { widget: entry.id.clone(), reason: e.to_string() });
            }
        }

        let Some(provider) = self.providers.get(&entry.id) else {
            let reason = format!("no content provider registered for '{}'", entry.id);
            warn!(widget = %entry.id, "{reason}");
            entry.mark_error(reason.clone());
            return Err(ShellError::ModuleLoad { widget: entry.id.clone(), reason });
        };

        let descriptor = Arc::new(provider.content(saved));
        entry.mark_loaded();
        self.cache.insert(entry.id.clone(), descriptor.clone());
        debug!(widget = %entry.id, "module loaded");
        Ok(descriptor)
    }
}
