//! Widget registry: the catalog of installable widgets and their load status.
//!
//! DESIGN
//! ======
//! Entries are created from the registry document with status `Pending` and
//! are then advanced by the module loader. Ids are unique; a document that
//! lists the same id twice keeps the first occurrence.
//!
//! The clock widget is mounted into a container whose id differs from its
//! registry id. That is the only such case and it lives in a single table,
//! [`CONTAINER_ALIASES`], consulted by every load, render, visibility and
//! removal path.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Registry id to container id exceptions.
pub const CONTAINER_ALIASES: &[(&str, &str)] = &[("clock", "live-clock")];

/// Registry id of the clock widget.
pub const CLOCK_WIDGET_ID: &str = "clock";

/// Container id hosting the clock widget.
pub const CLOCK_CONTAINER_ID: &str = "live-clock";

/// Container id for a registry id.
#[must_use]
pub fn container_id_for(widget_id: &str) -> &str {
    CONTAINER_ALIASES
        .iter()
        .find(|(widget, _)| *widget == widget_id)
        .map_or(widget_id, |(_, container)| *container)
}

/// Registry id for a container id.
#[must_use]
pub fn widget_id_for(container_id: &str) -> &str {
    CONTAINER_ALIASES
        .iter()
        .find(|(_, container)| *container == container_id)
        .map_or(container_id, |(widget, _)| *widget)
}

/// Load status of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Not loaded yet.
    #[default]
    Pending,
    /// Assets loaded and a content descriptor was produced.
    Loaded,
    /// Assets loaded but no content provider could be resolved.
    Error,
    /// Asset injection or fetch failed; pruned after initial load.
    Missing,
}

/// One widget listed in the registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Unique widget id.
    pub id: String,
    /// Asset folder name under the widgets root.
    pub folder: String,
    /// Display name.
    pub name: String,
    /// Load status, advanced by the module loader.
    #[serde(default)]
    pub status: EntryStatus,
    /// Reason for an `Error` status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegistryEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, folder: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), folder: folder.into(), name: name.into(), status: EntryStatus::Pending, error: None }
    }

    /// Container id this entry renders into.
    #[must_use]
    pub fn container_id(&self) -> &str {
        container_id_for(&self.id)
    }

    pub fn mark_loaded(&mut self) {
        self.status = EntryStatus::Loaded;
        self.error = None;
    }

    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = EntryStatus::Error;
        self.error = Some(message.into());
    }

    pub fn mark_missing(&mut self) {
        self.status = EntryStatus::Missing;
    }
}

/// Wire shape of one widget in the registry document.
#[derive(Debug, Clone, Deserialize)]
struct RegistryWidget {
    id: String,
    folder: String,
    name: String,
}

/// Wire shape of the registry document: `{ "widgets": [...] }`.
#[derive(Debug, Clone, Deserialize)]
struct RegistryDocument {
    widgets: Vec<RegistryWidget>,
}

/// Parse a registry document into pending entries, dropping duplicate ids.
///
/// # Errors
///
/// Returns the JSON error if the value does not have the registry shape.
pub fn parse_registry(value: serde_json::Value) -> Result<Vec<RegistryEntry>, serde_json::Error> {
    let doc: RegistryDocument = serde_json::from_value(value)?;
    let mut seen = HashSet::new();
    Ok(doc
        .widgets
        .into_iter()
        .filter(|w| seen.insert(w.id.clone()))
        .map(|w| RegistryEntry::new(w.id, w.folder, w.name))
        .collect())
}

/// The active registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Build from entries, keeping the first entry for any repeated id.
    #[must_use]
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries.into_iter().filter(|e| seen.insert(e.id.clone())).collect();
        Self { entries }
    }

    /// Drop entries whose assets could not be loaded. Returns the pruned ids.
    pub fn prune_missing(&mut self) -> Vec<String> {
        let (missing, kept): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.status == EntryStatus::Missing);
        self.entries = kept;
        missing.into_iter().map(|e| e.id).collect()
    }

    #[must_use]
    pub fn get(&self, widget_id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.id == widget_id)
    }

    /// Look up the entry rendered into `container_id`.
    #[must_use]
    pub fn by_container(&self, container_id: &str) -> Option<&RegistryEntry> {
        self.get(widget_id_for(container_id))
    }

    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Container ids of every entry, in registry order.
    #[must_use]
    pub fn container_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.container_id().to_owned()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
