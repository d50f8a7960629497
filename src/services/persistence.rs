//! Persisted dashboard documents.
//!
//! DESIGN
//! ======
//! Positions, visibility and style settings are each one JSON document read
//! from a GET endpoint and replaced wholesale by a POST to a save endpoint.
//! [`DocumentStore`] is the shared read/write pair; the three constructors
//! bind it to its endpoints and document type.
//!
//! ERROR HANDLING
//! ==============
//! `load` never fails: a fetch or decode failure is logged and reported as
//! `None`, which callers treat as "use the built-in default". `save` logs
//! the outcome and returns the error so a caller draining pending writes
//! can count failures. No retries.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::marker::PhantomData;
use std::sync::Arc;

use dashboard::layout::LayoutMap;
use dashboard::styles::StyleSettingsMap;
use dashboard::visibility::VisibilityMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::config::{
    LAYOUT_PATH, LAYOUT_SAVE_PATH, STYLES_PATH, STYLES_SAVE_PATH, VISIBILITY_PATH, VISIBILITY_SAVE_PATH,
};
use crate::error::ShellError;
use crate::net::Backend;

/// One persisted document bound to its read and write endpoints.
pub struct DocumentStore<V> {
    backend: Arc<dyn Backend>,
    name: &'static str,
    read_path: &'static str,
    write_path: &'static str,
    _doc: PhantomData<fn() -> V>,
}

impl<V> Clone for DocumentStore<V> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            name: self.name,
            read_path: self.read_path,
            write_path: self.write_path,
            _doc: PhantomData,
        }
    }
}

impl<V> DocumentStore<V>
where
    V: Serialize + DeserializeOwned,
{
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, name: &'static str, read_path: &'static str, write_path: &'static str) -> Self {
        Self { backend, name, read_path, write_path, _doc: PhantomData }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read the stored document. `None` when it is absent or unreadable.
    pub async fn load(&self) -> Option<V> {
        let value = match self.backend.get_json(self.read_path).await {
            Ok(value) => value,
            Err(e) => {
                info!(document = self.name, error = %e, "no stored document; using defaults");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(document = self.name, error = %e, "stored document has the wrong shape; using defaults");
                None
            }
        }
    }

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Parse`] if the document cannot be encoded and
    /// [`ShellError::Fetch`] if the backend rejects the write.
    pub async fn save(&self, doc: &V) -> Result<(), ShellError> {
        let body = serde_json::to_value(doc).map_err(|e| ShellError::parse(self.name, e))?;
        match self.backend.post_json(self.write_path, &body).await {
            Ok(()) => {
                info!(document = self.name, "document saved");
                Ok(())
            }
            Err(e) => {
                error!(document = self.name, error = %e, "document save failed");
                Err(e)
            }
        }
    }
}

#[must_use]
pub fn layout_store(backend: Arc<dyn Backend>) -> DocumentStore<LayoutMap> {
    DocumentStore::new(backend, "positions", LAYOUT_PATH, LAYOUT_SAVE_PATH)
}

#[must_use]
pub fn visibility_store(backend: Arc<dyn Backend>) -> DocumentStore<VisibilityMap> {
    DocumentStore::new(backend, "visibility", VISIBILITY_PATH, VISIBILITY_SAVE_PATH)
}

#[must_use]
pub fn styles_store(backend: Arc<dyn Backend>) -> DocumentStore<StyleSettingsMap> {
    DocumentStore::new(backend, "style settings", STYLES_PATH, STYLES_SAVE_PATH)
}
