//! Widget registry loader.
//!
//! ERROR HANDLING
//! ==============
//! Never fails. A fetch or parse failure yields an empty registry and the
//! shell carries on with zero widgets; persistence and interaction still
//! initialize.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use dashboard::registry::{RegistryEntry, parse_registry};
use tracing::{info, warn};

use crate::config::REGISTRY_PATH;
use crate::error::ShellError;
use crate::net::Backend;

/// Fetch the registry document as pending entries.
pub async fn load_registry(backend: &dyn Backend) -> Vec<RegistryEntry> {
    match fetch_registry(backend).await {
        Ok(entries) => {
            info!(count = entries.len(), "widget registry loaded");
            entries
        }
        Err(e) => {
            warn!(error = %e, "widget registry unavailable; continuing with no widgets");
            Vec::new()
        }
    }
}

async fn fetch_registry(backend: &dyn Backend) -> Result<Vec<RegistryEntry>, ShellError> {
    let value = backend.get_json(REGISTRY_PATH).await?;
    parse_registry(value).map_err(|e| ShellError::parse(REGISTRY_PATH, e))
}
