//! Visibility documents.
//!
//! A visibility document maps container id to a shown flag. On first run no
//! document exists and only the clock is shown; the caller persists that
//! default right away so later sessions read an explicit document.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use std::collections::BTreeMap;

use crate::registry::CLOCK_CONTAINER_ID;

/// Container id to shown flag.
pub type VisibilityMap = BTreeMap<String, bool>;

/// First-run visibility of a container.
#[must_use]
pub fn default_visible(container_id: &str) -> bool {
    container_id == CLOCK_CONTAINER_ID
}

/// First-run document for the given containers.
#[must_use]
pub fn default_map<'a>(container_ids: impl IntoIterator<Item = &'a str>) -> VisibilityMap {
    container_ids.into_iter().map(|id| (id.to_owned(), default_visible(id))).collect()
}

/// Fill in every container the stored document does not mention.
///
/// Stored flags win; unknown ids already in `stored` are kept so a widget
/// that is temporarily absent does not lose its flag.
#[must_use]
pub fn complete<'a>(stored: &VisibilityMap, container_ids: impl IntoIterator<Item = &'a str>) -> VisibilityMap {
    let mut map = stored.clone();
    for id in container_ids {
        map.entry(id.to_owned()).or_insert_with(|| default_visible(id));
    }
    map
}
