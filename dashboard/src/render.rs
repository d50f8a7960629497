//! Render engine: mounts content descriptors into containers.
//!
//! DESIGN
//! ======
//! `render` reuses an existing container instead of creating a duplicate, so
//! a descriptor can be refreshed in place. If a descriptor is still mounted
//! in that container it is destroyed first, which keeps at most one live set
//! of widget timers per container. `unmount` destroys and hides but never
//! removes the container, because its geometry must survive a later re-show.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::sync::Arc;

use crate::consts::RESIZE_HANDLE_MARKUP;
use crate::dom::Document;
use crate::error::EngineError;
use crate::registry::container_id_for;
use crate::widget::ContentDescriptor;

/// Tracks which descriptor is live in which container.
#[derive(Debug, Default)]
pub struct Renderer {
    mounted: HashMap<String, Arc<ContentDescriptor>>,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `descriptor` for `widget_id` under `parent` and run its `init`.
    ///
    /// Returns the container id, which differs from the widget id only for
    /// aliased widgets.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RenderTargetMissing`] when `parent` is not a
    /// mount point of the document. Nothing is created in that case.
    pub fn render(
        &mut self,
        doc: &mut Document,
        widget_id: &str,
        descriptor: Arc<ContentDescriptor>,
        parent: &str,
    ) -> Result<String, EngineError> {
        if !doc.has_mount_point(parent) {
            return Err(EngineError::RenderTargetMissing(parent.to_owned()));
        }

        let container_id = container_id_for(widget_id).to_owned();
        if let Some(previous) = self.mounted.remove(&container_id) {
            previous.destroy();
        }

        let container = doc.ensure_container(&container_id, parent);
        if let Some(min_width) = &descriptor.settings.min_width {
            container.style.min_width = Some(min_width.clone());
        }
        if let Some(min_height) = &descriptor.settings.min_height {
            container.style.min_height = Some(min_height.clone());
        }
        container.html = format!("{}{RESIZE_HANDLE_MARKUP}", descriptor.html);
        container.style.hidden = false;

        descriptor.init();
        self.mounted.insert(container_id.clone(), descriptor);
        Ok(container_id)
    }

    /// Destroy the live descriptor in `container_id` and hide the container.
    ///
    /// Returns `false` if nothing was mounted there; the container is still
    /// hidden if it exists.
    pub fn unmount(&mut self, doc: &mut Document, container_id: &str) -> bool {
        let was_mounted = match self.mounted.remove(container_id) {
            Some(descriptor) => {
                descriptor.destroy();
                true
            }
            None => false,
        };
        doc.set_hidden(container_id, true);
        was_mounted
    }

    #[must_use]
    pub fn is_mounted(&self, container_id: &str) -> bool {
        self.mounted.contains_key(container_id)
    }

    /// The descriptor live in `container_id`.
    #[must_use]
    pub fn mounted(&self, container_id: &str) -> Option<&Arc<ContentDescriptor>> {
        self.mounted.get(container_id)
    }
}
