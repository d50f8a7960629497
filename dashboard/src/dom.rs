//! Document surface: the host page as the engine sees it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell never touches a real display. `Document` models the parts of
//! the page the lifecycle engine owns: mount points, one container per
//! mounted widget, head asset tags, body classes, and the viewport size.
//! Containers are created once and then hidden/shown; they are never
//! removed, so geometry survives a later re-show.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use std::collections::BTreeSet;

use crate::consts::{
    DEFAULT_CONTAINER_HEIGHT_PX, DEFAULT_CONTAINER_WIDTH_PX, DEFAULT_VIEWPORT_HEIGHT_PX, DEFAULT_VIEWPORT_WIDTH_PX,
    WIDGET_LAYER_ID,
};
use crate::geometry::{Rect, Size, parse_px};

/// Inline style of a container. Each length is a CSS string or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub top: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub min_width: Option<String>,
    pub min_height: Option<String>,
    /// `display: none`.
    pub hidden: bool,
}

/// A mounted widget container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    /// Mount point this container is attached to.
    pub parent: String,
    pub html: String,
    pub style: Style,
}

impl Container {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.style.hidden
    }
}

/// Kind of a head asset tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Stylesheet,
    Script,
}

/// A `<link rel="stylesheet">` or `<script>` tag in the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTag {
    pub kind: AssetKind,
    pub src: String,
}

/// The page model.
#[derive(Debug, Clone)]
pub struct Document {
    mount_points: BTreeSet<String>,
    containers: Vec<Container>,
    head: Vec<AssetTag>,
    body_classes: BTreeSet<String>,
    viewport: Size,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Size::new(DEFAULT_VIEWPORT_WIDTH_PX, DEFAULT_VIEWPORT_HEIGHT_PX))
    }
}

impl Document {
    /// An empty page with the widget layer mount point.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let mut mount_points = BTreeSet::new();
        mount_points.insert(WIDGET_LAYER_ID.to_owned());
        Self { mount_points, containers: Vec::new(), head: Vec::new(), body_classes: BTreeSet::new(), viewport }
    }

    // --- Mount points ---

    pub fn add_mount_point(&mut self, id: impl Into<String>) {
        self.mount_points.insert(id.into());
    }

    pub fn remove_mount_point(&mut self, id: &str) -> bool {
        self.mount_points.remove(id)
    }

    #[must_use]
    pub fn has_mount_point(&self, id: &str) -> bool {
        self.mount_points.contains(id)
    }

    // --- Containers ---

    /// Return the container with `id`, creating an empty one under `parent`
    /// if it does not exist yet.
    pub fn ensure_container(&mut self, id: &str, parent: &str) -> &mut Container {
        let index = match self.containers.iter().position(|c| c.id == id) {
            Some(index) => index,
            None => {
                self.containers.push(Container {
                    id: id.to_owned(),
                    parent: parent.to_owned(),
                    html: String::new(),
                    style: Style::default(),
                });
                self.containers.len() - 1
            }
        };
        &mut self.containers[index]
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }

    /// All containers in creation order.
    #[must_use]
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// Set `display: none` on or off. Returns false when the container is absent.
    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> bool {
        let Some(container) = self.container_mut(id) else {
            return false;
        };
        container.style.hidden = hidden;
        true
    }

    /// Rendered bounds of a container, derived from its inline style.
    ///
    /// Pixel lengths are used as-is. Missing sizes fall back to the default
    /// container size floored at the declared minimums. A container anchored
    /// only on the right resolves its left edge against the viewport.
    #[must_use]
    pub fn bounding_rect(&self, id: &str) -> Option<Rect> {
        let style = &self.container(id)?.style;
        let px = |v: &Option<String>| v.as_deref().and_then(parse_px);

        let width = px(&style.width)
            .unwrap_or(DEFAULT_CONTAINER_WIDTH_PX)
            .max(px(&style.min_width).unwrap_or(0.0));
        let height = px(&style.height)
            .unwrap_or(DEFAULT_CONTAINER_HEIGHT_PX)
            .max(px(&style.min_height).unwrap_or(0.0));

        let left = match (px(&style.left), px(&style.right)) {
            (Some(left), _) => left,
            (None, Some(right)) => self.viewport.width - right - width,
            (None, None) => 0.0,
        };
        let top = px(&style.top).unwrap_or(0.0);

        Some(Rect { left, top, width, height })
    }

    // --- Head assets ---

    #[must_use]
    pub fn has_asset(&self, kind: AssetKind, src: &str) -> bool {
        self.head.iter().any(|tag| tag.kind == kind && tag.src == src)
    }

    /// Append an asset tag unless one with the same source already exists.
    /// Returns `true` when a tag was added.
    pub fn insert_asset(&mut self, kind: AssetKind, src: &str) -> bool {
        if self.has_asset(kind, src) {
            return false;
        }
        self.head.push(AssetTag { kind, src: src.to_owned() });
        true
    }

    /// Drop an asset tag. Returns `true` when one was present.
    pub fn remove_asset(&mut self, kind: AssetKind, src: &str) -> bool {
        let before = self.head.len();
        self.head.retain(|tag| tag.kind != kind || tag.src != src);
        self.head.len() != before
    }

    #[must_use]
    pub fn assets(&self) -> &[AssetTag] {
        &self.head
    }

    // --- Body ---

    pub fn add_body_class(&mut self, class: &str) {
        self.body_classes.insert(class.to_owned());
    }

    pub fn remove_body_class(&mut self, class: &str) {
        self.body_classes.remove(class);
    }

    #[must_use]
    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    // --- Viewport ---

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }
}
