//! Shared constants for the dashboard crate.

// ── Document ────────────────────────────────────────────────────

/// Mount point every widget container is attached to.
pub const WIDGET_LAYER_ID: &str = "widget-layer";

/// Class carried by every widget container.
pub const CONTAINER_CLASS: &str = "widget-container";

/// Body class present while edit mode is active.
pub const EDIT_MODE_CLASS: &str = "is-dragging";

/// Class of the resize-handle marker appended to every container.
pub const RESIZE_HANDLE_CLASS: &str = "resize-handle";

/// Markup appended after a widget's own markup.
pub const RESIZE_HANDLE_MARKUP: &str = r#"<div class="resize-handle"></div>"#;

// ── Geometry ────────────────────────────────────────────────────

/// Rendered width of a container that declares no width.
pub const DEFAULT_CONTAINER_WIDTH_PX: f64 = 300.0;

/// Rendered height of a container that declares no height.
pub const DEFAULT_CONTAINER_HEIGHT_PX: f64 = 200.0;

/// Viewport used until the host reports its real size.
pub const DEFAULT_VIEWPORT_WIDTH_PX: f64 = 1920.0;

/// Viewport used until the host reports its real size.
pub const DEFAULT_VIEWPORT_HEIGHT_PX: f64 = 1080.0;

/// Distance from the top edge for the lone-clock fallback layout.
pub const CLOCK_FALLBACK_TOP_PX: f64 = 40.0;

// ── Context menu ────────────────────────────────────────────────

/// Rendered context menu width used for overflow flipping.
pub const MENU_WIDTH_PX: f64 = 180.0;

/// Rendered context menu height used for overflow flipping.
pub const MENU_HEIGHT_PX: f64 = 72.0;
