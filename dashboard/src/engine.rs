//! Dashboard state and the typed input dispatcher.
//!
//! DESIGN
//! ======
//! All mutable dashboard state lives in one [`DashboardState`] owned by the
//! host: the document, the live descriptors, the three persisted documents,
//! the interaction state, and the open context menu / settings editor.
//! Host input enters through [`DashboardState::dispatch`], which performs the
//! state machine transition and returns the [`Action`]s the host must carry
//! out (persist a document, redraw, report a menu opening).
//!
//! Interaction states:
//!
//! ```text
//! Normal --double-click--> EditMode --pointer-down(body)--> Dragging
//!   ^                        |  ^  \--pointer-down(handle)--> Resizing
//!   |                        |  |                               |
//!   +--background/close/dbl--+  +-------- pointer-up -----------+
//! ```
//!
//! Pointer-down is honored only in `EditMode` proper, so at most one drag or
//! resize session exists at a time.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::consts::{EDIT_MODE_CLASS, WIDGET_LAYER_ID};
use crate::dom::Document;
use crate::error::EngineError;
use crate::geometry::{Point, Rect, Size, format_px};
use crate::input::{HitPart, InputEvent, InteractionState, MenuChoice};
use crate::layout::{self, AUTO, LayoutMap};
use crate::menu::ContextMenu;
use crate::registry::{CLOCK_WIDGET_ID, EntryStatus, Registry, widget_id_for};
use crate::render::Renderer;
use crate::settings::SettingsEditor;
use crate::styles::{self, StyleSettingsMap};
use crate::visibility::{self, VisibilityMap};
use crate::widget::{ContentDescriptor, StyleValues};

/// Actions returned from the dispatcher for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    EditModeEntered,
    EditModeExited,
    /// Persist the full position document.
    SavePositions(LayoutMap),
    /// Persist the full visibility document.
    SaveVisibility(VisibilityMap),
    /// Persist the full style settings document.
    SaveStyles(StyleSettingsMap),
    /// The visibility checkboxes must be redrawn from these rows.
    RefreshVisibilityList(Vec<VisibilityListItem>),
    MenuOpened(ContextMenu),
    MenuClosed,
    /// The settings editor opened for this widget id.
    SettingsOpened(String),
    SettingsClosed,
    RenderNeeded,
}

/// One row of the widget visibility list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibilityListItem {
    pub container_id: String,
    pub name: String,
    pub visible: bool,
    /// Load error shown next to the row.
    pub error: Option<String>,
    pub toggle_enabled: bool,
}

/// The whole dashboard, owned by one controller.
#[derive(Debug, Default)]
pub struct DashboardState {
    doc: Document,
    renderer: Renderer,
    registry: Registry,
    /// Loaded descriptors by widget id; reused on every re-show.
    descriptors: HashMap<String, Arc<ContentDescriptor>>,
    visibility: VisibilityMap,
    styles: StyleSettingsMap,
    /// Containers hidden by feature flags; their toggles are inert.
    suppressed: BTreeSet<String>,
    interaction: InteractionState,
    menu: Option<ContextMenu>,
    editor: Option<SettingsEditor>,
    /// Set when a gesture that moved something ends; eats the trailing click.
    suppress_click: bool,
}

impl DashboardState {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self { doc: Document::new(viewport), ..Self::default() }
    }

    // --- Accessors ---

    #[must_use]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    #[must_use]
    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    #[must_use]
    pub fn editor(&self) -> Option<&SettingsEditor> {
        self.editor.as_ref()
    }

    #[must_use]
    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    #[must_use]
    pub fn styles(&self) -> &StyleSettingsMap {
        &self.styles
    }

    #[must_use]
    pub fn descriptor(&self, widget_id: &str) -> Option<&Arc<ContentDescriptor>> {
        self.descriptors.get(widget_id)
    }

    /// Whether the descriptor of `container_id` is live.
    #[must_use]
    pub fn is_mounted(&self, container_id: &str) -> bool {
        self.renderer.is_mounted(container_id)
    }

    // --- Data inputs ---

    pub fn set_registry(&mut self, registry: Registry) {
        self.registry = registry;
    }

    pub fn set_styles(&mut self, styles: StyleSettingsMap) {
        self.styles = styles;
    }

    /// Saved style values of one widget (empty when none).
    #[must_use]
    pub fn saved_styles(&self, widget_id: &str) -> StyleValues {
        styles::saved_for(&self.styles, widget_id)
    }

    /// Render a loaded descriptor into the widget layer and keep it for
    /// later re-shows. Returns the container id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RenderTargetMissing`] when the widget layer
    /// mount point is absent.
    pub fn mount(&mut self, widget_id: &str, descriptor: Arc<ContentDescriptor>) -> Result<String, EngineError> {
        let container_id = self.renderer.render(&mut self.doc, widget_id, descriptor.clone(), WIDGET_LAYER_ID)?;
        self.descriptors.insert(widget_id.to_owned(), descriptor);
        Ok(container_id)
    }

    // --- Positions ---

    /// Restore a stored position document. An empty document falls back to
    /// the built-in geometry. Returns ids skipped for lack of a container.
    pub fn apply_layout(&mut self, stored: &LayoutMap) -> Vec<String> {
        if stored.is_empty() {
            return self.apply_default_layout();
        }
        layout::restore(&mut self.doc, stored)
    }

    /// Built-in geometry. A registry holding only the clock centers it near
    /// the top instead.
    pub fn apply_default_layout(&mut self) -> Vec<String> {
        let clock_only = self.registry.len() == 1 && self.registry.get(CLOCK_WIDGET_ID).is_some();
        if clock_only {
            layout::center_clock(&mut self.doc);
            return Vec::new();
        }
        layout::restore(&mut self.doc, &layout::default_layout())
    }

    #[must_use]
    pub fn capture_layout(&self) -> LayoutMap {
        layout::capture(&self.doc)
    }

    // --- Visibility ---

    /// Restore a stored visibility document.
    ///
    /// With no document (or an empty one) only the clock is shown and the
    /// returned action persists that default. Otherwise ids the document does
    /// not mention get the same default and nothing is persisted.
    pub fn apply_visibility(&mut self, stored: Option<&VisibilityMap>) -> Option<Action> {
        let ids = self.registry.container_ids();
        let ids = ids.iter().map(String::as_str);
        let (map, persist) = match stored {
            Some(stored) if !stored.is_empty() => (visibility::complete(stored, ids), false),
            _ => (visibility::default_map(ids), true),
        };
        self.visibility = map;

        let flags: Vec<(String, bool)> = self.visibility.iter().map(|(id, shown)| (id.clone(), *shown)).collect();
        for (container_id, shown) in flags {
            self.show_or_hide(&container_id, shown);
        }
        persist.then(|| Action::SaveVisibility(self.visibility.clone()))
    }

    /// Show or hide a container and record the flag.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownContainer`] when no descriptor was ever
    /// mounted for the container.
    pub fn set_visible(&mut self, container_id: &str, visible: bool) -> Result<(), EngineError> {
        if !self.descriptors.contains_key(widget_id_for(container_id)) {
            return Err(EngineError::UnknownContainer(container_id.to_owned()));
        }
        self.visibility.insert(container_id.to_owned(), visible);
        self.show_or_hide(container_id, visible);
        Ok(())
    }

    /// Hide containers regardless of their visibility flag, e.g. when a
    /// feature flag disables them. Unknown ids are ignored.
    pub fn suppress(&mut self, container_ids: &[&str]) {
        for id in container_ids {
            if self.doc.container(id).is_some() {
                self.renderer.unmount(&mut self.doc, id);
                self.suppressed.insert((*id).to_owned());
            }
        }
    }

    #[must_use]
    pub fn is_suppressed(&self, container_id: &str) -> bool {
        self.suppressed.contains(container_id)
    }

    /// Rows for the visibility list, in registry order.
    #[must_use]
    pub fn visibility_list(&self) -> Vec<VisibilityListItem> {
        self.registry
            .entries()
            .iter()
            .map(|entry| {
                let container_id = entry.container_id();
                VisibilityListItem {
                    container_id: container_id.to_owned(),
                    name: entry.name.clone(),
                    visible: self
                        .visibility
                        .get(container_id)
                        .copied()
                        .unwrap_or_else(|| visibility::default_visible(container_id)),
                    error: entry.error.clone(),
                    toggle_enabled: entry.status == EntryStatus::Loaded && !self.is_suppressed(container_id),
                }
            })
            .collect()
    }

    fn show_or_hide(&mut self, container_id: &str, visible: bool) {
        if self.suppressed.contains(container_id) {
            return;
        }
        if !visible {
            self.renderer.unmount(&mut self.doc, container_id);
            return;
        }
        if self.renderer.is_mounted(container_id) {
            self.doc.set_hidden(container_id, false);
            return;
        }
        let widget_id = widget_id_for(container_id);
        if let Some(descriptor) = self.descriptors.get(widget_id).cloned()
            && self.renderer.render(&mut self.doc, widget_id, descriptor, WIDGET_LAYER_ID).is_err()
        {
            self.doc.set_hidden(container_id, true);
        }
    }

    // --- Dispatch ---

    /// Apply one host event and return what the host must do next.
    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::DoubleClick { target } => self.on_double_click(&target),
            InputEvent::PointerDown { target, part, point } => self.on_pointer_down(&target, part, point),
            InputEvent::PointerMove { point } => self.on_pointer_move(point),
            InputEvent::PointerUp { .. } => self.on_pointer_up(),
            InputEvent::Click { target, point } => self.on_click(&target, point),
            InputEvent::BackgroundClick => self.on_background_click(),
            InputEvent::CloseEditMode => {
                if self.interaction.in_edit_mode() {
                    self.exit_edit_mode()
                } else {
                    Vec::new()
                }
            }
            InputEvent::MenuSelect { choice } => self.on_menu_select(choice),
            InputEvent::ToggleVisibility { container, visible } => self.on_toggle_visibility(&container, visible),
            InputEvent::SettingsInput { key, value } => {
                if let Some(editor) = &mut self.editor {
                    editor.set_input(&key, &value);
                }
                Vec::new()
            }
            InputEvent::SettingsApply => self.apply_settings().into_iter().collect(),
            InputEvent::SettingsOk => {
                let mut actions: Vec<Action> = self.apply_settings().into_iter().collect();
                if self.editor.take().is_some() {
                    actions.push(Action::SettingsClosed);
                }
                actions
            }
            InputEvent::SettingsCancel => {
                if self.editor.take().is_some() {
                    vec![Action::SettingsClosed]
                } else {
                    Vec::new()
                }
            }
            InputEvent::ViewportResized { width, height } => {
                self.doc.set_viewport(Size::new(width, height));
                vec![Action::RenderNeeded]
            }
        }
    }

    fn on_double_click(&mut self, target: &str) -> Vec<Action> {
        if self.doc.container(target).is_none() {
            return Vec::new();
        }
        if self.interaction.in_edit_mode() {
            return self.exit_edit_mode();
        }
        self.interaction = InteractionState::EditMode;
        self.doc.add_body_class(EDIT_MODE_CLASS);
        vec![Action::EditModeEntered, Action::RefreshVisibilityList(self.visibility_list())]
    }

    fn on_pointer_down(&mut self, target: &str, part: HitPart, point: Point) -> Vec<Action> {
        if self.interaction != InteractionState::EditMode || self.menu.is_some() {
            return Vec::new();
        }
        let Some(rect) = self.visible_rect(target) else {
            return Vec::new();
        };
        self.suppress_click = false;
        self.interaction = match part {
            HitPart::Body => InteractionState::Dragging {
                container_id: target.to_owned(),
                offset: Point::new(point.x - rect.left, point.y - rect.top),
                moved: false,
            },
            HitPart::ResizeHandle => InteractionState::Resizing {
                container_id: target.to_owned(),
                orig_width: rect.width,
                orig_height: rect.height,
                start: point,
                moved: false,
            },
        };
        Vec::new()
    }

    fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        match &mut self.interaction {
            InteractionState::Dragging { container_id, offset, moved } => {
                let Some(container) = self.doc.container_mut(container_id) else {
                    return Vec::new();
                };
                container.style.left = Some(format_px(point.x - offset.x));
                container.style.top = Some(format_px(point.y - offset.y));
                container.style.right = Some(AUTO.to_owned());
                *moved = true;
                vec![Action::RenderNeeded]
            }
            InteractionState::Resizing { container_id, orig_width, orig_height, start, moved } => {
                let Some(container) = self.doc.container_mut(container_id) else {
                    return Vec::new();
                };
                container.style.width = Some(format_px(*orig_width + (point.x - start.x)));
                container.style.height = Some(format_px(*orig_height + (point.y - start.y)));
                *moved = true;
                vec![Action::RenderNeeded]
            }
            InteractionState::Normal | InteractionState::EditMode => Vec::new(),
        }
    }

    fn on_pointer_up(&mut self) -> Vec<Action> {
        if let InteractionState::Dragging { moved, .. } | InteractionState::Resizing { moved, .. } = self.interaction {
            self.suppress_click = moved;
            self.interaction = InteractionState::EditMode;
        }
        Vec::new()
    }

    fn on_click(&mut self, target: &str, point: Point) -> Vec<Action> {
        if let Some(menu) = &self.menu {
            if menu.contains(point) {
                return Vec::new();
            }
            self.menu = None;
            return vec![Action::MenuClosed];
        }
        if std::mem::take(&mut self.suppress_click) {
            return Vec::new();
        }
        if self.interaction != InteractionState::EditMode || self.visible_rect(target).is_none() {
            return Vec::new();
        }
        let has_settings = self.descriptors.get(widget_id_for(target)).is_some_and(|d| d.has_settings());
        let menu = ContextMenu::open(target, point, has_settings, self.doc.viewport());
        self.menu = Some(menu.clone());
        vec![Action::MenuOpened(menu)]
    }

    fn on_background_click(&mut self) -> Vec<Action> {
        if self.menu.take().is_some() {
            return vec![Action::MenuClosed];
        }
        if self.interaction == InteractionState::EditMode {
            return self.exit_edit_mode();
        }
        Vec::new()
    }

    fn on_menu_select(&mut self, choice: MenuChoice) -> Vec<Action> {
        let Some(menu) = self.menu.take() else {
            return Vec::new();
        };
        if !menu.is_enabled(choice) {
            self.menu = Some(menu);
            return Vec::new();
        }
        let container_id = menu.container_id;
        match choice {
            MenuChoice::EditSettings => {
                let widget_id = widget_id_for(&container_id).to_owned();
                let Some(descriptor) = self.descriptors.get(&widget_id) else {
                    return vec![Action::MenuClosed];
                };
                let saved = styles::saved_for(&self.styles, &widget_id);
                self.editor =
                    Some(SettingsEditor::open(&widget_id, &container_id, &descriptor.editable_settings, &saved));
                vec![Action::MenuClosed, Action::SettingsOpened(widget_id)]
            }
            MenuChoice::Remove => {
                let mut actions = vec![Action::MenuClosed];
                if self.set_visible(&container_id, false).is_ok() {
                    actions.push(Action::SaveVisibility(self.visibility.clone()));
                    actions.push(Action::RefreshVisibilityList(self.visibility_list()));
                }
                actions
            }
        }
    }

    fn on_toggle_visibility(&mut self, container_id: &str, visible: bool) -> Vec<Action> {
        let toggle_enabled =
            self.visibility_list().iter().any(|row| row.container_id == container_id && row.toggle_enabled);
        if !toggle_enabled || self.set_visible(container_id, visible).is_err() {
            return Vec::new();
        }
        vec![Action::SaveVisibility(self.visibility.clone()), Action::RefreshVisibilityList(self.visibility_list())]
    }

    /// Push the editor's values into the widget and the style document.
    fn apply_settings(&mut self) -> Option<Action> {
        let editor = self.editor.as_ref()?;
        let values = editor.values();
        let widget_id = editor.widget_id.clone();
        // Hidden widgets pick the values up from the style document on re-show.
        if self.renderer.is_mounted(&editor.container_id)
            && let Some(descriptor) = self.descriptors.get(&widget_id)
        {
            descriptor.update_style(&values);
        }
        styles::store(&mut self.styles, &widget_id, values);
        Some(Action::SaveStyles(self.styles.clone()))
    }

    fn exit_edit_mode(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.menu.take().is_some() {
            actions.push(Action::MenuClosed);
        }
        if self.editor.take().is_some() {
            actions.push(Action::SettingsClosed);
        }
        self.interaction = InteractionState::Normal;
        self.suppress_click = false;
        self.doc.remove_body_class(EDIT_MODE_CLASS);
        actions.push(Action::EditModeExited);
        actions.push(Action::SavePositions(self.capture_layout()));
        actions.push(Action::SaveVisibility(self.visibility.clone()));
        actions
    }

    /// Rendered bounds of a shown container.
    fn visible_rect(&self, container_id: &str) -> Option<Rect> {
        let container = self.doc.container(container_id)?;
        if !container.is_visible() {
            return None;
        }
        self.doc.bounding_rect(container_id)
    }
}

