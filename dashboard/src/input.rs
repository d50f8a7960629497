//! Input model: typed host events and the interaction state machine states.
//!
//! `InputEvent` is everything the host can report: pointer gestures over
//! containers, menu choices, visibility toggles, settings form edits, and
//! viewport changes. `InteractionState` is the gesture currently tracked by
//! the engine, carrying the context needed to update geometry on each move.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Which part of a container a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPart {
    /// Anywhere on the container except its resize handle.
    #[default]
    Body,
    /// The resize-handle marker element.
    ResizeHandle,
}

/// Entries of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuChoice {
    EditSettings,
    Remove,
}

/// A host event, decoded from one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Double-click on a container. Toggles edit mode.
    DoubleClick { target: String },
    /// Primary button pressed over a container.
    PointerDown {
        target: String,
        #[serde(default)]
        part: HitPart,
        point: Point,
    },
    PointerMove { point: Point },
    PointerUp { point: Point },
    /// Left click released over a container.
    Click { target: String, point: Point },
    /// Click on the full-page background catcher.
    BackgroundClick,
    /// The dedicated close-edit-mode control.
    CloseEditMode,
    MenuSelect { choice: MenuChoice },
    /// Checkbox in the visibility list.
    ToggleVisibility { container: String, visible: bool },
    /// Raw text typed into a settings form field.
    SettingsInput { key: String, value: String },
    SettingsApply,
    SettingsOk,
    SettingsCancel,
    ViewportResized { width: f64, height: f64 },
}

/// Gesture tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Containers are inert; double-click enters edit mode.
    #[default]
    Normal,
    /// Containers may be dragged, resized, or opened in the context menu.
    EditMode,
    /// A container follows the pointer.
    Dragging {
        container_id: String,
        /// Pointer offset from the container's top-left at press time.
        offset: Point,
        /// Whether any pointer-move arrived during this session.
        moved: bool,
    },
    /// A container's size follows the pointer displacement.
    Resizing {
        container_id: String,
        /// Rendered width at press time.
        orig_width: f64,
        /// Rendered height at press time.
        orig_height: f64,
        /// Pointer position at press time.
        start: Point,
        moved: bool,
    },
}

impl InteractionState {
    /// Edit mode proper or one of its nested gestures.
    #[must_use]
    pub fn in_edit_mode(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// A drag or resize session is active.
    #[must_use]
    pub fn is_gesture(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Resizing { .. })
    }

    /// Container targeted by the active gesture.
    #[must_use]
    pub fn gesture_target(&self) -> Option<&str> {
        match self {
            Self::Dragging { container_id, .. } | Self::Resizing { container_id, .. } => Some(container_id),
            Self::Normal | Self::EditMode => None,
        }
    }
}
