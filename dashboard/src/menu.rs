//! Context menu model and viewport-aware placement.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use serde::Serialize;

use crate::consts::{MENU_HEIGHT_PX, MENU_WIDTH_PX};
use crate::geometry::{Point, Size};
use crate::input::MenuChoice;

/// One menu row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub choice: MenuChoice,
    pub label: &'static str,
    pub enabled: bool,
}

/// An open context menu targeting one container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMenu {
    pub container_id: String,
    /// Top-left corner after flipping.
    pub position: Point,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// Build the menu for `container_id` clicked at `at`.
    ///
    /// "Edit Settings" is enabled only when the widget declared a settings
    /// schema.
    #[must_use]
    pub fn open(container_id: &str, at: Point, has_settings: bool, viewport: Size) -> Self {
        Self {
            container_id: container_id.to_owned(),
            position: place(at, viewport),
            items: vec![
                MenuItem { choice: MenuChoice::EditSettings, label: "Edit Settings", enabled: has_settings },
                MenuItem { choice: MenuChoice::Remove, label: "Remove Widget", enabled: true },
            ],
        }
    }

    #[must_use]
    pub fn is_enabled(&self, choice: MenuChoice) -> bool {
        self.items.iter().any(|item| item.choice == choice && item.enabled)
    }

    /// Whether `pt` falls inside the rendered menu.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.position.x
            && pt.x <= self.position.x + MENU_WIDTH_PX
            && pt.y >= self.position.y
            && pt.y <= self.position.y + MENU_HEIGHT_PX
    }
}

/// Menu origin for a click at `at`, flipped left and/or up when the menu
/// would overflow the right or bottom edge.
#[must_use]
pub fn place(at: Point, viewport: Size) -> Point {
    let x = if at.x + MENU_WIDTH_PX > viewport.width { at.x - MENU_WIDTH_PX } else { at.x };
    let y = if at.y + MENU_HEIGHT_PX > viewport.height { at.y - MENU_HEIGHT_PX } else { at.y };
    Point::new(x.max(0.0), y.max(0.0))
}
