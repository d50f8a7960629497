//! Position documents: restore, capture and default geometry.
//!
//! DESIGN
//! ======
//! A [`LayoutPosition`] is partial by nature. Restoring one only writes the
//! fields it carries, so a record without `height` leaves the container's
//! current height alone. Exactly one horizontal anchor is authoritative after
//! a restore: `right` wins only when the record also says `left: auto`,
//! otherwise `right` is reset to `auto` and the container follows `left`.
//!
//! Empty strings in a stored record are treated as absent. Captured layouts
//! come from inline styles and may legitimately contain empty fields for
//! containers that were never moved.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::CLOCK_FALLBACK_TOP_PX;
use crate::dom::{Document, Style};
use crate::geometry::format_px;
use crate::registry::CLOCK_CONTAINER_ID;

/// Keyword used for an anchor that follows the opposite edge.
pub const AUTO: &str = "auto";

/// Stored geometry of one container. Every field is a CSS length or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPosition {
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

/// Container id to stored geometry.
pub type LayoutMap = BTreeMap<String, LayoutPosition>;

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

impl LayoutPosition {
    #[must_use]
    pub fn new(top: &str, left: &str, right: &str, width: &str, height: &str) -> Self {
        Self {
            top: Some(top.to_owned()),
            left: Some(left.to_owned()),
            right: Some(right.to_owned()),
            width: Some(width.to_owned()),
            height: Some(height.to_owned()),
        }
    }

    /// Snapshot of the positional fields of an inline style.
    #[must_use]
    pub fn from_style(style: &Style) -> Self {
        let keep = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Self {
            top: keep(&style.top),
            left: keep(&style.left),
            right: keep(&style.right),
            width: keep(&style.width),
            height: keep(&style.height),
        }
    }

    /// Write this record onto `style` using the partial merge rule.
    pub fn apply_to(&self, style: &mut Style) {
        if let Some(top) = &self.top {
            style.top = Some(top.clone());
        }
        if let Some(left) = &self.left {
            style.left = Some(left.clone());
        }
        if let Some(right) = &self.right {
            style.right = Some(right.clone());
        }

        if self.right.is_some() && self.left.as_deref() == Some(AUTO) {
            style.left = Some(AUTO.to_owned());
        } else {
            style.right = Some(AUTO.to_owned());
        }

        if let Some(width) = &self.width {
            style.width = Some(width.clone());
        }
        if let Some(height) = &self.height {
            style.height = Some(height.clone());
        }
    }
}

/// Apply every record whose container exists. Returns the ids that were
/// skipped because no such container is mounted.
pub fn restore(doc: &mut Document, layout: &LayoutMap) -> Vec<String> {
    let mut skipped = Vec::new();
    for (id, position) in layout {
        match doc.container_mut(id) {
            Some(container) => position.apply_to(&mut container.style),
            None => skipped.push(id.clone()),
        }
    }
    skipped
}

/// Current geometry of every container, in creation order.
#[must_use]
pub fn capture(doc: &Document) -> LayoutMap {
    doc.containers()
        .iter()
        .map(|c| (c.id.clone(), LayoutPosition::from_style(&c.style)))
        .collect()
}

/// Built-in geometry for the bundled widgets.
#[must_use]
pub fn default_layout() -> LayoutMap {
    [
        ("live-clock", LayoutPosition::new("72.5938px", "1709px", AUTO, "778px", "181px")),
        ("traffic-data", LayoutPosition::new("1072.59px", "31px", AUTO, "432px", "251.594px")),
        ("listening-ports", LayoutPosition::new("35.7969px", "36px", AUTO, "425px", "994.594px")),
        ("live-traffic-log", LayoutPosition::new("891.188px", "1808.8px", AUTO, "683.188px", "476.594px")),
        ("active-connections", LayoutPosition::new("299.391px", "1812.81px", AUTO, "675.188px", "572px")),
    ]
    .into_iter()
    .map(|(id, pos)| (id.to_owned(), pos))
    .collect()
}

/// Place the clock container alone: centered horizontally, near the top.
///
/// Returns `false` when no clock container is mounted.
pub fn center_clock(doc: &mut Document) -> bool {
    let viewport = doc.viewport();
    let Some(rect) = doc.bounding_rect(CLOCK_CONTAINER_ID) else {
        return false;
    };
    let left = ((viewport.width - rect.width) / 2.0).max(0.0);
    let Some(container) = doc.container_mut(CLOCK_CONTAINER_ID) else {
        return false;
    };
    container.style.left = Some(format_px(left));
    container.style.top = Some(format_px(CLOCK_FALLBACK_TOP_PX));
    container.style.right = Some(AUTO.to_owned());
    true
}
