#![allow(clippy::float_cmp)]

use super::*;

fn doc() -> Document {
    Document::new(Size::new(1000.0, 800.0))
}

// =============================================================
// Containers
// =============================================================

#[test]
fn new_document_has_widget_layer() {
    let d = doc();
    assert!(d.has_mount_point(WIDGET_LAYER_ID));
    assert!(d.containers().is_empty());
}

#[test]
fn ensure_container_creates_once() {
    let mut d = doc();
    d.ensure_container("weather", WIDGET_LAYER_ID).html = "a".into();
    d.ensure_container("weather", WIDGET_LAYER_ID).html.push('b');
    assert_eq!(d.containers().len(), 1);
    assert_eq!(d.container("weather").unwrap().html, "ab");
}

#[test]
fn set_hidden_toggles_visibility() {
    let mut d = doc();
    d.ensure_container("weather", WIDGET_LAYER_ID);
    assert!(d.set_hidden("weather", true));
    assert!(!d.container("weather").unwrap().is_visible());
    assert!(d.set_hidden("weather", false));
    assert!(d.container("weather").unwrap().is_visible());
}

#[test]
fn set_hidden_missing_container() {
    let mut d = doc();
    assert!(!d.set_hidden("ghost", true));
}

// =============================================================
// bounding_rect
// =============================================================

#[test]
fn bounding_rect_defaults() {
    let mut d = doc();
    d.ensure_container("a", WIDGET_LAYER_ID);
    let rect = d.bounding_rect("a").unwrap();
    assert_eq!(rect.left, 0.0);
    assert_eq!(rect.top, 0.0);
    assert_eq!(rect.width, DEFAULT_CONTAINER_WIDTH_PX);
    assert_eq!(rect.height, DEFAULT_CONTAINER_HEIGHT_PX);
}

#[test]
fn bounding_rect_uses_pixel_style() {
    let mut d = doc();
    let style = &mut d.ensure_container("a", WIDGET_LAYER_ID).style;
    style.left = Some("10px".into());
    style.top = Some("20px".into());
    style.width = Some("400px".into());
    style.height = Some("150px".into());
    let rect = d.bounding_rect("a").unwrap();
    assert_eq!((rect.left, rect.top, rect.width, rect.height), (10.0, 20.0, 400.0, 150.0));
}

#[test]
fn bounding_rect_resolves_right_anchor() {
    let mut d = doc();
    let style = &mut d.ensure_container("a", WIDGET_LAYER_ID).style;
    style.left = Some("auto".into());
    style.right = Some("50px".into());
    style.width = Some("200px".into());
    let rect = d.bounding_rect("a").unwrap();
    assert_eq!(rect.left, 750.0);
}

#[test]
fn bounding_rect_floors_at_minimums() {
    let mut d = doc();
    let style = &mut d.ensure_container("a", WIDGET_LAYER_ID).style;
    style.width = Some("100px".into());
    style.min_width = Some("320px".into());
    style.min_height = Some("320px".into());
    let rect = d.bounding_rect("a").unwrap();
    assert_eq!(rect.width, 320.0);
    assert_eq!(rect.height, 320.0);
}

#[test]
fn bounding_rect_missing_container() {
    assert!(doc().bounding_rect("ghost").is_none());
}

// =============================================================
// Head assets and body classes
// =============================================================

#[test]
fn insert_asset_is_idempotent() {
    let mut d = doc();
    assert!(d.insert_asset(AssetKind::Script, "/widgets/clock/main.js"));
    assert!(!d.insert_asset(AssetKind::Script, "/widgets/clock/main.js"));
    assert!(d.insert_asset(AssetKind::Stylesheet, "/widgets/clock/style.css"));
    assert_eq!(d.assets().len(), 2);
    assert!(d.has_asset(AssetKind::Script, "/widgets/clock/main.js"));
    assert!(!d.has_asset(AssetKind::Stylesheet, "/widgets/clock/main.js"));
}

#[test]
fn remove_asset_matches_kind_and_source() {
    let mut d = doc();
    d.insert_asset(AssetKind::Script, "/widgets/clock/main.js");
    d.insert_asset(AssetKind::Stylesheet, "/widgets/clock/style.css");
    assert!(!d.remove_asset(AssetKind::Stylesheet, "/widgets/clock/main.js"));
    assert!(d.remove_asset(AssetKind::Script, "/widgets/clock/main.js"));
    assert!(!d.remove_asset(AssetKind::Script, "/widgets/clock/main.js"));
    assert_eq!(d.assets().len(), 1);
}

#[test]
fn body_classes_add_remove() {
    let mut d = doc();
    d.add_body_class("is-dragging");
    assert!(d.has_body_class("is-dragging"));
    d.remove_body_class("is-dragging");
    assert!(!d.has_body_class("is-dragging"));
}

#[test]
fn viewport_can_change() {
    let mut d = doc();
    d.set_viewport(Size::new(640.0, 480.0));
    assert_eq!(d.viewport(), Size::new(640.0, 480.0));
}
