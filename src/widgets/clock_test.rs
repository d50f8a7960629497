use chrono::Utc;
use serde_json::json;

use super::*;

fn values(v: Value) -> StyleValues {
    v.as_object().cloned().unwrap()
}

// =============================================================
// Formatting
// =============================================================

#[test]
fn face_text_is_twelve_hour() {
    let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 9).unwrap();
    assert_eq!(face_text(&midnight), ("12:05:09 AM".to_owned(), "Monday".to_owned()));

    let afternoon = Utc.with_ymd_and_hms(2024, 1, 6, 15, 30, 0).unwrap();
    assert_eq!(face_text(&afternoon), ("03:30:00 PM".to_owned(), "Saturday".to_owned()));
}

// =============================================================
// Style
// =============================================================

#[test]
fn merge_takes_recognised_keys_only() {
    let mut style = ClockStyle::default();
    style.merge(&values(json!({ "align": "center", "timeColor": "#ff0000", "bogus": "x", "dayColor": "" })));

    assert_eq!(style.align, "center");
    assert_eq!(style.time_color, "#ff0000");
    assert_eq!(style.day_color, "#eaeaea");
}

#[test]
fn content_reflects_saved_styles() {
    let desc = content(&values(json!({ "align": "left" })));

    assert_eq!(desc.id, WIDGET_ID);
    assert!(desc.html.contains("clock-time"));
    let keys: Vec<&str> = desc.editable_settings.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, ["align", "timeColor", "dayColor"]);
    assert_eq!(desc.editable_settings[0].value, "left");
    assert_eq!(desc.editable_settings[0].options.len(), 3);
}

#[test]
fn update_style_restyles_live() {
    let hooks = ClockHooks::new(ClockStyle::default());
    hooks.update_style(&values(json!({ "dayColor": "#000000" })));

    let face = hooks.face();
    assert_eq!(face.style.day_color, "#000000");
    assert!(!face.time.is_empty());
}

// =============================================================
// Ticker lifecycle
// =============================================================

#[tokio::test(start_paused = true)]
async fn init_starts_ticker_and_destroy_stops_it() {
    let hooks = ClockHooks::new(ClockStyle::default());

    hooks.init();
    assert!(hooks.is_ticking());
    assert!(hooks.face().time.ends_with('M'));

    hooks.destroy();
    tokio::task::yield_now().await;
    assert!(!hooks.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn reinit_replaces_ticker() {
    let hooks = ClockHooks::new(ClockStyle::default());
    hooks.init();
    hooks.init();
    assert!(hooks.is_ticking());
    hooks.destroy();
    assert!(!hooks.is_ticking());
}

#[test]
fn init_without_runtime_still_draws() {
    let hooks = ClockHooks::new(ClockStyle::default());
    hooks.init();
    assert!(!hooks.face().day.is_empty());
    assert!(!hooks.is_ticking());
}
