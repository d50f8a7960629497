use serde_json::json;

use super::*;
use crate::widget::SettingKind;

fn doc() -> StyleSettingsMap {
    serde_json::from_value(json!({
        "clock": { "timeColor": "#ff0000", "extra": [1, 2] }
    }))
    .unwrap()
}

#[test]
fn saved_for_unknown_widget_is_empty() {
    assert!(saved_for(&doc(), "weather").is_empty());
}

#[test]
fn value_prefers_saved_over_default() {
    let saved = saved_for(&doc(), "clock");
    let time = SettingSpec::new("timeColor", "Time Color", SettingKind::Color, "#ffffff");
    let day = SettingSpec::new("dayColor", "Day Color", SettingKind::Color, "#cccccc");
    assert_eq!(value_for(&saved, &time), json!("#ff0000"));
    assert_eq!(value_for(&saved, &day), json!("#cccccc"));
}

#[test]
fn store_replaces_entry_and_round_trips_opaque_values() {
    let mut styles = doc();
    let mut values = StyleValues::new();
    values.insert("align".into(), json!("left"));
    store(&mut styles, "clock", values);

    assert_eq!(serde_json::to_value(&styles).unwrap(), json!({ "clock": { "align": "left" } }));
}

#[test]
fn unknown_fields_survive_round_trip() {
    let styles = doc();
    let value = serde_json::to_value(&styles).unwrap();
    assert_eq!(value["clock"]["extra"], json!([1, 2]));
}
