use serde_json::json;

use super::*;

// =============================================================
// Alias table
// =============================================================

#[test]
fn clock_maps_to_live_clock_container() {
    assert_eq!(container_id_for("clock"), "live-clock");
    assert_eq!(widget_id_for("live-clock"), "clock");
}

#[test]
fn other_ids_map_to_themselves() {
    assert_eq!(container_id_for("weather"), "weather");
    assert_eq!(widget_id_for("traffic-data"), "traffic-data");
}

#[test]
fn alias_constants_agree_with_table() {
    assert_eq!(container_id_for(CLOCK_WIDGET_ID), CLOCK_CONTAINER_ID);
}

// =============================================================
// parse_registry
// =============================================================

#[test]
fn parse_registry_builds_pending_entries() {
    let entries = parse_registry(json!({
        "widgets": [
            { "id": "clock", "folder": "clock", "name": "Clock" },
            { "id": "weather", "folder": "weather", "name": "Weather" }
        ]
    }))
    .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "clock");
    assert_eq!(entries[0].status, EntryStatus::Pending);
    assert_eq!(entries[1].name, "Weather");
}

#[test]
fn parse_registry_drops_duplicate_ids() {
    let entries = parse_registry(json!({
        "widgets": [
            { "id": "clock", "folder": "clock", "name": "Clock" },
            { "id": "clock", "folder": "clock-v2", "name": "Clock 2" }
        ]
    }))
    .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].folder, "clock");
}

#[test]
fn parse_registry_rejects_wrong_shape() {
    assert!(parse_registry(json!({ "items": [] })).is_err());
    assert!(parse_registry(json!([1, 2, 3])).is_err());
    assert!(parse_registry(json!({ "widgets": [{ "id": "x" }] })).is_err());
}

// =============================================================
// RegistryEntry status transitions
// =============================================================

#[test]
fn entry_status_transitions() {
    let mut entry = RegistryEntry::new("weather", "weather", "Weather");
    entry.mark_error("no provider");
    assert_eq!(entry.status, EntryStatus::Error);
    assert_eq!(entry.error.as_deref(), Some("no provider"));

    entry.mark_loaded();
    assert_eq!(entry.status, EntryStatus::Loaded);
    assert!(entry.error.is_none());

    entry.mark_missing();
    assert_eq!(entry.status, EntryStatus::Missing);
}

#[test]
fn entry_status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&EntryStatus::Missing).unwrap(), "\"missing\"");
}

// =============================================================
// Registry
// =============================================================

#[test]
fn prune_missing_removes_only_missing() {
    let mut clock = RegistryEntry::new("clock", "clock", "Clock");
    clock.mark_loaded();
    let mut weather = RegistryEntry::new("weather", "weather", "Weather");
    weather.mark_missing();
    let mut broken = RegistryEntry::new("broken", "broken", "Broken");
    broken.mark_error("no provider");

    let mut registry = Registry::new(vec![clock, weather, broken]);
    let pruned = registry.prune_missing();

    assert_eq!(pruned, vec!["weather".to_owned()]);
    assert_eq!(registry.len(), 2);
    assert!(registry.get("weather").is_none());
    assert!(registry.get("broken").is_some());
}

#[test]
fn registry_lookup_by_container_uses_alias() {
    let registry = Registry::new(vec![RegistryEntry::new("clock", "clock", "Clock")]);
    assert_eq!(registry.by_container("live-clock").map(|e| e.id.as_str()), Some("clock"));
    assert_eq!(registry.container_ids(), vec!["live-clock".to_owned()]);
}

#[test]
fn registry_new_keeps_first_duplicate() {
    let registry = Registry::new(vec![
        RegistryEntry::new("clock", "a", "A"),
        RegistryEntry::new("clock", "b", "B"),
    ]);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.entries()[0].folder, "a");
}

#[test]
fn empty_registry() {
    let registry = Registry::default();
    assert!(registry.is_empty());
    assert!(registry.container_ids().is_empty());
}
