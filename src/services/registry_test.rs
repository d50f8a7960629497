use serde_json::json;

use super::*;
use crate::net::backend::test_helpers::MemoryBackend;

#[tokio::test]
async fn loads_entries_in_document_order() {
    let backend = MemoryBackend::new().with_document(
        REGISTRY_PATH,
        json!({ "widgets": [
            { "id": "clock", "folder": "clock", "name": "Clock" },
            { "id": "weather", "folder": "weather", "name": "Weather" }
        ]}),
    );

    let entries = load_registry(&backend).await;

    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["clock", "weather"]);
}

#[tokio::test]
async fn missing_registry_is_empty() {
    let backend = MemoryBackend::new();
    assert!(load_registry(&backend).await.is_empty());
}

#[tokio::test]
async fn malformed_registry_is_empty() {
    let backend = MemoryBackend::new().with_malformed(REGISTRY_PATH, "{\"widgets\": [");
    assert!(load_registry(&backend).await.is_empty());
}

#[tokio::test]
async fn wrong_shape_is_empty() {
    let backend = MemoryBackend::new().with_document(REGISTRY_PATH, json!({ "items": [] }));
    assert!(load_registry(&backend).await.is_empty());
}
