//! Cart sessions saved to disk and restored in a later process.

#![allow(clippy::unwrap_used)]

use menu_cart_core::cart::CartEngine;
use menu_cart_core::customization::{Selection, SelectionKind};
use menu_cart_core::persistence::PersistenceError;
use menu_cart_core::types::CatalogItemId;
use menu_cart_integration_tests::{burger, menu_item, vendor};
use menu_cart_storefront::persistence::JsonFileStore;

#[test]
fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions").join("cart.json");

    let original = {
        let mut engine = CartEngine::restore(JsonFileStore::new(&path)).unwrap();
        assert!(engine.cart().is_empty());

        let large = Selection::new().with("Size", "Large", SelectionKind::Single);
        engine
            .add_orderable(&vendor("v1"), &burger("v1"), 2, &large, Some("no onions".to_string()))
            .unwrap();
        engine.toggle_favorite(&CatalogItemId::new("burger-1")).unwrap();
        engine.cart().clone()
    };

    let restored = CartEngine::restore(JsonFileStore::new(&path)).unwrap();
    assert_eq!(*restored.cart(), original);
    assert!(restored.is_favorite(&CatalogItemId::new("burger-1")));
    assert_eq!(
        restored.cart().items()[0].special_instructions.as_deref(),
        Some("no onions")
    );
}

#[test]
fn test_cleared_session_restores_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");

    let mut engine = CartEngine::new(JsonFileStore::new(&path));
    engine
        .add_orderable(&vendor("v1"), &menu_item("a", "v1", 1000), 1, &Selection::new(), None)
        .unwrap();
    engine.clear().unwrap();

    let restored = CartEngine::restore(JsonFileStore::new(&path)).unwrap();
    assert!(restored.cart().is_empty());
    assert!(restored.cart().vendor().is_none());
}

#[test]
fn test_unreadable_session_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");
    std::fs::write(&path, b"{ not json").unwrap();

    assert!(matches!(
        CartEngine::restore(JsonFileStore::new(&path)),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn test_tampered_session_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");

    let mut engine = CartEngine::new(JsonFileStore::new(&path));
    engine
        .add_orderable(&vendor("v1"), &menu_item("a", "v1", 1000), 1, &Selection::new(), None)
        .unwrap();

    let mut json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    json["cart"]["vendor"] = serde_json::Value::Null;
    std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    assert!(matches!(
        CartEngine::restore(JsonFileStore::new(&path)),
        Err(PersistenceError::DataCorruption(_))
    ));
}
