//! Cart and settings state persisted to disk between client sessions

use orbit_client::{CartItem, CartStore, FileStorage, SettingsStore};
use tempfile::TempDir;

fn espresso(quantity: i32) -> CartItem {
    CartItem {
        id: 42,
        name: "Espresso".into(),
        price: 3.25,
        quantity,
        size: Some("Double".into()),
        image: None,
    }
}

#[test]
fn cart_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut cart = CartStore::load(FileStorage::new(temp_dir.path())).unwrap();
        cart.add(espresso(1)).unwrap();
        cart.add(espresso(2)).unwrap();
    }

    let mut cart = CartStore::load(FileStorage::new(temp_dir.path())).unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total(), 9.75);

    cart.clear().unwrap();
    let cart = CartStore::load(FileStorage::new(temp_dir.path())).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn settings_start_unhydrated() {
    let temp_dir = TempDir::new().unwrap();
    let store = SettingsStore::load(FileStorage::new(temp_dir.path())).unwrap();
    assert!(!store.is_hydrated());
    assert!(store.get().is_none());
    assert!(store.cached().is_none());
}
