// tests/context_store.rs

use std::sync::Arc;

use flowdag::context::{Context, ContextStore, ContextView};
use flowdag::errors::ContextError;

#[test]
fn second_write_is_rejected_and_first_value_kept() {
    let store = ContextStore::new();

    store.insert("a", 1).unwrap();
    let err = store.insert("a", 2).unwrap_err();

    assert_eq!(err, ContextError::AlreadyWritten("a".to_string()));
    assert_eq!(store.get("a").as_deref(), Some(&1));
    assert_eq!(store.len(), 1);
}

#[test]
fn seeded_store_rejects_writes_to_seed_keys() {
    let seed: Context<&str> = [("config", "prod")].into_iter().collect();
    let store = ContextStore::seeded(seed);

    assert!(store.insert("config", "dev").is_err());
    assert!(store.insert("other", "x").is_ok());
    assert_eq!(store.get("config").as_deref(), Some(&"prod"));
}

#[test]
fn view_reflects_later_writes_and_hands_out_shared_values() {
    let store = Arc::new(ContextStore::new());
    let view = ContextView::new(Arc::clone(&store));

    assert!(view.is_empty());
    assert!(view.require("a").is_err());

    store.insert("b", vec![2]).unwrap();
    store.insert("a", vec![1]).unwrap();

    assert_eq!(view.len(), 2);
    assert_eq!(view.keys(), vec!["a".to_string(), "b".to_string()]);

    let first = view.get("a").unwrap();
    let second = view.require("a").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let mut owned = view.get_cloned("a").unwrap();
    owned.push(99);
    assert_eq!(view.get("a").as_deref(), Some(&vec![1]));
}

#[test]
fn snapshot_is_detached_from_the_store() {
    let store = ContextStore::new();
    store.insert("a", 'a').unwrap();

    let snap = store.snapshot();
    store.insert("b", 'b').unwrap();

    assert_eq!(snap.keys(), vec!["a"]);
    assert_eq!(store.snapshot().keys(), vec!["a", "b"]);
}

#[test]
fn owned_context_insert_does_not_replace() {
    let mut ctx = Context::new();

    assert!(ctx.insert("k", 1));
    assert!(!ctx.insert("k", 2));
    assert_eq!(ctx.get("k"), Some(&1));

    let pairs: Vec<(&str, &i32)> = ctx.iter().collect();
    assert_eq!(pairs, vec![("k", &1)]);
    assert_eq!(ctx.into_inner().len(), 1);
}
