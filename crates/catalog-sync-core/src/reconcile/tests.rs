// crates/catalog-sync-core/src/reconcile/tests.rs
// ============================================================================
// Module: Key Set Reconciler Tests
// Description: Unit and property coverage for add/remove and parity checks.
// Purpose: Lock in idempotence, overwrite protection, and drift reporting.
// Dependencies: catalog-sync-core, proptest
// ============================================================================

//! ## Overview
//! Exercises reconciliation against in-memory catalog sets.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use proptest::prelude::*;

use super::Operation;
use super::apply_add;
use super::apply_remove;
use super::canonical_key_set;
use super::check_parity_except;
use super::validate_key;
use crate::SyncError;
use crate::catalog::Catalog;
use crate::catalog::CatalogSet;
use crate::catalog::Locale;

fn catalogs(entries: Vec<(&str, Vec<(&str, &str)>)>) -> CatalogSet {
    entries
        .into_iter()
        .map(|(locale, pairs)| (Locale::new(locale), pairs.into_iter().collect::<Catalog>()))
        .collect()
}

fn hello_catalogs() -> CatalogSet {
    catalogs(vec![
        ("en", vec![("HELLO", "Hi")]),
        ("es", vec![("HELLO", "Hola")]),
        ("fr", vec![("HELLO", "Salut")]),
    ])
}

#[test]
fn add_inserts_shared_value_into_every_catalog() -> Result<(), SyncError> {
    let updated = apply_add(hello_catalogs(), "BYE", "Bye")?;
    for catalog in updated.values() {
        assert_eq!(catalog.get("BYE"), Some("Bye"));
        assert!(catalog.contains_key("HELLO"));
    }
    assert_eq!(updated[&Locale::new("fr")].get("HELLO"), Some("Salut"));
    assert_eq!(canonical_key_set(&updated)?.as_slice(), ["BYE", "HELLO"]);
    Ok(())
}

#[test]
fn add_with_same_value_is_a_no_op() -> Result<(), SyncError> {
    let once = apply_add(hello_catalogs(), "BYE", "Bye")?;
    let twice = apply_add(once.clone(), "BYE", "Bye")?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn add_with_different_value_is_rejected_without_changes() -> Result<(), SyncError> {
    let once = apply_add(hello_catalogs(), "BYE", "Bye")?;
    let err = apply_add(once, "BYE", "Goodbye").expect_err("conflict");
    match err {
        SyncError::KeyAlreadyExists {
            key,
            locale,
            existing,
            requested,
        } => {
            assert_eq!(key, "BYE");
            assert_eq!(locale, Locale::new("en"));
            assert_eq!(existing, "Bye");
            assert_eq!(requested, "Goodbye");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn add_protects_translated_values_even_when_one_locale_lacks_the_key() {
    let partial = catalogs(vec![("en", vec![("BYE", "Bye")]), ("fr", vec![("BYE", "Au revoir")]), ("it", vec![])]);
    let err = apply_add(partial, "BYE", "Bye").expect_err("conflict");
    assert!(matches!(err, SyncError::KeyAlreadyExists { locale, .. } if locale.as_str() == "fr"));
}

#[test]
fn remove_drops_key_everywhere_and_repeats_as_no_op() -> Result<(), SyncError> {
    let both = apply_add(hello_catalogs(), "BYE", "Bye")?;
    let once = apply_remove(both, "BYE");
    assert_eq!(once, hello_catalogs());
    let twice = apply_remove(once.clone(), "BYE");
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn removing_the_last_key_leaves_an_empty_canonical_set() -> Result<(), SyncError> {
    let set = apply_remove(hello_catalogs(), "HELLO");
    let keys = canonical_key_set(&set)?;
    assert!(keys.is_empty());
    assert_eq!(keys.len(), 0);
    assert!(!keys.contains("HELLO"));
    for catalog in set.values() {
        assert!(catalog.is_empty());
    }
    Ok(())
}

#[test]
fn drift_reports_first_locale_with_missing_and_extra_keys() {
    let drifted = catalogs(vec![
        ("en", vec![("A", "a"), ("B", "b")]),
        ("fr", vec![("A", "a"), ("C", "c")]),
        ("it", vec![("A", "a"), ("B", "b"), ("C", "c")]),
    ]);
    match canonical_key_set(&drifted).expect_err("drift") {
        SyncError::KeySetDrift {
            locale,
            missing,
            extra,
        } => {
            assert_eq!(locale, Locale::new("en"));
            assert_eq!(missing, vec!["C".to_string()]);
            assert_eq!(extra, vec!["B".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parity_check_ignores_the_operation_key() -> Result<(), SyncError> {
    let partial = catalogs(vec![("en", vec![("A", "a"), ("B", "b")]), ("fr", vec![("A", "a")])]);
    check_parity_except(&partial, "B")?;
    assert!(check_parity_except(&partial, "A").is_err());
    let repaired = Operation::Add {
        key: "B".to_string(),
        value: "b".to_string(),
    }
    .apply(partial)?;
    assert_eq!(canonical_key_set(&repaired)?.as_slice(), ["A", "B"]);
    Ok(())
}

#[test]
fn canonical_order_is_byte_order() -> Result<(), SyncError> {
    let set = catalogs(vec![("en", vec![("b", "1"), ("B", "2"), ("_a", "3"), ("A2", "4"), ("A10", "5")])]);
    assert_eq!(canonical_key_set(&set)?.as_slice(), ["A10", "A2", "B", "_a", "b"]);
    Ok(())
}

#[test]
fn key_validation_matches_identifier_rules() {
    assert!(validate_key("HELLO_WORLD").is_ok());
    assert!(validate_key("_private2").is_ok());
    assert!(validate_key("").is_err());
    assert!(validate_key("2FA").is_err());
    assert!(validate_key("HELLO-WORLD").is_err());
    assert!(validate_key("I'M").is_err());
    assert!(validate_key("CAFÉ").is_err());
    assert!(validate_key("$price").is_err());
    assert!(validate_key("PRICE_$").is_err());
}

#[test]
fn remove_accepts_non_identifier_keys() {
    let remove = Operation::Remove {
        key: "bad-key".to_string(),
    };
    assert!(remove.validate().is_ok());
    assert_eq!(remove.kind(), "remove");
    assert_eq!(remove.key(), "bad-key");
    let empty = Operation::Remove {
        key: String::new(),
    };
    assert!(matches!(empty.validate(), Err(SyncError::InvalidKey { .. })));
}

fn consistent_sets() -> impl Strategy<Value = CatalogSet> {
    (
        prop::collection::btree_set("[A-Z]{1,4}", 0 .. 6),
        prop::collection::btree_set("[a-z]{2}", 1 .. 4),
    )
        .prop_map(|(keys, locales)| {
            locales
                .into_iter()
                .map(|locale| {
                    let catalog: Catalog =
                        keys.iter().map(|key| (key.clone(), format!("{locale}:{key}"))).collect();
                    (Locale::new(locale), catalog)
                })
                .collect::<CatalogSet>()
        })
}

proptest! {
    #[test]
    fn add_is_idempotent_and_preserves_parity(set in consistent_sets(), key in "[A-Z]{1,4}") {
        let value = "placeholder";
        match apply_add(set.clone(), &key, value) {
            Ok(once) => {
                let twice = apply_add(once.clone(), &key, value).expect("second add");
                prop_assert_eq!(&once, &twice);
                let keys = canonical_key_set(&once).expect("parity");
                prop_assert!(keys.contains(&key));
            }
            Err(SyncError::KeyAlreadyExists { .. }) => {
                prop_assert!(set.values().any(|catalog| catalog.contains_key(&key)));
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn remove_is_idempotent_and_preserves_parity(set in consistent_sets(), key in "[A-Z]{1,4}") {
        let once = apply_remove(set, &key);
        let twice = apply_remove(once.clone(), &key);
        prop_assert_eq!(&once, &twice);
        let keys = canonical_key_set(&once).expect("parity");
        prop_assert!(!keys.contains(&key));
    }
}
