// crates/catalog-sync-core/src/reconcile.rs
// ============================================================================
// Module: Key Set Reconciler
// Description: Uniform add/remove across catalogs and key-set parity checks.
// Purpose: Keep every locale catalog on one shared, sorted key set.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! One [`Operation`] is applied per invocation, to every loaded catalog at
//! once. The canonical key set is the union of all catalogs' keys; it is only
//! valid when every catalog holds exactly that union.
//!
//! ## Invariants
//! - Add never overwrites an existing value that differs from the requested one.
//! - Add and remove are idempotent.
//! - Canonical keys are sorted by byte order.

use std::collections::BTreeSet;

use tracing::warn;

use crate::SyncError;
use crate::catalog::Catalog;
use crate::catalog::CatalogSet;
use crate::catalog::Locale;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// A single key change applied to every catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert `key -> value` into every catalog missing it.
    Add {
        /// Key to insert.
        key: String,
        /// Placeholder value shared by every locale.
        value: String,
    },
    /// Remove `key` from every catalog holding it.
    Remove {
        /// Key to remove.
        key: String,
    },
}

impl Operation {
    /// Returns the key the operation targets.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Add {
                key, ..
            }
            | Self::Remove {
                key,
            } => key,
        }
    }

    /// Returns a short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Add {
                ..
            } => "add",
            Self::Remove {
                ..
            } => "remove",
        }
    }

    /// Validates the operation's key.
    ///
    /// Added keys must be usable as generated identifiers; removed keys only
    /// need to be non-empty so stray keys can still be removed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidKey`].
    pub fn validate(&self) -> Result<(), SyncError> {
        match self {
            Self::Add {
                key, ..
            } => validate_key(key),
            Self::Remove {
                key,
            } if key.is_empty() => Err(SyncError::InvalidKey {
                key: key.clone(),
                reason: "key is empty".to_string(),
            }),
            Self::Remove {
                ..
            } => Ok(()),
        }
    }

    /// Applies the operation to every catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::KeyAlreadyExists`] for a conflicting add.
    pub fn apply(&self, catalogs: CatalogSet) -> Result<CatalogSet, SyncError> {
        match self {
            Self::Add {
                key,
                value,
            } => apply_add(catalogs, key, value),
            Self::Remove {
                key,
            } => Ok(apply_remove(catalogs, key)),
        }
    }
}

/// Inserts `key -> value` into every catalog missing `key`.
///
/// Catalogs already holding `key` with the same value are untouched.
///
/// # Errors
///
/// Returns [`SyncError::KeyAlreadyExists`] naming the first locale (in locale
/// order) that holds `key` with a different value; no catalog is changed.
pub fn apply_add(mut catalogs: CatalogSet, key: &str, value: &str) -> Result<CatalogSet, SyncError> {
    for (locale, catalog) in &catalogs {
        if let Some(existing) = catalog.get(key)
            && existing != value
        {
            return Err(SyncError::KeyAlreadyExists {
                key: key.to_string(),
                locale: locale.clone(),
                existing: existing.to_string(),
                requested: value.to_string(),
            });
        }
    }
    for catalog in catalogs.values_mut() {
        if !catalog.contains_key(key) {
            catalog.insert(key, value);
        }
    }
    Ok(catalogs)
}

/// Removes `key` from every catalog holding it. Absent keys are a no-op.
#[must_use]
pub fn apply_remove(mut catalogs: CatalogSet, key: &str) -> CatalogSet {
    for catalog in catalogs.values_mut() {
        catalog.remove(key);
    }
    catalogs
}

// ============================================================================
// SECTION: Canonical Key Set
// ============================================================================

/// Sorted, deduplicated keys shared by every catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalKeySet(Vec<String>);

impl CanonicalKeySet {
    /// Returns the keys in canonical order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no key is shared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when `key` is canonical.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.binary_search_by(|probe| probe.as_str().cmp(key)).is_ok()
    }

    /// Validates every key as a generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidKey`] for the first invalid key.
    pub fn validate_identifiers(&self) -> Result<(), SyncError> {
        self.0.iter().try_for_each(|key| validate_key(key))
    }
}

/// Computes the canonical key set and verifies every catalog holds it.
///
/// # Errors
///
/// Returns [`SyncError::KeySetDrift`] for the first drifting locale; every
/// drifting locale is logged.
pub fn canonical_key_set(catalogs: &CatalogSet) -> Result<CanonicalKeySet, SyncError> {
    parity(catalogs, None)
}

/// Verifies parity while ignoring `key`.
///
/// Used before an operation so that add and remove can repair a key that is
/// only partially present.
///
/// # Errors
///
/// Returns [`SyncError::KeySetDrift`] on drift in any other key.
pub fn check_parity_except(catalogs: &CatalogSet, key: &str) -> Result<(), SyncError> {
    parity(catalogs, Some(key)).map(|_| ())
}

/// Shared parity computation.
fn parity(catalogs: &CatalogSet, ignore: Option<&str>) -> Result<CanonicalKeySet, SyncError> {
    let key_sets: Vec<(&Locale, BTreeSet<&str>)> = catalogs
        .iter()
        .map(|(locale, catalog)| (locale, considered_keys(catalog, ignore)))
        .collect();
    let union: BTreeSet<&str> = key_sets.iter().flat_map(|(_, keys)| keys.iter().copied()).collect();
    let intersection: BTreeSet<&str> = union
        .iter()
        .copied()
        .filter(|key| key_sets.iter().all(|(_, keys)| keys.contains(key)))
        .collect();

    let mut first_drift = None;
    for (locale, keys) in &key_sets {
        let missing: Vec<String> = union.difference(keys).map(|key| (*key).to_string()).collect();
        if missing.is_empty() {
            continue;
        }
        let extra: Vec<String> =
            keys.difference(&intersection).map(|key| (*key).to_string()).collect();
        warn!(
            locale = %locale,
            missing = %missing.join(", "),
            extra = %extra.join(", "),
            "catalog key set drift"
        );
        if first_drift.is_none() {
            first_drift = Some(SyncError::KeySetDrift {
                locale: (*locale).clone(),
                missing,
                extra,
            });
        }
    }
    match first_drift {
        Some(err) => Err(err),
        None => Ok(CanonicalKeySet(union.into_iter().map(str::to_string).collect())),
    }
}

/// Returns the keys of `catalog`, minus `ignore`.
fn considered_keys<'a>(catalog: &'a Catalog, ignore: Option<&str>) -> BTreeSet<&'a str> {
    catalog.keys().filter(|key| Some(*key) != ignore).collect()
}

// ============================================================================
// SECTION: Key Validation
// ============================================================================

/// Validates that `key` can be emitted as a generated identifier.
///
/// Keys must match `[A-Za-z_][A-Za-z0-9_]*`. This is narrower than Dart
/// identifiers: `$` is rejected because binding lines embed the key in a
/// single-quoted Dart string (`map['{key}']`), where `$` starts an
/// interpolation.
///
/// # Errors
///
/// Returns [`SyncError::InvalidKey`].
pub fn validate_key(key: &str) -> Result<(), SyncError> {
    let invalid = |reason: &str| SyncError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("key is empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid("key must start with an ASCII letter or underscore"));
    }
    if !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(invalid("key may only contain ASCII letters, digits, and underscores"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
