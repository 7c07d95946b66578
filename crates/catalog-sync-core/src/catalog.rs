// crates/catalog-sync-core/src/catalog.rs
// ============================================================================
// Module: Catalog Codec
// Description: Locale catalogs and their canonical JSON form.
// Purpose: Parse and serialize flat string-to-string catalogs deterministically.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A catalog is a flat JSON object mapping keys to string values, one per
//! locale. Decoding rejects anything else: nested values, non-string values,
//! non-object roots, and duplicate keys (which a lenient parser would
//! silently collapse). Encoding is canonical: keys sorted by byte order,
//! two-space indentation, non-ASCII text written literally, and exactly one
//! trailing newline.
//!
//! ## Invariants
//! - `decode(&encode(c)?)? == c` for every catalog `c`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de;
use serde::de::MapAccess;
use serde::de::Visitor;
use thiserror::Error;

// ============================================================================
// SECTION: Locale
// ============================================================================

/// Identifier naming one locale catalog (for example `en-US` or `fr`).
///
/// Locales are derived from catalog file names; the engine never creates or
/// destroys them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locale(String);

impl Locale {
    /// Creates a locale identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Flat key-to-value record for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<String, String>);

/// Every loaded catalog, keyed and ordered by locale.
pub type CatalogSet = BTreeMap<Locale, Catalog>;

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true when the catalog holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value when present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Iterates keys in byte order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Catalog {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Strict visitor for flat string records.
struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a flat object of string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some(key) = access.next_key::<String>()? {
            if entries.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate key `{key}`")));
            }
            let value = access
                .next_value::<String>()
                .map_err(|err| de::Error::custom(format!("value of `{key}`: {err}")))?;
            entries.insert(key, value);
        }
        Ok(Catalog(entries))
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Catalog text could not be decoded or encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CodecError(String);

/// Parses catalog text. A leading byte-order mark is ignored.
///
/// # Errors
///
/// Returns [`CodecError`] when the text is not a flat object of unique keys
/// with string values.
pub fn decode(text: &str) -> Result<Catalog, CodecError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    serde_json::from_str(text).map_err(|err| CodecError(err.to_string()))
}

/// Serializes a catalog in canonical form.
///
/// # Errors
///
/// Returns [`CodecError`] when serialization fails.
pub fn encode(catalog: &Catalog) -> Result<String, CodecError> {
    let mut text = serde_json::to_string_pretty(catalog).map_err(|err| CodecError(err.to_string()))?;
    text.push('\n');
    Ok(text)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use proptest::prelude::*;

    use super::Catalog;
    use super::decode;
    use super::encode;

    #[test]
    fn encode_sorts_keys_and_keeps_non_ascii_literal() {
        let catalog: Catalog = [("HELLO", "Salut"), ("BYE", "Adéu 👋")].into_iter().collect();
        let text = encode(&catalog).expect("encode");
        assert_eq!(text, "{\n  \"BYE\": \"Adéu 👋\",\n  \"HELLO\": \"Salut\"\n}\n");
    }

    #[test]
    fn empty_catalog_encodes_as_empty_object() {
        assert_eq!(encode(&Catalog::new()).expect("encode"), "{}\n");
    }

    #[test]
    fn decode_accepts_byte_order_mark() {
        let catalog = decode("\u{feff}{\"A\": \"a\"}").expect("decode");
        assert_eq!(catalog.get("A"), Some("a"));
    }

    #[test]
    fn decode_rejects_nested_values() {
        let err = decode("{\"A\": {\"B\": \"b\"}}").expect_err("nested");
        assert!(err.to_string().contains("value of `A`"), "{err}");
    }

    #[test]
    fn decode_rejects_non_string_values() {
        assert!(decode("{\"A\": 1}").is_err());
        assert!(decode("{\"A\": null}").is_err());
    }

    #[test]
    fn decode_rejects_non_object_roots() {
        assert!(decode("[\"A\"]").is_err());
        assert!(decode("\"A\"").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn decode_rejects_duplicate_keys() {
        let err = decode("{\"A\": \"1\", \"A\": \"2\"}").expect_err("duplicate");
        assert!(err.to_string().contains("duplicate key `A`"), "{err}");
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(entries in prop::collection::btree_map(".{0,12}", ".{0,24}", 0 .. 16)) {
            let catalog = Catalog::from(entries);
            let text = encode(&catalog).expect("encode");
            prop_assert_eq!(decode(&text).expect("decode"), catalog);
        }
    }
}
