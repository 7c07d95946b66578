// crates/catalog-sync-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Unit Tests
// Description: Catalog parity and locale parsing checks.
// Purpose: Keep the English and Catalan catalogs interchangeable.
// Dependencies: catalog-sync-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies both catalogs define the same keys exactly once, with the same
//! placeholders, and that locale parsing tolerates region tags.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use std::collections::BTreeSet;

use super::Locale;
use super::MessageArg;
use super::SUPPORTED_LOCALES;
use super::catalog_entries_for;
use super::catalog_for;
use super::translate;

/// Extracts `{name}` placeholders, rejecting malformed braces.
fn placeholders(template: &str) -> Result<BTreeSet<&str>, String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open ..].starts_with('}') {
            return Err(format!("unmatched '}}' in {template:?}"));
        }
        let after = &rest[open + 1 ..];
        let close = after.find('}').ok_or_else(|| format!("unclosed '{{' in {template:?}"))?;
        let name = &after[.. close];
        if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_lowercase() || ch == '_') {
            return Err(format!("invalid placeholder {name:?} in {template:?}"));
        }
        names.insert(name);
        rest = &after[close + 1 ..];
    }
    Ok(names)
}

#[test]
fn catalogs_define_the_same_keys() {
    let english: BTreeSet<&str> = catalog_for(Locale::En).keys().copied().collect();
    for locale in SUPPORTED_LOCALES {
        let keys: BTreeSet<&str> = catalog_for(*locale).keys().copied().collect();
        assert_eq!(english, keys, "catalog keys differ for {}", locale.as_str());
    }
}

#[test]
fn catalogs_define_each_key_once() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let unique: BTreeSet<&str> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(unique.len(), entries.len(), "duplicate keys in {}", locale.as_str());
    }
}

#[test]
fn translations_keep_english_placeholders() {
    for (key, english) in catalog_entries_for(Locale::En) {
        let expected = placeholders(english).expect("english placeholders");
        for locale in SUPPORTED_LOCALES {
            let template = catalog_for(*locale).get(key).copied().expect("key present");
            let actual = placeholders(template)
                .unwrap_or_else(|err| panic!("{key} in {}: {err}", locale.as_str()));
            assert_eq!(expected, actual, "placeholder mismatch for {key} in {}", locale.as_str());
        }
    }
}

#[test]
fn catalan_differs_for_prose_messages() {
    for key in ["prompt.declined", "config.validate.ok", "i18n.disclaimer.machine_translated"] {
        assert_ne!(catalog_for(Locale::En).get(key), catalog_for(Locale::Ca).get(key), "{key}");
    }
}

#[test]
fn locale_parse_accepts_region_tags_and_case() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("EN_us"), Some(Locale::En));
    assert_eq!(Locale::parse("en_US.UTF-8"), Some(Locale::En));
    assert_eq!(Locale::parse("ca-ES"), Some(Locale::Ca));
    assert_eq!(Locale::parse(" ca "), Some(Locale::Ca));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("fr"), None);
}

#[test]
fn translate_substitutes_every_argument() {
    let output = translate(
        "add.confirm",
        vec![MessageArg::new("key", "BYE"), MessageArg::new("value", "Bye")],
    );
    assert_eq!(output, "Add BYE = Bye?");
}

#[test]
fn translate_leaves_missing_arguments_visible() {
    let output = translate("add.confirm", vec![MessageArg::new("key", "BYE")]);
    assert_eq!(output, "Add BYE = {value}?");
}

#[test]
fn substituted_values_are_not_expanded_again() {
    let output = translate(
        "add.confirm",
        vec![MessageArg::new("key", "{value}"), MessageArg::new("value", "X")],
    );
    assert_eq!(output, "Add {value} = X?");
}

#[test]
fn unclosed_braces_are_kept_verbatim() {
    let output = translate("no such key {open", vec![MessageArg::new("open", "x")]);
    assert_eq!(output, "no such key {open");
}
