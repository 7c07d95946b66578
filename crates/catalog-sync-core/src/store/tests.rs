// crates/catalog-sync-core/src/store/tests.rs
// ============================================================================
// Module: Catalog Store Tests
// Description: Unit coverage for locale enumeration, loading, and saving.
// Purpose: Pin down which files count as catalogs and how loads fail.
// Dependencies: catalog-sync-core, tempfile
// ============================================================================

//! ## Overview
//! Builds scratch catalog directories and drives the store against them.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::CatalogStore;
use super::MAX_CATALOG_BYTES;
use crate::SyncError;
use crate::catalog::Catalog;
use crate::catalog::CatalogSet;
use crate::catalog::Locale;
use crate::fsutil::open_root;

const DIR: &str = "assets/i18n";

fn scratch(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    let dir = temp.path().join(DIR);
    fs::create_dir_all(&dir).expect("catalog dir");
    for (name, contents) in files {
        fs::write(dir.join(name), contents).expect("seed");
    }
    temp
}

fn store(temp: &TempDir) -> Result<CatalogStore, SyncError> {
    let root = open_root(temp.path())?;
    CatalogStore::new(&root, DIR, "json", ["index.json".to_string()])
}

#[test]
fn list_locales_filters_manifests_hidden_and_foreign_files() -> Result<(), SyncError> {
    let temp = scratch(&[
        ("fr.json", "{}"),
        ("en-US.json", "{}"),
        ("index.json", "[\"en-US\", \"fr\"]"),
        (".tmp-fr.json.1.0", "{}"),
        ("notes.txt", "x"),
        (".json", "{}"),
    ]);
    fs::create_dir(temp.path().join(DIR).join("nested.json")).expect("dir");
    let locales = store(&temp)?.list_locales()?;
    assert_eq!(locales, vec![Locale::new("en-US"), Locale::new("fr")]);
    Ok(())
}

#[test]
fn load_all_reads_every_catalog() -> Result<(), SyncError> {
    let temp = scratch(&[("ca.json", "{\"HELLO\": \"Hola\"}"), ("en.json", "{\"HELLO\": \"Hi\"}")]);
    let catalogs = store(&temp)?.load_all()?;
    assert_eq!(catalogs.len(), 2);
    assert_eq!(catalogs[&Locale::new("ca")].get("HELLO"), Some("Hola"));
    Ok(())
}

#[test]
fn empty_directory_reports_no_catalogs() -> Result<(), SyncError> {
    let temp = scratch(&[("index.json", "[]")]);
    let err = store(&temp)?.load_all().expect_err("empty");
    assert!(matches!(err, SyncError::NoCatalogs { dir } if dir == Path::new(DIR)));
    Ok(())
}

#[test]
fn malformed_catalog_names_its_locale() -> Result<(), SyncError> {
    let temp = scratch(&[("en.json", "{\"A\": \"a\"}"), ("fr.json", "{\"A\": [\"a\"]}")]);
    let err = store(&temp)?.load_all().expect_err("malformed");
    assert!(matches!(err, SyncError::MalformedCatalog { locale, .. } if locale.as_str() == "fr"));
    Ok(())
}

#[test]
fn oversized_catalog_is_a_load_error() -> Result<(), SyncError> {
    let temp = scratch(&[("en.json", "{}")]);
    let size = usize::try_from(MAX_CATALOG_BYTES).expect("size") + 1;
    fs::write(temp.path().join(DIR).join("en.json"), vec![b' '; size]).expect("large");
    let err = store(&temp)?.load_all().expect_err("too large");
    assert!(matches!(err, SyncError::CatalogLoad { locale, .. } if locale.as_str() == "en"));
    Ok(())
}

#[test]
fn missing_directory_is_an_io_error() -> Result<(), SyncError> {
    let temp = TempDir::new().expect("tempdir");
    let err = store(&temp)?.list_locales().expect_err("missing");
    assert!(matches!(err, SyncError::Io { .. }));
    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_catalog_is_rejected() -> Result<(), SyncError> {
    let temp = scratch(&[("en.json", "{}")]);
    let outside = TempDir::new().expect("outside");
    fs::write(outside.path().join("fr.json"), "{}").expect("outside catalog");
    std::os::unix::fs::symlink(outside.path().join("fr.json"), temp.path().join(DIR).join("fr.json"))
        .expect("symlink");
    let err = store(&temp)?.list_locales().expect_err("symlink");
    assert!(matches!(err, SyncError::UnsafePath(path) if path.ends_with("fr.json")));
    Ok(())
}

#[test]
fn save_all_writes_canonical_text() -> Result<(), SyncError> {
    let temp = scratch(&[("en.json", "{\"B\":\"b\",\"A\":\"a\"}")]);
    let store = store(&temp)?;
    let mut catalogs = CatalogSet::new();
    catalogs.insert(Locale::new("en"), [("B", "b"), ("A", "a")].into_iter().collect::<Catalog>());
    let written = store.save_all(&catalogs)?;
    assert_eq!(written, vec![Path::new(DIR).join("en.json")]);
    let text = fs::read_to_string(temp.path().join(DIR).join("en.json")).expect("read");
    assert_eq!(text, "{\n  \"A\": \"a\",\n  \"B\": \"b\"\n}\n");
    Ok(())
}
