// crates/catalog-sync-core/src/store.rs
// ============================================================================
// Module: Catalog Store
// Description: Enumeration, loading, and staged saving of locale catalogs.
// Purpose: Be the only component that touches the set of locale files.
// Dependencies: cap-std, catalog-sync-config, tracing
// ============================================================================

//! ## Overview
//! A store owns one catalog directory below the project root. Every regular
//! file named `{locale}.{extension}` is a locale catalog, except configured
//! manifest files and hidden files (which include staging temporaries).
//! Loading reads every catalog before returning and fails on the first
//! locale that cannot be read or decoded; saving stages every catalog before
//! committing any.

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use cap_std::fs::Dir;
use catalog_sync_config::DomainConfig;
use tracing::debug;

use crate::SyncError;
use crate::catalog::CatalogSet;
use crate::catalog::Locale;
use crate::catalog::decode;
use crate::catalog::encode;
use crate::fsutil::io_error;
use crate::fsutil::open_dir;
use crate::fsutil::read_bounded;
use crate::staging::StagedWrites;

/// Maximum size of one locale catalog.
pub const MAX_CATALOG_BYTES: u64 = 4 * 1024 * 1024;

/// Locale catalogs of one domain.
///
/// # Invariants
/// - `catalog_dir` is relative to `root`.
/// - Manifest names are never reported as locales.
#[derive(Debug)]
pub struct CatalogStore {
    /// Project root handle.
    root: Dir,
    /// Catalog directory relative to the root.
    catalog_dir: PathBuf,
    /// Catalog file extension without the leading dot.
    extension: String,
    /// File names excluded from enumeration.
    manifests: BTreeSet<String>,
}

impl CatalogStore {
    /// Creates a store for `catalog_dir` below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] when the root handle cannot be duplicated.
    pub fn new(
        root: &Dir,
        catalog_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        manifests: impl IntoIterator<Item = String>,
    ) -> Result<Self, SyncError> {
        let catalog_dir = catalog_dir.into();
        let root = root.try_clone().map_err(|err| io_error(&catalog_dir, &err))?;
        Ok(Self {
            root,
            catalog_dir,
            extension: extension.into(),
            manifests: manifests.into_iter().collect(),
        })
    }

    /// Creates a store from a domain configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] when the root handle cannot be duplicated.
    pub fn from_domain(root: &Dir, domain: &DomainConfig) -> Result<Self, SyncError> {
        Self::new(root, &domain.catalog_dir, &domain.extension, domain.manifests.iter().cloned())
    }

    /// Returns the catalog directory relative to the project root.
    #[must_use]
    pub fn catalog_dir(&self) -> &Path {
        &self.catalog_dir
    }

    /// Returns the catalog path of `locale` relative to the project root.
    #[must_use]
    pub fn catalog_path(&self, locale: &Locale) -> PathBuf {
        self.catalog_dir.join(self.file_name(locale))
    }

    /// Enumerates locales in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnsafePath`] when the directory or a catalog is a
    /// symlink and [`SyncError::Io`] when the directory cannot be listed.
    pub fn list_locales(&self) -> Result<Vec<Locale>, SyncError> {
        let dir = open_dir(&self.root, &self.catalog_dir)?;
        let entries = dir.entries().map_err(|err| io_error(&self.catalog_dir, &err))?;
        let suffix = format!(".{}", self.extension);
        let mut locales = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error(&self.catalog_dir, &err))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!(dir = %self.catalog_dir.display(), "skipping non-utf-8 file name");
                continue;
            };
            if name.starts_with('.') || self.manifests.contains(name) {
                continue;
            }
            let Some(stem) = name.strip_suffix(&suffix).filter(|stem| !stem.is_empty()) else {
                continue;
            };
            let file_type = entry.file_type().map_err(|err| io_error(&self.catalog_dir, &err))?;
            if file_type.is_symlink() {
                return Err(SyncError::UnsafePath(self.catalog_dir.join(name)));
            }
            if file_type.is_file() {
                locales.push(Locale::new(stem));
            }
        }
        locales.sort();
        Ok(locales)
    }

    /// Loads every locale catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoCatalogs`] when no locale exists,
    /// [`SyncError::CatalogLoad`] when a catalog cannot be read, and
    /// [`SyncError::MalformedCatalog`] when one cannot be decoded.
    pub fn load_all(&self) -> Result<CatalogSet, SyncError> {
        let locales = self.list_locales()?;
        if locales.is_empty() {
            return Err(SyncError::NoCatalogs {
                dir: self.catalog_dir.clone(),
            });
        }
        let dir = open_dir(&self.root, &self.catalog_dir)?;
        let mut catalogs = CatalogSet::new();
        for locale in locales {
            let bytes = read_bounded(&dir, Path::new(&self.file_name(&locale)), MAX_CATALOG_BYTES)
                .map_err(|failure| {
                    if failure.is_symlink() {
                        SyncError::UnsafePath(self.catalog_path(&locale))
                    } else {
                        SyncError::CatalogLoad {
                            locale: locale.clone(),
                            cause: failure.to_string(),
                        }
                    }
                })?;
            let text = String::from_utf8(bytes).map_err(|_| SyncError::MalformedCatalog {
                locale: locale.clone(),
                reason: "catalog is not valid utf-8".to_string(),
            })?;
            let catalog = decode(&text).map_err(|err| SyncError::MalformedCatalog {
                locale: locale.clone(),
                reason: err.to_string(),
            })?;
            debug!(locale = %locale, keys = catalog.len(), "loaded catalog");
            catalogs.insert(locale, catalog);
        }
        Ok(catalogs)
    }

    /// Encodes and stages every catalog in `catalogs`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedCatalog`] when a catalog cannot be
    /// encoded and staging errors from [`StagedWrites::stage`].
    pub fn stage_all(&self, staged: &mut StagedWrites, catalogs: &CatalogSet) -> Result<(), SyncError> {
        for (locale, catalog) in catalogs {
            let text = encode(catalog).map_err(|err| SyncError::MalformedCatalog {
                locale: locale.clone(),
                reason: err.to_string(),
            })?;
            staged.stage(&self.catalog_path(locale), text.as_bytes())?;
        }
        Ok(())
    }

    /// Persists every catalog in `catalogs` as one staged commit.
    ///
    /// # Errors
    ///
    /// Returns staging and commit errors; no catalog changes unless every
    /// catalog was staged.
    pub fn save_all(&self, catalogs: &CatalogSet) -> Result<Vec<PathBuf>, SyncError> {
        let mut staged = StagedWrites::new(&self.root)?;
        self.stage_all(&mut staged, catalogs)?;
        staged.commit()
    }

    /// Returns the file name of `locale`.
    fn file_name(&self, locale: &Locale) -> String {
        format!("{}.{}", locale.as_str(), self.extension)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
