// crates/catalog-sync-core/src/error.rs
// ============================================================================
// Module: Sync Errors
// Description: Error taxonomy for catalog loading, reconciliation, and commits.
// Purpose: Give every abort a stable, inspectable reason.
// Dependencies: catalog-sync-config, catalog-sync-gen, thiserror
// ============================================================================

//! ## Overview
//! Every failure aborts the whole operation; none is retried. Failures raised
//! during the read/validate phase ([`SyncError::MalformedCatalog`],
//! [`SyncError::CatalogLoad`], [`SyncError::KeySetDrift`],
//! [`SyncError::KeyAlreadyExists`], [`SyncError::AnchorNotFound`]) leave no
//! file modified.

use std::path::PathBuf;

use catalog_sync_config::ConfigError;
use catalog_sync_gen::GenError;
use thiserror::Error;

use crate::catalog::Locale;

/// Errors raised by the catalog sync engine.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A locale catalog is not a flat string-to-string record.
    #[error("malformed catalog `{locale}`: {reason}")]
    MalformedCatalog {
        /// Offending locale.
        locale: Locale,
        /// Decoder explanation.
        reason: String,
    },
    /// A locale catalog could not be read.
    #[error("failed to load catalog `{locale}`: {cause}")]
    CatalogLoad {
        /// Offending locale.
        locale: Locale,
        /// Underlying IO failure.
        cause: String,
    },
    /// Catalogs disagree on their key sets.
    #[error(
        "key set drift in `{locale}`: missing [{missing}], extra [{extra}]",
        missing = .missing.join(", "),
        extra = .extra.join(", ")
    )]
    KeySetDrift {
        /// First locale whose key set deviates.
        locale: Locale,
        /// Keys held by some catalog but absent from this one.
        missing: Vec<String>,
        /// Keys held by this catalog but absent from some other catalog.
        extra: Vec<String>,
    },
    /// An add would overwrite an existing, different value.
    #[error(
        "key `{key}` already exists in `{locale}` with value \"{existing}\" (requested \"{requested}\")"
    )]
    KeyAlreadyExists {
        /// Key being added.
        key: String,
        /// First locale holding a differing value.
        locale: Locale,
        /// Value already stored.
        existing: String,
        /// Value the add requested.
        requested: String,
    },
    /// The bindings artifact lacks its splice anchor.
    #[error("anchor `{anchor}` not found in {}", .artifact.display())]
    AnchorNotFound {
        /// Artifact path relative to the project root.
        artifact: PathBuf,
        /// Anchor literal that was expected.
        anchor: String,
    },
    /// A key cannot be emitted into generated source.
    #[error("invalid key `{key}`: {reason}")]
    InvalidKey {
        /// Rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The catalog directory holds no locale catalogs.
    #[error("no locale catalogs found in {}", .dir.display())]
    NoCatalogs {
        /// Directory that was enumerated.
        dir: PathBuf,
    },
    /// A path resolved through a symlink or outside the project root.
    #[error("unsafe path: {}", .0.display())]
    UnsafePath(PathBuf),
    /// IO failure outside catalog loading.
    #[error("io error at {}: {message}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO failure.
        message: String,
    },
    /// Staging or committing a write failed.
    #[error("commit failed at {}: {message}", .path.display())]
    Commit {
        /// Target path of the failed write.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
    /// Generator template failure.
    #[error("generation error: {0}")]
    Generation(String),
    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<GenError> for SyncError {
    fn from(err: GenError) -> Self {
        match err {
            GenError::AnchorNotFound {
                artifact,
                anchor,
            } => Self::AnchorNotFound {
                artifact: PathBuf::from(artifact),
                anchor,
            },
            other => Self::Generation(other.to_string()),
        }
    }
}
