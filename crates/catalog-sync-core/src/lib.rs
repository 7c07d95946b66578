// crates/catalog-sync-core/src/lib.rs
// ============================================================================
// Module: Catalog Sync Core
// Description: Key-set reconciliation across locale catalogs with staged commits.
// Purpose: Apply one key change to every catalog and regenerate bindings atomically.
// Dependencies: cap-primitives, cap-std, catalog-sync-config, catalog-sync-gen, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! The core crate owns the catalog side of a key change:
//!
//! - [`catalog`]: the flat catalog model and its canonical JSON codec.
//! - [`store`]: enumeration and loading of every locale catalog of a domain.
//! - [`reconcile`]: add/remove applied uniformly, plus key-set parity.
//! - [`staging`]: temp-file staging with a rename-only commit.
//! - [`engine`]: planning and committing one operation as a transaction.
//!
//! The engine is headless: confirmation, if any, is resolved by the caller
//! before [`SyncPlan::commit`] is invoked.
//!
//! ## Index
//! - Engine: [`SyncEngine`], [`SyncPlan`], [`SyncReport`], [`CheckReport`]
//! - Operations: [`Operation`], [`CanonicalKeySet`]
//! - Errors: [`SyncError`]

pub mod catalog;
pub mod engine;
pub mod error;
pub mod fsutil;
pub mod reconcile;
pub mod staging;
pub mod store;

pub use catalog::Catalog;
pub use catalog::CatalogSet;
pub use catalog::Locale;
pub use engine::CheckReport;
pub use engine::PlannedWrite;
pub use engine::SyncEngine;
pub use engine::SyncPlan;
pub use engine::SyncReport;
pub use engine::WriteTarget;
pub use error::SyncError;
pub use reconcile::CanonicalKeySet;
pub use reconcile::Operation;
pub use staging::StagedWrites;
pub use store::CatalogStore;
