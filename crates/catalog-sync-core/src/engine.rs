// crates/catalog-sync-core/src/engine.rs
// ============================================================================
// Module: Sync Engine
// Description: Read/validate planning and staged commit for one catalog domain.
// Purpose: Run add, remove, and regenerate as one all-or-nothing transaction.
// Dependencies: cap-std, catalog-sync-config, catalog-sync-gen, tracing
// ============================================================================

//! ## Overview
//! [`SyncEngine::plan`] is the whole read/validate phase: it loads every
//! catalog, checks parity, applies the operation, validates the resulting
//! canonical key set, reads the current bindings artifact, and renders both
//! artifacts. Nothing is written until [`SyncPlan::commit`], which stages
//! every changed output before renaming any of them into place.
//!
//! ```text
//! plan:   load_all -> parity(except key) -> apply -> parity -> render
//! commit: stage(catalogs, declarations, bindings) -> rename all
//! ```
//!
//! Outputs whose content would not change are left out of the commit, so a
//! no-op operation touches no file.

use std::path::Path;
use std::path::PathBuf;

use cap_std::fs::Dir;
use catalog_sync_config::DomainConfig;
use catalog_sync_gen::BindingGenerator;
use catalog_sync_gen::BindingsTemplate;
use catalog_sync_gen::DeclarationsTemplate;
use tracing::debug;
use tracing::info;

use crate::SyncError;
use crate::catalog::CatalogSet;
use crate::catalog::Locale;
use crate::catalog::encode;
use crate::fsutil::io_error;
use crate::fsutil::read_text_file;
use crate::reconcile::CanonicalKeySet;
use crate::reconcile::Operation;
use crate::reconcile::canonical_key_set;
use crate::reconcile::check_parity_except;
use crate::staging::StagedWrites;
use crate::store::CatalogStore;

/// Maximum size of a generated artifact read back from disk.
pub const MAX_ARTIFACT_BYTES: u64 = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Reconciliation and generation engine for one domain.
///
/// # Invariants
/// - All reads happen in [`SyncEngine::plan`]; all writes in [`SyncPlan::commit`].
#[derive(Debug)]
pub struct SyncEngine {
    /// Project root handle.
    root: Dir,
    /// Domain name, for logs.
    domain: String,
    /// Locale catalogs of the domain.
    store: CatalogStore,
    /// Artifact renderer.
    generator: BindingGenerator,
    /// Declarations artifact path relative to the root.
    declarations_path: PathBuf,
    /// Bindings artifact path relative to the root.
    bindings_path: PathBuf,
}

impl SyncEngine {
    /// Builds an engine for `domain` below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Generation`] for invalid templates and
    /// [`SyncError::Io`] when the root handle cannot be duplicated.
    pub fn from_domain(root: &Dir, domain: &DomainConfig) -> Result<Self, SyncError> {
        let generator = BindingGenerator::new(
            DeclarationsTemplate {
                header: domain.declarations.header.clone(),
                line: domain.declarations.line.clone(),
                footer: domain.declarations.footer.clone(),
            },
            BindingsTemplate {
                anchor: domain.bindings.anchor.clone(),
                line: domain.bindings.line.clone(),
                trailer: domain.bindings.trailer.clone(),
            },
        )?;
        Ok(Self {
            root: root.try_clone().map_err(|err| io_error(Path::new("."), &err))?,
            domain: domain.name.clone(),
            store: CatalogStore::from_domain(root, domain)?,
            generator,
            declarations_path: domain.declarations.path.clone(),
            bindings_path: domain.bindings.path.clone(),
        })
    }

    /// Returns the domain's catalog store.
    #[must_use]
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Enumerates the domain's locales.
    ///
    /// # Errors
    ///
    /// Returns enumeration errors from [`CatalogStore::list_locales`].
    pub fn locales(&self) -> Result<Vec<Locale>, SyncError> {
        self.store.list_locales()
    }

    /// Plans `operation` without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidKey`], load errors, [`SyncError::KeySetDrift`]
    /// (other keys before the operation, any key after it),
    /// [`SyncError::KeyAlreadyExists`], or [`SyncError::AnchorNotFound`].
    pub fn plan(&self, operation: &Operation) -> Result<SyncPlan<'_>, SyncError> {
        operation.validate()?;
        let before = self.store.load_all()?;
        check_parity_except(&before, operation.key())?;
        let after = operation.apply(before.clone())?;
        let keys = canonical_key_set(&after)?;
        let changed: CatalogSet = after
            .into_iter()
            .filter(|(locale, catalog)| before.get(locale) != Some(catalog))
            .collect();
        info!(
            domain = %self.domain,
            operation = operation.kind(),
            key = operation.key(),
            changed_catalogs = changed.len(),
            "planned operation"
        );
        self.build_plan(before.keys().cloned().collect(), keys, &changed)
    }

    /// Plans regeneration of both artifacts from the current catalogs.
    ///
    /// # Errors
    ///
    /// Returns load errors, [`SyncError::KeySetDrift`],
    /// [`SyncError::InvalidKey`], or [`SyncError::AnchorNotFound`].
    pub fn regenerate(&self) -> Result<SyncPlan<'_>, SyncError> {
        let catalogs = self.store.load_all()?;
        let keys = canonical_key_set(&catalogs)?;
        info!(domain = %self.domain, keys = keys.len(), "planned regeneration");
        self.build_plan(catalogs.keys().cloned().collect(), keys, &CatalogSet::new())
    }

    /// Verifies catalog parity and reports stale artifacts.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`SyncEngine::regenerate`].
    pub fn check(&self) -> Result<CheckReport, SyncError> {
        let plan = self.regenerate()?;
        Ok(CheckReport {
            stale_artifacts: plan.writes.iter().map(|write| write.path.clone()).collect(),
            locales: plan.locales,
            keys: plan.keys,
        })
    }

    /// Renders artifacts and collects every write that changes a file.
    fn build_plan(
        &self,
        locales: Vec<Locale>,
        keys: CanonicalKeySet,
        changed: &CatalogSet,
    ) -> Result<SyncPlan<'_>, SyncError> {
        keys.validate_identifiers()?;
        let mut writes = Vec::with_capacity(changed.len() + 2);
        for (locale, catalog) in changed {
            let text = encode(catalog).map_err(|err| SyncError::MalformedCatalog {
                locale: locale.clone(),
                reason: err.to_string(),
            })?;
            writes.push(PlannedWrite {
                target: WriteTarget::Catalog(locale.clone()),
                path: self.store.catalog_path(locale),
                bytes: text.into_bytes(),
            });
        }

        let bindings_existing = read_text_file(&self.root, &self.bindings_path, MAX_ARTIFACT_BYTES)?
            .ok_or_else(|| SyncError::Io {
                path: self.bindings_path.clone(),
                message: "bindings artifact does not exist".to_string(),
            })?;
        let bindings = self
            .generator
            .render_bindings(
                &self.bindings_path.display().to_string(),
                &bindings_existing,
                keys.as_slice(),
            )?;
        let declarations = self.generator.render_declarations(keys.as_slice());
        let declarations_existing =
            read_text_file(&self.root, &self.declarations_path, MAX_ARTIFACT_BYTES)?;

        if declarations_existing.as_deref() != Some(declarations.as_str()) {
            writes.push(PlannedWrite {
                target: WriteTarget::Declarations,
                path: self.declarations_path.clone(),
                bytes: declarations.into_bytes(),
            });
        }
        if bindings_existing != bindings {
            writes.push(PlannedWrite {
                target: WriteTarget::Bindings,
                path: self.bindings_path.clone(),
                bytes: bindings.into_bytes(),
            });
        }
        debug!(domain = %self.domain, writes = writes.len(), "built plan");
        Ok(SyncPlan {
            engine: self,
            locales,
            keys,
            writes,
        })
    }
}

// ============================================================================
// SECTION: Plans
// ============================================================================

/// Output a planned write replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    /// A locale catalog.
    Catalog(Locale),
    /// The declarations artifact.
    Declarations,
    /// The bindings artifact.
    Bindings,
}

/// One file the plan will replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    /// Output kind.
    pub target: WriteTarget,
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Full replacement contents.
    pub bytes: Vec<u8>,
}

/// Fully validated, not yet written result of an operation.
///
/// # Invariants
/// - Every write differs from the file it replaces.
#[derive(Debug)]
pub struct SyncPlan<'engine> {
    /// Engine the plan was built by.
    engine: &'engine SyncEngine,
    /// Every locale of the domain.
    locales: Vec<Locale>,
    /// Canonical key set after the operation.
    keys: CanonicalKeySet,
    /// Changed outputs, catalogs first.
    writes: Vec<PlannedWrite>,
}

impl SyncPlan<'_> {
    /// Returns the domain's locales.
    #[must_use]
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// Returns the canonical key set the plan was rendered from.
    #[must_use]
    pub const fn keys(&self) -> &CanonicalKeySet {
        &self.keys
    }

    /// Returns the planned writes.
    #[must_use]
    pub fn writes(&self) -> &[PlannedWrite] {
        &self.writes
    }

    /// Returns true when committing would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }

    /// Stages every write and then renames them all into place.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Commit`] or [`SyncError::UnsafePath`]; when
    /// staging fails, no target is modified.
    pub fn commit(self) -> Result<SyncReport, SyncError> {
        let mut staged = StagedWrites::new(&self.engine.root)?;
        for write in &self.writes {
            staged.stage(&write.path, &write.bytes)?;
        }
        staged.commit()?;
        let mut report = SyncReport {
            key_count: self.keys.len(),
            ..SyncReport::default()
        };
        for write in self.writes {
            match write.target {
                WriteTarget::Catalog(locale) => report.catalogs_written.push(locale),
                WriteTarget::Declarations | WriteTarget::Bindings => {
                    report.artifacts_written.push(write.path);
                }
            }
        }
        info!(
            domain = %self.engine.domain,
            catalogs = report.catalogs_written.len(),
            artifacts = report.artifacts_written.len(),
            keys = report.key_count,
            "committed plan"
        );
        Ok(report)
    }
}

/// Summary of a committed plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Locales whose catalogs were rewritten.
    pub catalogs_written: Vec<Locale>,
    /// Artifacts that were rewritten.
    pub artifacts_written: Vec<PathBuf>,
    /// Canonical key count after the commit.
    pub key_count: usize,
}

/// Result of [`SyncEngine::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Every locale of the domain.
    pub locales: Vec<Locale>,
    /// Canonical key set shared by all catalogs.
    pub keys: CanonicalKeySet,
    /// Artifacts whose contents differ from a fresh regeneration.
    pub stale_artifacts: Vec<PathBuf>,
}

impl CheckReport {
    /// Returns true when every artifact is up to date.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stale_artifacts.is_empty()
    }
}
