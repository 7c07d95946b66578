// crates/catalog-sync-config/src/lib.rs
// ============================================================================
// Module: Catalog Sync Config
// Description: Configuration model for catalog domains and generated artifacts.
// Purpose: Load, validate, and expose the settings that parameterize one engine.
// Dependencies: catalog-sync-gen, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Catalog Sync is configured through a single TOML file describing one or
//! more catalog *domains*. A domain names the directory holding the per-locale
//! catalogs, the index files that must never be treated as catalogs, and the
//! two generated artifacts (declarations and anchored bindings) together with
//! their opaque boilerplate text.
//!
//! When no config file exists the built-in defaults describe a single
//! `translations` domain; see [`defaults`].
//!
//! ## Index
//! - Model: [`CatalogSyncConfig`], [`DomainConfig`], [`DeclarationsConfig`], [`BindingsConfig`]
//! - Loading: [`CatalogSyncConfig::load`], [`CONFIG_ENV`], [`DEFAULT_CONFIG_PATH`]
//! - Errors: [`ConfigError`]

pub mod config;
pub mod defaults;

pub use config::BindingsConfig;
pub use config::CONFIG_ENV;
pub use config::CatalogSyncConfig;
pub use config::ConfigError;
pub use config::ConfigurationGenConfig;
pub use config::DEFAULT_CONFIG_PATH;
pub use config::DeclarationsConfig;
pub use config::DomainConfig;
pub use config::MAX_CONFIG_BYTES;
pub use config::ProjectConfig;
