// crates/catalog-sync-config/src/config.rs
// ============================================================================
// Module: Config Model
// Description: TOML configuration model, loading guards, and validation.
// Purpose: Turn an untrusted config file into a validated engine setup.
// Dependencies: catalog-sync-gen, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! [`CatalogSyncConfig::load`] resolves the config file (explicit path, then
//! [`CONFIG_ENV`], then [`DEFAULT_CONFIG_PATH`]), enforces size and encoding
//! limits, parses TOML with unknown fields rejected, and validates every
//! domain before returning.
//!
//! ## Invariants
//! - A returned config always has at least one domain.
//! - Domain names are unique; catalog and artifact paths are relative and free
//!   of parent traversal.
//! - Line templates contain [`KEY_PLACEHOLDER`] and anchors are non-empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use catalog_sync_gen::KEY_PLACEHOLDER;
use serde::Deserialize;
use thiserror::Error;

use crate::defaults;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "catalog-sync.toml";

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "CATALOG_SYNC_CONFIG";

/// Maximum config file size in bytes.
pub const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

/// Maximum total config path length in bytes.
const MAX_PATH_BYTES: usize = 4096;

/// Maximum length of a single config path component in bytes.
const MAX_PATH_COMPONENT_BYTES: usize = 255;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Semantic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Requested domain is not configured.
    #[error("unknown domain `{name}` (configured: {available})")]
    UnknownDomain {
        /// Requested domain name.
        name: String,
        /// Comma-separated configured domain names.
        available: String,
    },
    /// No domain was requested and more than one is configured.
    #[error("multiple domains configured; select one of: {available}")]
    AmbiguousDomain {
        /// Comma-separated configured domain names.
        available: String,
    },
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSyncConfig {
    /// Project-level settings.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Configured catalog domains.
    #[serde(default = "defaults::domains")]
    pub domains: Vec<DomainConfig>,
    /// Typed configuration generator settings.
    #[serde(default)]
    pub configuration: ConfigurationGenConfig,
    /// File the config was loaded from, when any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Project-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project root; relative values resolve against the config file directory.
    pub root: Option<PathBuf>,
}

/// One catalog domain: a locale directory plus its two generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    /// Stable domain name used for `--domain` selection.
    pub name: String,
    /// Directory holding one catalog file per locale.
    pub catalog_dir: PathBuf,
    /// Catalog file extension without the leading dot.
    #[serde(default = "defaults::extension")]
    pub extension: String,
    /// Index files in `catalog_dir` that are never treated as catalogs.
    #[serde(default = "defaults::manifests")]
    pub manifests: Vec<String>,
    /// Declarations artifact settings.
    pub declarations: DeclarationsConfig,
    /// Bindings artifact settings.
    pub bindings: BindingsConfig,
}

/// Declarations artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationsConfig {
    /// Artifact path relative to the project root.
    pub path: PathBuf,
    /// Boilerplate emitted before the generated lines.
    #[serde(default = "defaults::declarations_header")]
    pub header: String,
    /// Line template containing `{key}`.
    #[serde(default = "defaults::declaration_line")]
    pub line: String,
    /// Boilerplate emitted after the generated lines.
    #[serde(default = "defaults::declarations_footer")]
    pub footer: String,
}

/// Bindings artifact settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingsConfig {
    /// Artifact path relative to the project root.
    pub path: PathBuf,
    /// Literal marking the end of the preserved prefix.
    #[serde(default = "defaults::bindings_anchor")]
    pub anchor: String,
    /// Line template containing `{key}`.
    #[serde(default = "defaults::binding_line")]
    pub line: String,
    /// Boilerplate emitted after the generated lines.
    #[serde(default = "defaults::bindings_trailer")]
    pub trailer: String,
}

/// Typed configuration generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationGenConfig {
    /// Keys manifest path relative to the project root.
    #[serde(default = "defaults::configuration_input")]
    pub input: PathBuf,
    /// Generated source path relative to the project root.
    #[serde(default = "defaults::configuration_output")]
    pub output: PathBuf,
}

impl Default for ConfigurationGenConfig {
    fn default() -> Self {
        Self {
            input: defaults::configuration_input(),
            output: defaults::configuration_output(),
        }
    }
}

impl Default for CatalogSyncConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            domains: defaults::domains(),
            configuration: ConfigurationGenConfig::default(),
            source: None,
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl CatalogSyncConfig {
    /// Loads configuration using the explicit path, [`CONFIG_ENV`], or
    /// [`DEFAULT_CONFIG_PATH`], falling back to built-in defaults when the
    /// default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_with(path, env_path.as_deref())
    }

    /// Loads configuration with an explicit environment override value.
    ///
    /// Explicit and environment paths must exist; only the implicit default
    /// file may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
    pub fn load_with(path: Option<&Path>, env_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path.or(env_path) {
            return Self::load_file(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.is_file() {
            return Self::load_file(default_path);
        }
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a specific config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or validated.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_config_path(path)?;
        let text = read_config_text(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every domain and the generator settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::Invalid("at least one domain is required".to_string()));
        }
        let mut names = BTreeSet::new();
        for domain in &self.domains {
            domain.validate()?;
            if !names.insert(domain.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate domain name: {}", domain.name)));
            }
        }
        validate_relative("configuration.input", &self.configuration.input)?;
        validate_relative("configuration.output", &self.configuration.output)?;
        Ok(())
    }

    /// Returns the project root all relative paths resolve against.
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        let base = self
            .source
            .as_deref()
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        match &self.project.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => base.join(root),
            None => base,
        }
    }

    /// Selects a domain by name, or the only domain when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownDomain`] or [`ConfigError::AmbiguousDomain`].
    pub fn domain(&self, name: Option<&str>) -> Result<&DomainConfig, ConfigError> {
        match name {
            Some(name) => {
                self.domains.iter().find(|domain| domain.name == name).ok_or_else(|| {
                    ConfigError::UnknownDomain {
                        name: name.to_string(),
                        available: self.domain_names().join(", "),
                    }
                })
            }
            None => match self.domains.as_slice() {
                [only] => Ok(only),
                _ => Err(ConfigError::AmbiguousDomain {
                    available: self.domain_names().join(", "),
                }),
            },
        }
    }

    /// Returns configured domain names in declaration order.
    #[must_use]
    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.iter().map(|domain| domain.name.as_str()).collect()
    }
}

impl DomainConfig {
    /// Validates one domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty()
            || !self.name.chars().all(|ch| {
                ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_'
            })
        {
            return Err(ConfigError::Invalid(format!(
                "domain name `{}` must be non-empty and use [a-z0-9_-]",
                self.name
            )));
        }
        let label = |field: &str| format!("domains.{}.{field}", self.name);
        validate_relative(&label("catalog_dir"), &self.catalog_dir)?;
        validate_relative(&label("declarations.path"), &self.declarations.path)?;
        validate_relative(&label("bindings.path"), &self.bindings.path)?;
        if self.declarations.path == self.bindings.path {
            return Err(ConfigError::Invalid(format!(
                "{} and {} must differ",
                label("declarations.path"),
                label("bindings.path")
            )));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "{} must be non-empty without a leading dot",
                label("extension")
            )));
        }
        for manifest in &self.manifests {
            if manifest.is_empty() || manifest.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!(
                    "{} entries must be plain file names",
                    label("manifests")
                )));
            }
        }
        validate_template(&label("declarations.line"), &self.declarations.line)?;
        validate_template(&label("bindings.line"), &self.bindings.line)?;
        if self.bindings.anchor.is_empty() {
            return Err(ConfigError::Invalid(format!("{} must be non-empty", label("bindings.anchor"))));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Rejects config paths that exceed length limits.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_PATH_BYTES {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_BYTES {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads the config file with size and encoding limits.
fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    let file = fs::File::open(path)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    let mut bytes = Vec::new();
    file.take(MAX_CONFIG_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    let size = u64::try_from(bytes.len())
        .map_err(|_| ConfigError::Invalid("config file exceeds size limit".to_string()))?;
    if size > MAX_CONFIG_BYTES {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))
}

/// Requires a non-empty relative path without root, prefix, or `..` components.
fn validate_relative(label: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(format!("{label} must be non-empty")));
    }
    let safe = path.components().all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(ConfigError::Invalid(format!(
            "{label} must be a relative path without `..`: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Requires a line template to reference the key placeholder.
fn validate_template(label: &str, template: &str) -> Result<(), ConfigError> {
    if !template.contains(KEY_PLACEHOLDER) {
        return Err(ConfigError::Invalid(format!("{label} must contain {KEY_PLACEHOLDER}")));
    }
    if template.contains('\n') {
        return Err(ConfigError::Invalid(format!("{label} must be a single line")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
