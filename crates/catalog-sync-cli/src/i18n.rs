// crates/catalog-sync-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Route every user-facing string through one localized catalog.
// Dependencies: std
// ============================================================================

//! ## Overview
//! User-facing strings live in static per-locale catalogs and are rendered
//! through the [`t!`](crate::t) macro. English is the baseline; Catalan is a
//! full translation.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_', '.']).next().unwrap_or("") {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "catalog-sync {version}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config is valid (domains: {domains})."),
    ("domain.select_failed", "Failed to select domain: {error}"),
    ("project.open_failed", "Failed to open project: {error}"),
    ("add.confirm", "Add {key} = {value}?"),
    ("add.failed", "Add failed: {error}"),
    ("remove.confirm", "Remove {key}?"),
    ("remove.failed", "Remove failed: {error}"),
    ("prompt.failed", "Failed to read confirmation: {error}"),
    ("prompt.declined", "Aborted; no files were changed."),
    (
        "sync.summary",
        "Updated {catalogs} catalog(s) and {artifacts} generated file(s); {keys} key(s) in sync.",
    ),
    ("sync.noop", "Nothing to change; {keys} key(s) already in sync."),
    ("generate.failed", "Generate failed: {error}"),
    ("check.failed", "Check failed: {error}"),
    ("check.ok", "{locales} locale(s) share {keys} key(s); generated files are up to date."),
    ("check.stale", "Generated file is out of date: {path}"),
    ("locales.failed", "Failed to list locales: {error}"),
    ("configuration.generate.failed", "Configuration generation failed: {error}"),
    ("configuration.generate.ok", "Wrote {path} ({entries} key(s))."),
    ("configuration.check.failed", "Configuration check failed: {error}"),
    ("configuration.check.ok", "{path} is up to date."),
    (
        "configuration.check.stale",
        "{path} is out of date; run `catalog-sync configuration generate`.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Catalan catalog entries.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "catalog-sync {version}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "La configuració és vàlida (dominis: {domains})."),
    ("domain.select_failed", "No s'ha pogut seleccionar el domini: {error}"),
    ("project.open_failed", "No s'ha pogut obrir el projecte: {error}"),
    ("add.confirm", "Voleu afegir {key} = {value}?"),
    ("add.failed", "No s'ha pogut afegir: {error}"),
    ("remove.confirm", "Voleu eliminar {key}?"),
    ("remove.failed", "No s'ha pogut eliminar: {error}"),
    ("prompt.failed", "No s'ha pogut llegir la confirmació: {error}"),
    ("prompt.declined", "S'ha cancel·lat; no s'ha modificat cap fitxer."),
    (
        "sync.summary",
        "S'han actualitzat {catalogs} catàleg(s) i {artifacts} fitxer(s) generat(s); {keys} \
         clau(s) sincronitzada(es).",
    ),
    ("sync.noop", "No hi ha res a canviar; {keys} clau(s) ja sincronitzada(es)."),
    ("generate.failed", "No s'ha pogut generar: {error}"),
    ("check.failed", "La comprovació ha fallat: {error}"),
    (
        "check.ok",
        "{locales} idioma(es) comparteixen {keys} clau(s); els fitxers generats estan al dia.",
    ),
    ("check.stale", "El fitxer generat no està al dia: {path}"),
    ("locales.failed", "No s'han pogut llistar els idiomes: {error}"),
    ("configuration.generate.failed", "No s'ha pogut generar la configuració: {error}"),
    ("configuration.generate.ok", "S'ha escrit {path} ({entries} clau(s))."),
    ("configuration.check.failed", "La comprovació de la configuració ha fallat: {error}"),
    ("configuration.check.ok", "{path} està al dia."),
    (
        "configuration.check.stale",
        "{path} no està al dia; executeu `catalog-sync configuration generate`.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

/// Returns the raw catalog entries for the requested locale.
#[cfg(test)]
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
///
/// Placeholders are expanded in one pass over the template, so substituted
/// values are never scanned for further placeholders. Unknown placeholders
/// are left as written.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[.. open]);
        let after = &rest[open + 1 ..];
        let Some(close) = after.find('}') else {
            result.push_str(&rest[open ..]);
            rest = "";
            break;
        };
        let name = &after[.. close];
        match args.iter().find(|arg| arg.key == name) {
            Some(arg) => result.push_str(&arg.value),
            None => result.push_str(&rest[open ..= open + 1 + close]),
        }
        rest = &after[close + 1 ..];
    }
    result.push_str(rest);
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[path = "tests/i18n.rs"]
mod tests;
