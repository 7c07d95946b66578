// crates/catalog-sync-config/src/defaults.rs
// ============================================================================
// Module: Built-in Defaults
// Description: Default domain layout and boilerplate used without a config file.
// Purpose: Keep the legacy project layout reproducible from one place.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The defaults reproduce the layout of the project this tool was written
//! for: one `translations` domain whose catalogs live under
//! `assets/translations/translations`, with an `index.json` manifest beside
//! them, a `Strings` declarations class, and a `language.dart` bindings file
//! whose hand-written prefix ends at the `json.decode` anchor.
//!
//! Boilerplate constants are emitted verbatim; do not reformat them.

use std::path::PathBuf;

use crate::config::BindingsConfig;
use crate::config::DeclarationsConfig;
use crate::config::DomainConfig;

// ============================================================================
// SECTION: Domain Layout
// ============================================================================

/// Name of the built-in domain.
pub const DOMAIN_NAME: &str = "translations";

/// Catalog directory of the built-in domain, relative to the project root.
pub const CATALOG_DIR: &str = "assets/translations/translations";

/// Catalog file extension (without the leading dot).
pub const CATALOG_EXTENSION: &str = "json";

/// Locale index file kept next to the catalogs.
pub const MANIFEST_FILE: &str = "index.json";

/// Declarations artifact path, relative to the project root.
pub const DECLARATIONS_PATH: &str = "lib/constants/strings.dart";

/// Bindings artifact path, relative to the project root.
pub const BINDINGS_PATH: &str = "lib/constants/language.dart";

// ============================================================================
// SECTION: Boilerplate
// ============================================================================

/// Text emitted before the declaration lines.
pub const DECLARATIONS_HEADER: &str =
    "// ignore_for_file: non_constant_identifier_names\n\nclass Strings {\n";

/// Declaration line template.
pub const DECLARATION_LINE: &str = "  late String {key};";

/// Text emitted after the declaration lines.
pub const DECLARATIONS_FOOTER: &str = "}\n";

/// Literal marking the end of the hand-written bindings prefix.
pub const BINDINGS_ANCHOR: &str = "final map = json.decode(data);";

/// Binding line template.
pub const BINDING_LINE: &str = "    {key} = map['{key}']!;";

/// Text emitted after the binding lines.
pub const BINDINGS_TRAILER: &str = "    current = value;
    notifyListeners();
  }

  /// Currently selected & displayed [Language].
  late LanguageData current;

  @override
  // ignore: must_call_super
  void dispose() {}
}
";

// ============================================================================
// SECTION: Configuration Generator
// ============================================================================

/// Default configuration keys manifest.
pub const CONFIGURATION_INPUT: &str = "scripts/configuration_keys.json";

/// Default generated configuration source.
pub const CONFIGURATION_OUTPUT: &str = "lib/core/configuration/configuration.g.dart";

// ============================================================================
// SECTION: Serde Defaults
// ============================================================================

/// Returns the built-in domain list.
#[must_use]
pub fn domains() -> Vec<DomainConfig> {
    vec![DomainConfig {
        name: DOMAIN_NAME.to_string(),
        catalog_dir: PathBuf::from(CATALOG_DIR),
        extension: extension(),
        manifests: manifests(),
        declarations: DeclarationsConfig {
            path: PathBuf::from(DECLARATIONS_PATH),
            header: declarations_header(),
            line: declaration_line(),
            footer: declarations_footer(),
        },
        bindings: BindingsConfig {
            path: PathBuf::from(BINDINGS_PATH),
            anchor: bindings_anchor(),
            line: binding_line(),
            trailer: bindings_trailer(),
        },
    }]
}

/// Serde default for `extension`.
pub(crate) fn extension() -> String {
    CATALOG_EXTENSION.to_string()
}

/// Serde default for `manifests`.
pub(crate) fn manifests() -> Vec<String> {
    vec![MANIFEST_FILE.to_string()]
}

/// Serde default for `declarations.header`.
pub(crate) fn declarations_header() -> String {
    DECLARATIONS_HEADER.to_string()
}

/// Serde default for `declarations.line`.
pub(crate) fn declaration_line() -> String {
    DECLARATION_LINE.to_string()
}

/// Serde default for `declarations.footer`.
pub(crate) fn declarations_footer() -> String {
    DECLARATIONS_FOOTER.to_string()
}

/// Serde default for `bindings.anchor`.
pub(crate) fn bindings_anchor() -> String {
    BINDINGS_ANCHOR.to_string()
}

/// Serde default for `bindings.line`.
pub(crate) fn binding_line() -> String {
    BINDING_LINE.to_string()
}

/// Serde default for `bindings.trailer`.
pub(crate) fn bindings_trailer() -> String {
    BINDINGS_TRAILER.to_string()
}

/// Serde default for `configuration.input`.
pub(crate) fn configuration_input() -> PathBuf {
    PathBuf::from(CONFIGURATION_INPUT)
}

/// Serde default for `configuration.output`.
pub(crate) fn configuration_output() -> PathBuf {
    PathBuf::from(CONFIGURATION_OUTPUT)
}
