// crates/catalog-sync-gen/src/configuration.rs
// ============================================================================
// Module: Typed Configuration Generator
// Description: Renders the configuration base class from a keys manifest.
// Purpose: Keep persisted configuration keys, types, and defaults in one source.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The keys manifest is a JSON array of entries:
//!
//! ```json
//! [{ "key": "LANGUAGE_REGION", "dartType": "LanguageRegion",
//!    "serializedType": "Integer", "default": "LanguageRegion.enUs" }]
//! ```
//!
//! Each entry yields a getter, a setter branch that persists the value, an
//! entry in the defaults map, a nullable backing field, and a `kKey...`
//! constant. Entry order is preserved; output is deterministic.
//!
//! ## Invariants
//! - Keys are non-empty and unique.
//! - String defaults are emitted verbatim as source expressions; other JSON
//!   values are emitted in their JSON form.

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::GenError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum keys manifest size accepted by the generator.
pub const MAX_CONFIGURATION_KEYS_BYTES: u64 = 4 * 1024 * 1024;

/// Serialized type whose non-`int` values persist their enum index.
const SERIALIZED_INTEGER: &str = "Integer";

/// Serialized type whose `Set<..>` values persist through `toJson()`.
const SERIALIZED_JSON: &str = "Json";

// ============================================================================
// SECTION: Model
// ============================================================================

/// One persisted configuration key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationEntry {
    /// Persisted key, conventionally `UPPER_SNAKE_CASE`.
    pub key: String,
    /// Source-level type of the value.
    pub dart_type: String,
    /// Storage type tag (`Integer`, `Json`, `String`, `Boolean`, ...).
    pub serialized_type: String,
    /// Default value expression.
    pub default: Value,
}

/// Generator for the configuration base class.
///
/// # Invariants
/// - `entries` is non-empty with unique, non-empty keys.
#[derive(Debug, Clone)]
pub struct ConfigurationGenerator {
    /// Validated manifest entries in input order.
    entries: Vec<ConfigurationEntry>,
}

impl ConfigurationGenerator {
    /// Loads and validates a keys manifest from disk.
    ///
    /// # Errors
    /// Returns [`GenError`] when the file cannot be read, exceeds
    /// [`MAX_CONFIGURATION_KEYS_BYTES`], or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let bytes = read_manifest_bytes(path.as_ref())?;
        Self::from_json(&bytes)
    }

    /// Parses and validates a keys manifest.
    ///
    /// # Errors
    /// Returns [`GenError::Json`] on malformed JSON and
    /// [`GenError::ConfigurationKeys`] on invalid entries.
    pub fn from_json(bytes: &[u8]) -> Result<Self, GenError> {
        let entries: Vec<ConfigurationEntry> =
            serde_json::from_slice(bytes).map_err(|err| GenError::Json(err.to_string()))?;
        Self::new(entries)
    }

    /// Validates entries and builds a generator.
    ///
    /// # Errors
    /// Returns [`GenError::ConfigurationKeys`] on empty input, empty keys, or duplicates.
    pub fn new(entries: Vec<ConfigurationEntry>) -> Result<Self, GenError> {
        if entries.is_empty() {
            return Err(GenError::ConfigurationKeys("manifest contains no entries".to_string()));
        }
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.key.trim().is_empty() {
                return Err(GenError::ConfigurationKeys("entry key is empty".to_string()));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(GenError::ConfigurationKeys(format!("duplicate key: {}", entry.key)));
            }
        }
        Ok(Self {
            entries,
        })
    }

    /// Returns the validated entries.
    #[must_use]
    pub fn entries(&self) -> &[ConfigurationEntry] {
        &self.entries
    }

    /// Renders the generated configuration source.
    #[must_use]
    pub fn render(&self) -> String {
        let mut getters = Vec::with_capacity(self.entries.len());
        let mut parameters = Vec::with_capacity(self.entries.len());
        let mut setters = Vec::with_capacity(self.entries.len());
        let mut defaults = Vec::with_capacity(self.entries.len());
        let mut fields = Vec::with_capacity(self.entries.len());
        let mut keys = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let camel = camel_case(&entry.key);
            let pascal = pascal_case(&entry.key);
            let serialized = entry.serialized_type.as_str();
            getters.push(format!("  {} get {camel} => _{camel}!;", entry.dart_type));
            parameters.push(format!("    {}? {camel}", entry.dart_type));
            setters.push(format!(
                "    if ({camel} != null) {{\n      _{camel} = {camel};\n      await \
                 db.setValue(kKey{pascal}, kType{serialized}, {}Value: {});\n    }}",
                serialized.to_lowercase(),
                persisted_value(entry, &camel),
            ));
            defaults.push(format!(
                "      /* {serialized:<7} */ kKey{pascal}: {},",
                default_expression(&entry.default)
            ));
            fields.push(format!("  {}? _{camel};", entry.dart_type));
            keys.push(format!("const kKey{pascal} = '{}';", entry.key));
        }

        let lines = [
            "// AUTO GENERATED FILE, DO NOT EDIT.".to_string(),
            String::new(),
            "part of 'configuration.dart';".to_string(),
            String::new(),
            "class ConfigurationBase {".to_string(),
            String::new(),
            "  final Directory directory;".to_string(),
            "  final Database db;".to_string(),
            String::new(),
            "  static bool get isMobile => Platform.isAndroid || Platform.isIOS;".to_string(),
            "  static bool get isDesktop => Platform.isLinux || Platform.isMacOS || \
             Platform.isWindows;"
                .to_string(),
            String::new(),
            "  ConfigurationBase({required this.directory, required this.db});".to_string(),
            String::new(),
            getters.join("\n"),
            String::new(),
            "  Future<void> set({".to_string(),
            format!("{},", parameters.join(",\n")),
            "  }) async {".to_string(),
            setters.join("\n"),
            "  }".to_string(),
            String::new(),
            "  Future<Map<String, dynamic>> getDefaults() async {".to_string(),
            "    return {".to_string(),
            defaults.join("\n"),
            "    };".to_string(),
            "  }".to_string(),
            String::new(),
            fields.join("\n"),
            "}".to_string(),
            String::new(),
            "// ----- Keys -----".to_string(),
            String::new(),
            keys.join("\n"),
            String::new(),
        ];
        lines.join("\n")
    }
}

// ============================================================================
// SECTION: Naming Helpers
// ============================================================================

/// Converts a key to lowerCamelCase (`LANGUAGE_REGION` -> `languageRegion`).
#[must_use]
pub fn camel_case(key: &str) -> String {
    let lowered = key.to_lowercase();
    let mut segments = lowered.split('_');
    let mut out = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        out.push_str(&title_case(segment));
    }
    out
}

/// Converts a key to PascalCase (`LANGUAGE_REGION` -> `LanguageRegion`).
#[must_use]
pub fn pascal_case(key: &str) -> String {
    key.split('_').map(title_case).collect()
}

/// Uppercases letters that follow a non-letter and lowercases the rest.
fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut previous_is_letter = false;
    for ch in word.chars() {
        if previous_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }
    out
}

// ============================================================================
// SECTION: Value Helpers
// ============================================================================

/// Returns the expression persisted for an entry.
fn persisted_value(entry: &ConfigurationEntry, camel: &str) -> String {
    let dart_type = entry.dart_type.as_str();
    if entry.serialized_type == SERIALIZED_INTEGER && dart_type != "int" {
        return format!("{camel}.index");
    }
    if entry.serialized_type == SERIALIZED_JSON
        && dart_type.starts_with("Set<")
        && dart_type.ends_with('>')
    {
        return format!("{camel}.toJson()");
    }
    camel.to_string()
}

/// Renders a default value as a source expression.
fn default_expression(value: &Value) -> String {
    match value {
        Value::String(expression) => expression.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Input
// ============================================================================

/// Reads the keys manifest with size limits.
fn read_manifest_bytes(path: &Path) -> Result<Vec<u8>, GenError> {
    let file = fs::File::open(path)
        .map_err(|err| GenError::Io(format!("{}: {err}", path.display())))?;
    let mut bytes = Vec::new();
    file.take(MAX_CONFIGURATION_KEYS_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| GenError::Io(format!("{}: {err}", path.display())))?;
    let size = u64::try_from(bytes.len()).map_err(|_| {
        GenError::ConfigurationKeys("manifest size exceeds addressable memory".to_string())
    })?;
    if size > MAX_CONFIGURATION_KEYS_BYTES {
        return Err(GenError::ConfigurationKeys(format!(
            "manifest exceeds {MAX_CONFIGURATION_KEYS_BYTES} bytes"
        )));
    }
    Ok(bytes)
}
