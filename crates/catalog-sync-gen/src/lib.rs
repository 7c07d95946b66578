// crates/catalog-sync-gen/src/lib.rs
// ============================================================================
// Module: Binding Generator Library
// Description: Deterministic generator for catalog-derived source bindings.
// Purpose: Render field declarations and anchored accessor bindings from keys.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate turns a canonical key list into two generated source artifacts:
//! a *declarations* artifact (one field per key between fixed boilerplate)
//! and a *bindings* artifact whose hand-written prefix is preserved up to and
//! including a literal anchor, followed by one assignment per key and a fixed
//! trailer. It also renders the typed configuration base class; see
//! [`configuration`].
//!
//! ### Design Notes
//! - Output is deterministic: lines follow the order of the key slice, which
//!   callers supply in canonical (sorted) order. Nothing time- or
//!   environment-dependent is emitted.
//! - Boilerplate is opaque and emitted byte-for-byte.
//! - The generator never touches the filesystem for bindings; the caller
//!   supplies the current artifact text and writes the result.
//!
//! ## Index
//! - Public API: [`BindingGenerator`], [`DeclarationsTemplate`], [`BindingsTemplate`], [`GenError`]
//! - Placeholder: [`KEY_PLACEHOLDER`]
//! - Typed configuration: [`configuration::ConfigurationGenerator`]

pub mod configuration;

use thiserror::Error;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Placeholder replaced by the key in line templates.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Errors raised by the generators.
///
/// # Invariants
/// - Variant meanings are stable for automation and tests.
///
/// # Examples
/// ```
/// use catalog_sync_gen::GenError;
///
/// let err = GenError::Template("missing {key}".to_string());
/// assert!(matches!(err, GenError::Template(message) if message == "missing {key}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// The anchor literal is absent from the existing artifact text.
    #[error("anchor `{anchor}` not found in {artifact}")]
    AnchorNotFound {
        /// Label of the artifact that was searched.
        artifact: String,
        /// Anchor literal that was expected.
        anchor: String,
    },
    /// Template configuration error.
    #[error("template error: {0}")]
    Template(String),
    /// Configuration keys manifest content error.
    #[error("configuration keys error: {0}")]
    ConfigurationKeys(String),
    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(String),
    /// IO error while reading generator inputs.
    #[error("io error: {0}")]
    Io(String),
}

/// Boilerplate and line template for the declarations artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationsTemplate {
    /// Text emitted before the first declaration line.
    pub header: String,
    /// Per-key line template containing [`KEY_PLACEHOLDER`].
    pub line: String,
    /// Text emitted after the last declaration line.
    pub footer: String,
}

/// Anchor, line template, and trailer for the bindings artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingsTemplate {
    /// Literal ending the preserved prefix.
    pub anchor: String,
    /// Per-key line template containing [`KEY_PLACEHOLDER`].
    pub line: String,
    /// Text emitted after the last binding line.
    pub trailer: String,
}

/// Renders declarations and bindings artifacts for a key list.
///
/// # Invariants
/// - Both line templates contain [`KEY_PLACEHOLDER`] and the anchor is non-empty.
/// - Rendering is a pure function of the templates, keys, and existing prefix.
///
/// # Examples
/// ```
/// use catalog_sync_gen::BindingGenerator;
/// use catalog_sync_gen::BindingsTemplate;
/// use catalog_sync_gen::DeclarationsTemplate;
///
/// # fn main() -> Result<(), catalog_sync_gen::GenError> {
/// let generator = BindingGenerator::new(
///     DeclarationsTemplate {
///         header: "class Strings {\n".to_string(),
///         line: "  late String {key};".to_string(),
///         footer: "}\n".to_string(),
///     },
///     BindingsTemplate {
///         anchor: "// generated".to_string(),
///         line: "  {key} = map['{key}']!;".to_string(),
///         trailer: "}\n".to_string(),
///     },
/// )?;
/// let declarations = generator.render_declarations(&["BYE", "HELLO"]);
/// assert_eq!(declarations, "class Strings {\n  late String BYE;\n  late String HELLO;\n}\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BindingGenerator {
    /// Declarations artifact template.
    declarations: DeclarationsTemplate,
    /// Bindings artifact template.
    bindings: BindingsTemplate,
}

impl BindingGenerator {
    /// Creates a generator after validating both templates.
    ///
    /// # Errors
    /// Returns [`GenError::Template`] when a line template lacks
    /// [`KEY_PLACEHOLDER`], spans multiple lines, or the anchor is empty.
    pub fn new(
        declarations: DeclarationsTemplate,
        bindings: BindingsTemplate,
    ) -> Result<Self, GenError> {
        validate_line_template("declarations line", &declarations.line)?;
        validate_line_template("bindings line", &bindings.line)?;
        if bindings.anchor.is_empty() {
            return Err(GenError::Template("bindings anchor must be non-empty".to_string()));
        }
        Ok(Self {
            declarations,
            bindings,
        })
    }

    /// Renders the full declarations artifact.
    #[must_use]
    pub fn render_declarations<S: AsRef<str>>(&self, keys: &[S]) -> String {
        let mut out = String::with_capacity(
            self.declarations.header.len()
                + self.declarations.footer.len()
                + keys.len() * (self.declarations.line.len() + 16),
        );
        out.push_str(&self.declarations.header);
        render_lines(&mut out, &self.declarations.line, keys);
        out.push_str(&self.declarations.footer);
        out
    }

    /// Renders the bindings artifact from its current text.
    ///
    /// Everything up to and including the first occurrence of the anchor is
    /// kept verbatim; the rest is replaced by a newline, one binding line per
    /// key, and the trailer.
    ///
    /// # Errors
    /// Returns [`GenError::AnchorNotFound`] when `existing` lacks the anchor.
    pub fn render_bindings<S: AsRef<str>>(
        &self,
        artifact: &str,
        existing: &str,
        keys: &[S],
    ) -> Result<String, GenError> {
        let prefix = self.preserved_prefix(artifact, existing)?;
        let mut out = String::with_capacity(
            prefix.len() + self.bindings.trailer.len() + keys.len() * (self.bindings.line.len() + 32),
        );
        out.push_str(prefix);
        out.push('\n');
        render_lines(&mut out, &self.bindings.line, keys);
        out.push_str(&self.bindings.trailer);
        Ok(out)
    }

    /// Returns the hand-written prefix of `existing`, ending with the anchor.
    ///
    /// # Errors
    /// Returns [`GenError::AnchorNotFound`] when `existing` lacks the anchor.
    pub fn preserved_prefix<'a>(
        &self,
        artifact: &str,
        existing: &'a str,
    ) -> Result<&'a str, GenError> {
        let anchor = self.bindings.anchor.as_str();
        let start = existing.find(anchor).ok_or_else(|| GenError::AnchorNotFound {
            artifact: artifact.to_string(),
            anchor: anchor.to_string(),
        })?;
        Ok(&existing[.. start + anchor.len()])
    }
}

// ============================================================================
// SECTION: Rendering Helpers
// ============================================================================

/// Appends one expanded template line per key.
fn render_lines<S: AsRef<str>>(out: &mut String, template: &str, keys: &[S]) {
    for key in keys {
        out.push_str(&template.replace(KEY_PLACEHOLDER, key.as_ref()));
        out.push('\n');
    }
}

/// Validates a per-key line template.
fn validate_line_template(label: &str, template: &str) -> Result<(), GenError> {
    if !template.contains(KEY_PLACEHOLDER) {
        return Err(GenError::Template(format!("{label} must contain {KEY_PLACEHOLDER}")));
    }
    if template.contains('\n') {
        return Err(GenError::Template(format!("{label} must be a single line")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
