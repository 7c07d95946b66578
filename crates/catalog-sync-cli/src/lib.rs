// crates/catalog-sync-cli/src/lib.rs
// ============================================================================
// Module: Catalog Sync CLI Library
// Description: Shared helpers for the `catalog-sync` binary.
// Purpose: Expose localization and confirmation helpers to the binary and tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The binary's argument parsing and dispatch live in `main.rs`; this library
//! holds the pieces that are tested on their own: the message catalog with
//! its [`t!`] macro, and the interactive confirmation prompt.

pub mod i18n;
pub mod prompt;
