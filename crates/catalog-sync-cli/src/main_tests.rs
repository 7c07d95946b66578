// crates/catalog-sync-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and entry point helpers.
// Purpose: Pin flag shapes, locale resolution, and output path handling.
// Dependencies: catalog-sync-cli main helpers
// ============================================================================

//! ## Overview
//! Exercises the clap definition and the pure helpers behind `run`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use clap::CommandFactory;
use clap::Parser;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::ConfigurationCommand;
use super::LangArg;
use super::Locale;
use super::output_target;
use super::resolve_locale;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn lang_flag_overrides_environment() {
    let locale = resolve_locale(Some(LangArg::En), Some("ca")).expect("locale");
    assert_eq!(locale, Locale::En);
}

#[test]
fn environment_locale_accepts_region_tags() {
    let locale = resolve_locale(None, Some("ca_ES.UTF-8")).expect("locale");
    assert_eq!(locale, Locale::Ca);
}

#[test]
fn invalid_environment_locale_names_the_variable() {
    let err = resolve_locale(None, Some("klingon")).expect_err("invalid locale");
    let message = err.to_string();
    assert!(message.contains("CATALOG_SYNC_LANG"), "{message}");
    assert!(message.contains("klingon"), "{message}");
}

#[test]
fn locale_defaults_to_english() {
    assert_eq!(resolve_locale(None, None).expect("locale"), Locale::En);
}

#[test]
fn add_parses_key_value_and_flags() {
    let cli = Cli::try_parse_from([
        "catalog-sync",
        "add",
        "BYE",
        "Bye",
        "--domain",
        "translations",
        "-y",
    ])
    .expect("parse");
    let Some(Commands::Add(command)) = cli.command else {
        panic!("expected add");
    };
    assert_eq!(command.key, "BYE");
    assert_eq!(command.value, "Bye");
    assert_eq!(command.domain.domain.as_deref(), Some("translations"));
    assert!(command.yes);
}

#[test]
fn add_requires_a_value() {
    assert!(Cli::try_parse_from(["catalog-sync", "add", "BYE"]).is_err());
}

#[test]
fn remove_prompts_by_default() {
    let cli = Cli::try_parse_from(["catalog-sync", "remove", "HELLO"]).expect("parse");
    let Some(Commands::Remove(command)) = cli.command else {
        panic!("expected remove");
    };
    assert_eq!(command.key, "HELLO");
    assert!(command.domain.domain.is_none());
    assert!(!command.yes);
}

#[test]
fn global_flags_follow_subcommands() {
    let cli = Cli::try_parse_from([
        "catalog-sync",
        "check",
        "--lang",
        "ca",
        "--config",
        "custom.toml",
        "-v",
    ])
    .expect("parse");
    assert!(matches!(cli.lang, Some(LangArg::Ca)));
    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Some(Commands::Check(_))));
}

#[test]
fn nested_subcommands_parse() {
    let cli = Cli::try_parse_from([
        "catalog-sync",
        "configuration",
        "check",
        "--output",
        "out.dart",
    ])
    .expect("parse");
    let Some(Commands::Configuration {
        command: ConfigurationCommand::Check(args),
    }) = cli.command
    else {
        panic!("expected configuration check");
    };
    assert!(args.input.is_none());
    assert_eq!(args.output, Some(PathBuf::from("out.dart")));

    let cli = Cli::try_parse_from(["catalog-sync", "config", "validate"]).expect("parse");
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommand::Validate
        })
    ));
}

#[test]
fn version_flag_needs_no_subcommand() {
    let cli = Cli::try_parse_from(["catalog-sync", "--version"]).expect("parse");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn relative_output_resolves_under_project_root() {
    let (root, relative) = output_target(Path::new("project"), Path::new("lib/out.dart"));
    assert_eq!(root, PathBuf::from("project"));
    assert_eq!(relative, PathBuf::from("lib/out.dart"));
}

#[test]
fn absolute_output_opens_its_parent() {
    let output = std::env::temp_dir().join("generated").join("out.dart");
    let (root, relative) = output_target(Path::new("project"), &output);
    assert_eq!(root, std::env::temp_dir().join("generated"));
    assert_eq!(relative, PathBuf::from("out.dart"));
}
