//! Config load validation tests for catalog-sync-config.
// crates/catalog-sync-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, resolution).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use catalog_sync_config::CatalogSyncConfig;
use catalog_sync_config::ConfigError;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<CatalogSyncConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(CatalogSyncConfig::load_file(path), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(CatalogSyncConfig::load_file(path), "config path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(CatalogSyncConfig::load_file(file.path()), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(CatalogSyncConfig::load_file(file.path()), "config file must be utf-8")
}

#[test]
fn explicit_missing_path_is_an_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = dir.path().join("missing.toml");
    assert_invalid(CatalogSyncConfig::load_with(Some(&missing), None), "config io error")
}

#[test]
fn env_path_is_used_when_no_explicit_path() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(
        br#"
[[domains]]
name = "localizations"
catalog_dir = "assets/localizations/localizations"
[domains.declarations]
path = "lib/localization/values.g.dart"
[domains.bindings]
path = "lib/localization/localization.g.dart"
anchor = "final map = json.decode(data);"
"#,
    )
    .map_err(|err| err.to_string())?;
    let config = CatalogSyncConfig::load_with(None, Some(file.path())).map_err(|err| err.to_string())?;
    if config.domain_names() != vec!["localizations"] {
        return Err(format!("unexpected domains: {:?}", config.domain_names()));
    }
    if config.source.as_deref() != Some(file.path()) {
        return Err("expected source path to be recorded".to_string());
    }
    let expected_root = file.path().parent().ok_or("temp file has a parent")?;
    if config.project_root() != expected_root {
        return Err(format!("unexpected project root: {}", config.project_root().display()));
    }
    Ok(())
}

#[test]
fn explicit_path_wins_over_env_path() -> TestResult {
    let mut explicit = NamedTempFile::new().map_err(|err| err.to_string())?;
    explicit.write_all(b"[project]\nroot = \"app\"\n").map_err(|err| err.to_string())?;
    let mut env = NamedTempFile::new().map_err(|err| err.to_string())?;
    env.write_all(b"not = [valid").map_err(|err| err.to_string())?;
    let config = CatalogSyncConfig::load_with(Some(explicit.path()), Some(env.path()))
        .map_err(|err| err.to_string())?;
    if config.domain_names() != vec!["translations"] {
        return Err("expected built-in domains when none are declared".to_string());
    }
    Ok(())
}

#[test]
fn malformed_toml_reports_parse_error() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[[domains]\nname = ").map_err(|err| err.to_string())?;
    assert_invalid(CatalogSyncConfig::load_file(file.path()), "config parse error")
}
