// crates/catalog-sync-cli/src/main.rs
// ============================================================================
// Module: Catalog Sync CLI Entry Point
// Description: Command dispatcher for catalog key changes and code generation.
// Purpose: Provide a localized, confirm-before-write CLI over the sync engine.
// Dependencies: clap, catalog-sync-config, catalog-sync-core, catalog-sync-gen, tracing-subscriber
// ============================================================================

//! ## Overview
//! `catalog-sync` adds or removes one key across every locale catalog of a
//! domain and regenerates the domain's declarations and bindings. It also
//! checks catalogs and generated files for drift, lists locales, and renders
//! the typed configuration class. All user-facing strings are routed through
//! the i18n catalog.
//!
//! Confirmation for `add`/`remove` is resolved here, before the engine is
//! invoked; the engine itself never reads stdin.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use catalog_sync_cli::i18n::Locale;
use catalog_sync_cli::i18n::set_locale;
use catalog_sync_cli::prompt::confirm;
use catalog_sync_cli::t;
use catalog_sync_config::CatalogSyncConfig;
use catalog_sync_core::Operation;
use catalog_sync_core::StagedWrites;
use catalog_sync_core::SyncEngine;
use catalog_sync_core::SyncPlan;
use catalog_sync_core::SyncReport;
use catalog_sync_core::engine::MAX_ARTIFACT_BYTES;
use catalog_sync_core::fsutil::open_root;
use catalog_sync_core::fsutil::read_text_file;
use catalog_sync_gen::configuration::ConfigurationGenerator;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "CATALOG_SYNC_LANG";
/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "CATALOG_SYNC_LOG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "catalog-sync", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `CATALOG_SYNC_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Config file path (defaults to catalog-sync.toml or `CATALOG_SYNC_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Log engine activity to stderr.
    #[arg(long, short = 'v', action = ArgAction::SetTrue, global = true)]
    verbose: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a key with one placeholder value to every locale catalog.
    Add(AddCommand),
    /// Remove a key from every locale catalog.
    Remove(RemoveCommand),
    /// Regenerate declarations and bindings from the current catalogs.
    Generate(DomainArgs),
    /// Verify catalog parity and that generated files are up to date.
    Check(DomainArgs),
    /// List the locales of a domain.
    Locales(DomainArgs),
    /// Typed configuration class generation.
    Configuration {
        /// Selected configuration subcommand.
        #[command(subcommand)]
        command: ConfigurationCommand,
    },
    /// Config file utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Domain selection shared by catalog commands.
#[derive(Args, Debug)]
struct DomainArgs {
    /// Domain to operate on (optional when only one is configured).
    #[arg(long, value_name = "NAME")]
    domain: Option<String>,
}

/// Arguments for `add`.
#[derive(Args, Debug)]
struct AddCommand {
    /// Key to add.
    key: String,
    /// Value inserted into every catalog missing the key.
    value: String,
    /// Domain selection.
    #[command(flatten)]
    domain: DomainArgs,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y', action = ArgAction::SetTrue)]
    yes: bool,
}

/// Arguments for `remove`.
#[derive(Args, Debug)]
struct RemoveCommand {
    /// Key to remove.
    key: String,
    /// Domain selection.
    #[command(flatten)]
    domain: DomainArgs,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y', action = ArgAction::SetTrue)]
    yes: bool,
}

/// Configuration generator subcommands.
#[derive(Subcommand, Debug)]
enum ConfigurationCommand {
    /// Render the configuration class.
    Generate(ConfigurationArgs),
    /// Verify the configuration class is up to date.
    Check(ConfigurationArgs),
}

/// Arguments for configuration generation.
#[derive(Args, Debug)]
struct ConfigurationArgs {
    /// Keys manifest (defaults to `configuration.input`).
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Generated source (defaults to `configuration.output`).
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the config file.
    Validate,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    setup_tracing(cli.verbose);

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = CatalogSyncConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;

    match command {
        Commands::Add(command) => command_add(&config, command),
        Commands::Remove(command) => command_remove(&config, command),
        Commands::Generate(command) => command_generate(&config, &command),
        Commands::Check(command) => command_check(&config, &command),
        Commands::Locales(command) => command_locales(&config, &command),
        Commands::Configuration {
            command,
        } => command_configuration(&config, command),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(&config),
    }
}

/// Installs the stderr log subscriber.
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("catalog_sync_core=debug,catalog_sync_cli=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Catalog Commands
// ============================================================================

/// Executes `add`.
fn command_add(config: &CatalogSyncConfig, command: AddCommand) -> CliResult<ExitCode> {
    let engine = open_engine(config, &command.domain)?;
    let question = t!("add.confirm", key = command.key, value = command.value);
    let operation = Operation::Add {
        key: command.key,
        value: command.value,
    };
    operation.validate().map_err(|err| CliError::new(t!("add.failed", error = err)))?;
    if !command.yes && !confirm_on_stdin(&question)? {
        return declined();
    }
    let report = engine
        .plan(&operation)
        .and_then(SyncPlan::commit)
        .map_err(|err| CliError::new(t!("add.failed", error = err)))?;
    report_sync(&report)
}

/// Executes `remove`.
fn command_remove(config: &CatalogSyncConfig, command: RemoveCommand) -> CliResult<ExitCode> {
    let engine = open_engine(config, &command.domain)?;
    let question = t!("remove.confirm", key = command.key);
    let operation = Operation::Remove {
        key: command.key,
    };
    operation.validate().map_err(|err| CliError::new(t!("remove.failed", error = err)))?;
    if !command.yes && !confirm_on_stdin(&question)? {
        return declined();
    }
    let report = engine
        .plan(&operation)
        .and_then(SyncPlan::commit)
        .map_err(|err| CliError::new(t!("remove.failed", error = err)))?;
    report_sync(&report)
}

/// Executes `generate`.
fn command_generate(config: &CatalogSyncConfig, command: &DomainArgs) -> CliResult<ExitCode> {
    let engine = open_engine(config, command)?;
    let report = engine
        .regenerate()
        .and_then(SyncPlan::commit)
        .map_err(|err| CliError::new(t!("generate.failed", error = err)))?;
    report_sync(&report)
}

/// Executes `check`; stale generated files yield a failure exit code.
fn command_check(config: &CatalogSyncConfig, command: &DomainArgs) -> CliResult<ExitCode> {
    let engine = open_engine(config, command)?;
    let report =
        engine.check().map_err(|err| CliError::new(t!("check.failed", error = err)))?;
    if report.is_clean() {
        write_stdout_line(&t!(
            "check.ok",
            locales = report.locales.len(),
            keys = report.keys.len()
        ))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    for path in &report.stale_artifacts {
        write_stderr_line(&t!("check.stale", path = path.display()))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    Ok(ExitCode::FAILURE)
}

/// Executes `locales`.
fn command_locales(config: &CatalogSyncConfig, command: &DomainArgs) -> CliResult<ExitCode> {
    let engine = open_engine(config, command)?;
    let locales =
        engine.locales().map_err(|err| CliError::new(t!("locales.failed", error = err)))?;
    let mut stdout = std::io::stdout().lock();
    for locale in locales {
        writeln!(&mut stdout, "{locale}")
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds the engine for the selected domain.
fn open_engine(config: &CatalogSyncConfig, args: &DomainArgs) -> CliResult<SyncEngine> {
    let domain = config
        .domain(args.domain.as_deref())
        .map_err(|err| CliError::new(t!("domain.select_failed", error = err)))?;
    let project_root = config.project_root();
    let root = open_root(&project_root)
        .map_err(|err| CliError::new(t!("project.open_failed", error = err)))?;
    let engine = SyncEngine::from_domain(&root, domain)
        .map_err(|err| CliError::new(t!("project.open_failed", error = err)))?;
    tracing::debug!(
        domain = %domain.name,
        root = %project_root.display(),
        catalog_dir = %engine.store().catalog_dir().display(),
        "opened domain"
    );
    Ok(engine)
}

/// Asks for confirmation on stderr and reads the answer from stdin.
fn confirm_on_stdin(question: &str) -> CliResult<bool> {
    let stdin = std::io::stdin();
    let mut stderr = std::io::stderr().lock();
    let confirmed = confirm(question, &mut stdin.lock(), &mut stderr)
        .map_err(|err| CliError::new(t!("prompt.failed", error = err)))?;
    Ok(confirmed)
}

/// Reports a declined confirmation.
fn declined() -> CliResult<ExitCode> {
    write_stderr_line(&t!("prompt.declined"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the outcome of a committed plan.
fn report_sync(report: &SyncReport) -> CliResult<ExitCode> {
    let message = if report.catalogs_written.is_empty() && report.artifacts_written.is_empty() {
        t!("sync.noop", keys = report.key_count)
    } else {
        t!(
            "sync.summary",
            catalogs = report.catalogs_written.len(),
            artifacts = report.artifacts_written.len(),
            keys = report.key_count
        )
    };
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Configuration Commands
// ============================================================================

/// Dispatches configuration generator subcommands.
fn command_configuration(
    config: &CatalogSyncConfig,
    command: ConfigurationCommand,
) -> CliResult<ExitCode> {
    match command {
        ConfigurationCommand::Generate(args) => command_configuration_generate(config, &args),
        ConfigurationCommand::Check(args) => command_configuration_check(config, &args),
    }
}

/// Executes configuration generation.
fn command_configuration_generate(
    config: &CatalogSyncConfig,
    args: &ConfigurationArgs,
) -> CliResult<ExitCode> {
    let fail = |error: String| CliError::new(t!("configuration.generate.failed", error = error));
    let (generator, output) = load_configuration(config, args).map_err(fail)?;
    let rendered = generator.render();
    let (root_dir, relative) = output_target(&config.project_root(), &output);
    let root = open_root(&root_dir).map_err(|err| fail(err.to_string()))?;
    let mut staged = StagedWrites::new(&root).map_err(|err| fail(err.to_string()))?;
    staged.stage(&relative, rendered.as_bytes()).map_err(|err| fail(err.to_string()))?;
    staged.commit().map_err(|err| fail(err.to_string()))?;
    write_stdout_line(&t!(
        "configuration.generate.ok",
        path = output.display(),
        entries = generator.entries().len()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes configuration verification.
fn command_configuration_check(
    config: &CatalogSyncConfig,
    args: &ConfigurationArgs,
) -> CliResult<ExitCode> {
    let fail = |error: String| CliError::new(t!("configuration.check.failed", error = error));
    let (generator, output) = load_configuration(config, args).map_err(fail)?;
    let (root_dir, relative) = output_target(&config.project_root(), &output);
    let root = open_root(&root_dir).map_err(|err| fail(err.to_string()))?;
    let existing = read_text_file(&root, &relative, MAX_ARTIFACT_BYTES)
        .map_err(|err| fail(err.to_string()))?;
    if existing.as_deref() == Some(generator.render().as_str()) {
        write_stdout_line(&t!("configuration.check.ok", path = output.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    write_stderr_line(&t!("configuration.check.stale", path = output.display()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::FAILURE)
}

/// Loads the keys manifest and resolves the output path.
fn load_configuration(
    config: &CatalogSyncConfig,
    args: &ConfigurationArgs,
) -> Result<(ConfigurationGenerator, PathBuf), String> {
    let input = args.input.as_ref().unwrap_or(&config.configuration.input);
    let output = args.output.clone().unwrap_or_else(|| config.configuration.output.clone());
    let generator = ConfigurationGenerator::load(config.project_root().join(input))
        .map_err(|err| err.to_string())?;
    Ok((generator, output))
}

/// Splits an output path into the directory to open and the path below it.
///
/// Relative outputs resolve against the project root; absolute outputs are
/// written into their own parent directory.
fn output_target(project_root: &Path, output: &Path) -> (PathBuf, PathBuf) {
    if output.is_relative() {
        return (project_root.to_path_buf(), output.to_path_buf());
    }
    match (output.parent(), output.file_name()) {
        (Some(parent), Some(name)) => (parent.to_path_buf(), PathBuf::from(name)),
        _ => (project_root.to_path_buf(), output.to_path_buf()),
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes config validation.
fn command_config_validate(config: &CatalogSyncConfig) -> CliResult<ExitCode> {
    write_stdout_line(&t!("config.validate.ok", domains = config.domain_names().join(", ")))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Locale Helpers
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr().lock();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
