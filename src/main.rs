//! snipeit CLI entrypoint.
//!
//! Runs one reconciliation module and prints its result object on stdout.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use serde::de::DeserializeOwned;
use snipeit_reconcile::cli::{Cli, Commands, OutputFormatter};
use snipeit_reconcile::config::{
    ArgsParser, ArgsValidator, CategorySpec, ConnectionArgs, EntrySpec, ModelSpec, ResourceSpec,
};
use snipeit_reconcile::error::Result;
use snipeit_reconcile::reconciler::{ReconciliationResult, Reconciler};
use snipeit_reconcile::snipeit::SnipeItClient;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let formatter = OutputFormatter::new(cli.output);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(result) => {
            emit(&formatter.format_result(&result));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            emit(&formatter.format_failure(&e));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system. Logs go to stderr; stdout carries the result.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Writes the result document to stdout.
fn emit(document: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{document}") {
        eprintln!("Failed to write result: {e}");
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ReconciliationResult> {
    let parser = ArgsParser::new();
    parser.load_dotenv()?;

    let (connection, file_check_mode, spec) = match cli.command {
        Commands::Category(flags) => {
            let args = load_args::<CategorySpec>(&parser, flags.args_file.as_deref())?;
            (args.connection, args.check_mode, ResourceSpec::from(flags.into_spec(args.resource)?))
        }
        Commands::Model(flags) => {
            let args = load_args::<ModelSpec>(&parser, flags.args_file.as_deref())?;
            (args.connection, args.check_mode, ResourceSpec::from(flags.into_spec(args.resource)?))
        }
        Commands::Entry(flags) => {
            let args = load_args::<EntrySpec>(&parser, flags.args_file.as_deref())?;
            (args.connection, args.check_mode, ResourceSpec::from(flags.into_spec(args.resource)?))
        }
    };

    let connection = ArgsParser::resolve_connection(&cli.connection.over(connection))?;
    debug!("Connection: {connection:?}");

    let validator = ArgsValidator::new();
    validator.validate_connection(&connection)?;
    validator.validate(&spec)?;

    let client = SnipeItClient::new(&connection)?;
    let reconciler = Reconciler::new(&client).with_check_mode(cli.check || file_check_mode);

    reconciler.reconcile(&spec).await
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Arguments read from an args file, if one was given.
struct LoadedArgs<T> {
    connection: ConnectionArgs,
    resource: Option<T>,
    check_mode: bool,
}

/// Loads the module arguments file, if any.
fn load_args<T: DeserializeOwned>(parser: &ArgsParser, path: Option<&Path>) -> Result<LoadedArgs<T>> {
    let Some(path) = path else {
        return Ok(LoadedArgs {
            connection: ConnectionArgs::default(),
            resource: None,
            check_mode: false,
        });
    };

    let args = parser.load_file::<T>(path)?;
    let check_mode = args.is_check_mode();
    Ok(LoadedArgs {
        connection: args.connection,
        resource: Some(args.resource),
        check_mode,
    })
}
