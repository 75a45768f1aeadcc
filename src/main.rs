//! envguard
//!
//! Validate the process environment against a schema document.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use envguard::{
    AnySchema, EnvMap, EnvSchema, ExecutionContext, LoadOptions, ObjectSchema,
    check_public_prefix,
    config::{LogFormat, Settings, load_settings},
    load_env, read_schema_file,
    report::ColorMode,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// envguard - typed environment validation with server/client partitioning
#[derive(Parser, Debug)]
#[command(name = "envguard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to settings file
    #[arg(short, long, env = "ENVGUARD_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ENVGUARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the current environment and print the parsed values
    Check(CheckArgs),

    /// Print the shape (unified or split) of a schema document
    Shape {
        /// Path to the schema document
        #[arg(short, long)]
        schema: PathBuf,

        /// Also list every field with its kind and description
        #[arg(long)]
        fields: bool,
    },
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Path to the schema document
    #[arg(short, long)]
    schema: PathBuf,

    /// Execution context (server, client)
    #[arg(long)]
    context: Option<String>,

    /// Return an error instead of exiting the process on validation failure
    #[arg(long)]
    no_exit: bool,

    /// Prefix of variables visible to client validation
    #[arg(long)]
    prefix: Option<String>,

    /// Report styling (auto, always, never)
    #[arg(long)]
    color: Option<String>,
}

fn init_logging(settings: &Settings, cli_level: Option<&str>) {
    let level = cli_level.unwrap_or(&settings.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match settings.logging.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn check_options(settings: &Settings, args: &CheckArgs) -> anyhow::Result<LoadOptions> {
    let mut options = settings.load_options();

    if let Some(context) = args.context.as_deref() {
        options.context = context
            .parse::<ExecutionContext>()
            .map_err(anyhow::Error::msg)?;
    }
    if let Some(prefix) = &args.prefix {
        options.public_prefix = prefix.clone();
    }
    if let Some(color) = args.color.as_deref() {
        options.color = color.parse::<ColorMode>().map_err(anyhow::Error::msg)?;
    }
    if args.no_exit {
        options.exit_on_error = false;
    }
    check_public_prefix(&options.public_prefix)?;

    Ok(options)
}

fn run_check(settings: &Settings, args: &CheckArgs) -> anyhow::Result<()> {
    let options = check_options(settings, args)?;

    let schema = read_schema_file(&args.schema)
        .with_context(|| format!("Failed to read schema {}", args.schema.display()))?;
    debug!(shape = %schema.shape(), "Loaded schema document");

    let input = EnvMap::from_process();
    let loaded = load_env(&schema, &input, &options)?;
    info!(context = %options.context, "Environment is valid");

    let view = schema.redacted_view(&loaded);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn run_shape(path: &Path, fields: bool) -> anyhow::Result<()> {
    let schema = read_schema_file(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    println!("{}", schema.shape());

    if fields {
        match &schema {
            AnySchema::Unified(object) => print_fields("", object),
            AnySchema::Split(split) => {
                print_fields("server.", &split.server);
                print_fields("client.", &split.client);
            }
        }
    }
    Ok(())
}

/// One line per field: name, kind, flags and description
fn print_fields(scope: &str, schema: &ObjectSchema) {
    for (name, field) in schema.fields() {
        let mut line = format!("{}{}\t{}", scope, name, field.kind().name());
        if field.is_optional() {
            line.push_str(" optional");
        }
        if field.is_secret() {
            line.push_str(" secret");
        }
        if let Some(default) = field.default_raw().filter(|_| !field.is_secret()) {
            line.push_str(&format!(" default={}", default));
        }
        if let Some(description) = field.description() {
            line.push_str(&format!("\t{}", description));
        }
        println!("{}", line);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load settings
    let settings = load_settings(cli.config.as_deref())?;

    // Initialize logging
    init_logging(&settings, cli.log_level.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting envguard");

    match &cli.command {
        Command::Check(args) => run_check(&settings, args),
        Command::Shape { schema, fields } => run_shape(schema, *fields),
    }
    .inspect_err(|e| error!(error = %e, "envguard failed"))
}
