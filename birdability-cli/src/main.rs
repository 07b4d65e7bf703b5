use std::path::PathBuf;

use anyhow::{Context, Result};
use birdability::{BirdabilityConfig, DEFAULT_CONFIG_FILE, Revision};
use clap::{Parser, Subcommand};
use tracing::{debug, error};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "birdability")]
#[command(about = "Inspect, convert and share Birdability accessibility reports")]
#[command(version)]
#[command(long_about = "Reads report files written by the Birdability checklist and turns them \
into Survey123 links, normalized report documents and email drafts.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, help = "Path to TOML configuration file")]
    config: PathBuf,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List every checklist field with its kind
    Schema,

    /// Print the Survey123 parameters of a report as JSON
    Params {
        report: PathBuf,
        #[arg(long, value_name = "REVISION")]
        revision: Option<Revision>,
    },

    /// Print the Survey123 link that pre-fills a report
    Survey123 {
        report: PathBuf,
        #[arg(long, value_name = "REVISION")]
        revision: Option<Revision>,
    },

    /// Normalize a report and write it under its site name
    Export {
        report: PathBuf,
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print a mailto link carrying a report
    Email { report: PathBuf },

    /// Show or clear the draft kept in the configured storage directory
    Draft {
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    debug!("Configuration file: {}", args.config.display());
    let config = BirdabilityConfig::load_from_file(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))
        .inspect_err(|e| error!("{:#}", e))?;

    match args.command {
        Command::Schema => commands::print_schema(),
        Command::Params { report, revision } => {
            commands::params(&config, &report, revision)?
        }
        Command::Survey123 { report, revision } => {
            commands::survey123(&config, &report, revision)?
        }
        Command::Export { report, out_dir } => commands::export(&config, &report, &out_dir)?,
        Command::Email { report } => commands::email(&config, &report)?,
        Command::Draft { clear } => commands::draft(&config, clear)?,
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("birdability={log_level},birdability_cli={log_level}"))
    });

    // Logs go to stderr; stdout carries command output.
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{format}', using default");
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .context("failed to install the log subscriber")?;

    Ok(())
}
