//! Self-test runner for stowage.
//!
//! Creates a scratch environment at the given path and exercises the padded
//! maps against it. Refuses to touch a path that already exists.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use snafu::{ensure, ResultExt, Snafu};
use stowage::selftest::{self, SelfTestError};
use stowage::{ConfigError, EnvironmentConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "USAGE:\n  stowage-selftest DB_PATH\n\nNB there must be no file present at DB_PATH.";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// JSON when stdout is not a terminal, text otherwise.
    Auto,
    /// Human-readable text.
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "stowage-selftest")]
#[command(about = "Run the stowage self-test against a scratch database file")]
struct Cli {
    /// Path of the scratch database file to create
    db_path: PathBuf,

    /// Maximum map size in bytes
    #[arg(long, env = "STOWAGE_MAP_SIZE")]
    map_size: Option<usize>,

    /// Maximum number of named collections
    #[arg(long, env = "STOWAGE_MAX_COLLECTIONS")]
    max_collections: Option<u32>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Auto)]
    log_format: LogFormat,
}

#[derive(Debug, Snafu)]
enum RunError {
    #[snafu(display("File exists at {}", path.display()))]
    PathExists { path: PathBuf },

    #[snafu(display("{source}"))]
    Config { source: ConfigError },

    #[snafu(display("{source}"))]
    SelfTest { source: SelfTestError },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return exit_after_print(err.print());
        },
        Err(err) => return bail(err.kind().as_str().unwrap_or("Bad arguments")),
    };

    init_logging(cli.log_format);

    match execute(&cli) {
        Ok(()) => {
            info!("All tests finished successfully");
            ExitCode::SUCCESS
        },
        Err(err @ RunError::PathExists { .. }) => bail(&err.to_string()),
        Err(err) => {
            error!(error = %err, "Self-test failed");
            ExitCode::FAILURE
        },
    }
}

fn execute(cli: &Cli) -> Result<(), RunError> {
    ensure!(!cli.db_path.exists(), PathExistsSnafu { path: &cli.db_path });

    let config = EnvironmentConfig::builder()
        .maybe_map_size(cli.map_size)
        .maybe_max_collections(cli.max_collections)
        .build()
        .context(ConfigSnafu)?;

    info!(path = %cli.db_path.display(), "Running self-test");
    selftest::run(&cli.db_path, config).context(SelfTestSnafu)
}

fn exit_after_print(printed: std::io::Result<()>) -> ExitCode {
    match printed {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn bail(message: &str) -> ExitCode {
    eprintln!("\n========== BAILING: ==========\n## {message}\n{USAGE}\n");
    ExitCode::FAILURE
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stdout().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry().with(env_filter).with(fmt::layer()).init();
    }
}
