//! Stockroom - Entry point
//!
//! Loads configuration (defaults, optional file, `.env`, `STOCKROOM__*`
//! environment variables) and serves the catalogue API.

use std::path::PathBuf;

use stockroom::config::DEFAULT_ENV_PREFIX;
use stockroom::{ConfigLoader, StartupError, StockroomConfig};

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
    /// Start from the development preset.
    dev: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;
        let mut dev = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--dev" => dev = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("stockroom {}", stockroom::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config, dev }
    }
}

fn print_help() {
    println!(
        r"Stockroom - Catalogue API for categories, products and suppliers

USAGE:
    stockroom [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
        --dev              Start from the development preset (pretty debug logs,
                           exposed internal errors, bound to 127.0.0.1)
    -h, --help             Print help information
    -v, --version          Print version information

Without --config, ./stockroom.toml is used when present.

ENVIRONMENT VARIABLES:
    STOCKROOM__SERVER__HTTP_ADDR               Bind address (default: 0.0.0.0:5000)
    STOCKROOM__SERVER__SHUTDOWN_TIMEOUT_SECS   Graceful shutdown timeout (default: 30)
    STOCKROOM__SERVER__REQUEST_TIMEOUT_MS      Request timeout (default: 30000)
    STOCKROOM__LOGGING__LEVEL                  Log level (default: info)
    STOCKROOM__LOGGING__FORMAT                 json | pretty (default: json)
    STOCKROOM__ERRORS__EXPOSE_INTERNAL_ERRORS  Send internal error messages to clients
    STOCKROOM__DATA__SEED_PATH                 JSON seed file for the in-memory store
    RUST_LOG                                   Overrides the log level filter
"
    );
}

fn load_config(args: &Args) -> Result<StockroomConfig, StartupError> {
    let mut loader = ConfigLoader::new();
    if args.dev {
        loader = loader.with_development();
    }
    let loader = loader.with_dotenv();
    let loader = match &args.config {
        Some(path) => loader.with_file(path)?,
        None => loader.with_optional_file("stockroom.toml")?,
    };
    Ok(loader.with_env_prefix(DEFAULT_ENV_PREFIX).load()?)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from this file, so it is not installed yet
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = stockroom::run(config).await {
        tracing::error!(error = %e, "stockroom stopped with an error");
        eprintln!("stockroom: {e}");
        std::process::exit(1);
    }
}
