//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,cityrank_data=info,cityrank_cli=info";

fn main() {
    init_logging();
    if let Err(err) = cityrank_cli::run() {
        eprintln!("cityrank: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
