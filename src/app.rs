use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;
use crate::interfaces::cli::{self, Cli};

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            tracing::error!(error = %err, "Failed to load configuration");
            return ExitCode::from(2);
        }
    };
    init_tracing(&config.log.filter);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "Failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(cli::execute(cli.command, &config))
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr so stdout stays JSON.
fn init_tracing(filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
