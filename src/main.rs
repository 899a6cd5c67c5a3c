//! kvcert - Azure Key Vault certificate lookup
//!
//! Prints the subject, thumbprint and private key availability of a
//! certificate stored in Azure Key Vault.

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kvcert::cli::Cli;
use kvcert::config;
use kvcert::error::Result;

const DEFAULT_FILTER: &str = "kvcert=warn";
const VERBOSE_FILTER: &str =
    "kvcert=debug,reqwest=trace,hyper=debug,hyper_util=debug,azure_core=trace,azure_identity=debug";

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    if let Err(e) = run(cli, cancel).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    let config = config::load_config()?;
    cli.execute(config, cancel).await
}

/// Cancel in-flight requests on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling");
            cancel.cancel();
        }
    });
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
