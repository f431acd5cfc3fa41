//! cgmlst-export
//!
//! Dumps cgMLST allele-call profiles from MongoDB as a stream of minified
//! BSON documents.
//!
//! # Usage
//!
//! ```bash
//! # Default deployment, records on stdout
//! cgmlst-export > profiles.bson
//!
//! # Explicit source and output file
//! cgmlst-export --uri mongodb://localhost:27017 --database wgsa-edge -o profiles.bson
//! ```

use cgmlst_export::cli::CliInterface;
use cgmlst_export::error::Result;
use cgmlst_export::export::run_export;

/// Application entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or run the export
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    run_export(cli.config()).await?;
    Ok(())
}

/// Initialize logging on stderr; stdout carries the BSON stream
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(logging.level.to_tracing_level())
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
