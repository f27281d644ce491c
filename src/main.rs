//! hr-lake
//!
//! Ingests one partition of HR extracts per invocation:
//!
//! ```text
//! hr-lake <source-bucket> <source-prefix> <dest-bucket> <dest-prefix> <partition> <entities>
//! ```

use clap::Parser;
use hr_lake::cli::{Cli, Runner};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!(
        "{} {}: partition '{}' from {}/{} to {}/{}",
        hr_lake::NAME,
        hr_lake::VERSION,
        cli.partition,
        cli.source_bucket,
        cli.source_prefix,
        cli.dest_bucket,
        cli.dest_prefix
    );

    match Runner::new(cli).run().await {
        Ok(report) => {
            info!(
                "Ingested {} rows: {} entit(ies) written, {} without data",
                report.total_rows(),
                report.written_count(),
                report.skipped_count()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Ingestion failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
