//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Ingest HR CSV extracts into a partitioned Parquet data lake
#[derive(Parser, Debug, Clone)]
#[command(name = "hr-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source bucket (bare S3 name, or s3://, r2://, gs://, az://, file:// URL or local path)
    pub source_bucket: String,

    /// Prefix of the extracts in the source bucket
    pub source_prefix: String,

    /// Destination bucket (same formats as the source bucket)
    pub dest_bucket: String,

    /// Prefix of the output in the destination bucket
    pub dest_prefix: String,

    /// Partition path literal, e.g. year=2024/month=01/day=15
    pub partition: String,

    /// Entities to process: ['employees','jobs'], a JSON array, or comma-separated names
    pub entities: String,

    /// Schema registry file (YAML); defaults to the built-in HR registry
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Split output into files of at most this many rows
    #[arg(long)]
    pub max_rows_per_file: Option<usize>,
}
