//! CLI module
//!
//! Command-line interface for running the ingestion pipeline.
//!
//! # Arguments
//!
//! Six positional arguments, in order: source bucket, source prefix,
//! destination bucket, destination prefix, partition path literal and the
//! entity list.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
