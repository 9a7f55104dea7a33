use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "certrace",
    version,
    about = "Render hardware certification telemetry into report documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render device report files into a markdown summary with charts
    Render {
        /// Report files, or directories to scan for *.json report files
        #[arg(required = true)]
        reports: Vec<PathBuf>,

        /// Output directory for summary.md and its images
        #[arg(long, default_value = "certrace-report")]
        out: PathBuf,
    },

    /// List the suites contained in report files
    Suites {
        /// Report files, or directories to scan for *.json report files
        #[arg(required = true)]
        reports: Vec<PathBuf>,
    },
}
