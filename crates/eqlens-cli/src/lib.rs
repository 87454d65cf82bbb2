//! eqlens CLI Library
//!
//! Batch analysis of equipment CSV files without a running server.
//!
//! # Overview
//!
//! - **Summary**: Print the report statistics (`eqlens summary`)
//! - **Distribution**: Type counts as JSON (`eqlens distribution`)
//! - **Charts**: Chart specifications as JSON (`eqlens charts`)
//! - **Report**: Write the two-page PDF report (`eqlens report`)

pub mod commands;
pub mod error;
pub mod input;

pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// eqlens - equipment data analysis
#[derive(Parser, Debug)]
#[command(name = "eqlens")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print summary statistics for a CSV file
    Summary {
        /// Equipment CSV file
        input: PathBuf,
    },

    /// Print the equipment type distribution as JSON
    Distribution {
        /// Equipment CSV file
        input: PathBuf,
    },

    /// Print chart specifications as JSON
    Charts {
        /// Equipment CSV file
        input: PathBuf,

        /// Print the per-equipment parameter chart instead of the dashboard
        #[arg(long)]
        equipment: bool,
    },

    /// Render the PDF report
    Report {
        /// Equipment CSV file
        input: PathBuf,

        /// Where to write the PDF
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },
}
