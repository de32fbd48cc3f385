//! Command-line argument definitions for the Branchline CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global flags select the configuration file and logging
//! verbosity; each subcommand names its input document.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Branchline graph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the graph keys and labels of a document
    List {
        /// Path to the input JSON document
        input: String,
    },

    /// Compute the render plan of one graph
    Layout {
        /// Path to the input JSON document
        input: String,

        /// Key of the graph to lay out; the first graph when omitted
        #[arg(short, long)]
        graph: Option<String>,

        /// Path to the output JSON file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Report integrity findings for every graph of a document
    Validate {
        /// Path to the input JSON document
        input: String,
    },

    /// Print the highlight sets around a node
    Highlight {
        /// Path to the input JSON document
        input: String,

        /// Focal node id
        #[arg(short, long)]
        node: String,

        /// Key of the graph; the first graph when omitted
        #[arg(short, long)]
        graph: Option<String>,
    },
}
