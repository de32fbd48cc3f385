//! CLI logic for the Branchline graph tool.
//!
//! Every subcommand reads a JSON graph document and writes JSON (or, for
//! `list`, plain lines) to the given writer.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Write},
};

use log::{info, warn};
use serde::Serialize;

use branchline::{BranchlineError, DocumentSet, GraphEngine, identifier::Id};
use branchline_document::validate::ValidationReport;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `validate` found error-level integrity problems.
    ValidationFailed,
}

#[derive(Serialize)]
struct ListEntry<'a> {
    key: &'a str,
    label: &'a str,
}

/// Run the Branchline CLI application
///
/// # Errors
///
/// Returns `BranchlineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed documents
/// - Unknown graph keys
/// - Integrity errors under strict settings
pub fn run(args: &Args, out: &mut impl Write) -> Result<Outcome, BranchlineError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let engine = GraphEngine::new(app_config);

    match &args.command {
        Command::List { input } => {
            let set = read_documents(&engine, input)?;
            let entries: Vec<ListEntry<'_>> = set
                .keys()
                .filter_map(|key| set.label(key).map(|label| ListEntry { key, label }))
                .collect();
            write_json(out, &entries)?;
        }
        Command::Layout {
            input,
            graph,
            output,
        } => {
            let set = read_documents(&engine, input)?;
            let pass = engine.prepare_key(&set, graph.as_deref())?;
            let plan = pass.render_plan();
            let json = plan.to_json().map_err(io::Error::from)?;

            match output {
                Some(path) => {
                    fs::write(path, json)?;
                    info!(output_file = path; "Render plan exported");
                }
                None => writeln!(out, "{json}")?,
            }
        }
        Command::Validate { input } => {
            let set = read_documents(&engine, input)?;
            let report = ValidationReport::from_set(&set);
            write_json(out, &report)?;

            info!(
                graphs = report.graphs_examined(),
                errors = report.error_count();
                "Validation finished"
            );
            if report.has_errors() {
                return Ok(Outcome::ValidationFailed);
            }
        }
        Command::Highlight { input, node, graph } => {
            let set = read_documents(&engine, input)?;
            let pass = engine.prepare_key(&set, graph.as_deref())?;
            let focus = Id::new(node);
            if !pass.graph().contains(focus) {
                warn!(node; "Focal node is not part of the graph");
            }
            let highlight = pass.highlight_engine().compute(focus);
            write_json(out, &highlight)?;
        }
    }

    Ok(Outcome::Success)
}

fn read_documents(engine: &GraphEngine, input: &str) -> Result<DocumentSet, BranchlineError> {
    info!(input_path = input; "Reading graph document");
    let source = fs::read_to_string(input)?;
    engine.parse(&source)
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), BranchlineError> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    writeln!(out, "{json}")?;
    Ok(())
}
