//! Scrub CLI library
//!
//! This module contains the core CLI logic for the Scrub tool.

pub mod assets;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io, ops::ControlFlow, path::Path};

use log::{debug, error, info, warn};

use scrub::{
    ScrubError, Scrubber,
    batch::{BatchRunner, BatchSummary, ProgressObserver},
    project::{DocumentGraphLoader, ScriptRegistry},
};
use scrub_parser::error::Diagnostic;

use error_adapter::diagnostics_to_reportables;

/// Run the Scrub CLI application
///
/// This function scrubs every document of the project through the Scrub
/// pipeline, writing back the documents that change.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ScrubError` for failures before the batch starts:
/// - Unreadable project root
/// - Configuration loading errors
/// - Script registry scan errors
///
/// Failures of individual documents are reported in the [`BatchSummary`].
pub fn run(args: &Args) -> Result<BatchSummary, ScrubError> {
    info!(
        project_path = args.project,
        dry_run = args.dry_run;
        "Scrubbing project"
    );

    let root = Path::new(&args.project);
    if !fs::metadata(root)?.is_dir() {
        return Err(ScrubError::Io(io::Error::other(format!(
            "project root is not a directory: {}",
            root.display()
        ))));
    }

    // Load configuration
    let app_config = config::load_config(args.config.as_ref(), root)?;

    // Resolve the scripts known to the project
    let registry = ScriptRegistry::scan(root, app_config.scan())?;

    let documents = assets::enumerate(root, app_config.scan().extensions())?;
    info!(documents_count = documents.len(); "Documents found");

    let scrubber = Scrubber::new(app_config);
    let runner =
        BatchRunner::new(&scrubber, DocumentGraphLoader::new(registry)).with_dry_run(args.dry_run);
    let summary = runner.run(&documents, &mut LogProgress);

    Ok(summary)
}

/// Reports progress through the log, rendering document diagnostics with
/// miette.
#[derive(Debug, Default)]
struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_document(&mut self, index: usize, total: usize, path: &Path) -> ControlFlow<()> {
        debug!(index = index + 1, total, path = path.display().to_string(); "Scrubbing document");
        ControlFlow::Continue(())
    }

    fn on_diagnostics(&mut self, path: &Path, source: &str, diagnostics: &[Diagnostic]) {
        let reporter = miette::GraphicalReportHandler::new();

        for (reportable, diagnostic) in diagnostics_to_reportables(diagnostics, source)
            .iter()
            .zip(diagnostics)
        {
            let mut writer = String::new();
            if reporter.render_report(&mut writer, reportable).is_err() {
                writer = diagnostic.to_string();
            }

            if diagnostic.severity().is_error() {
                error!("{}\n{writer}", path.display());
            } else {
                warn!("{}\n{writer}", path.display());
            }
        }
    }

    fn on_finished(&mut self, summary: &BatchSummary) {
        for (path, err) in summary.failed() {
            error!(path = path.display().to_string(), err:%; "Document failed");
        }
    }
}
