//! Batch processing of documents on disk.
//!
//! Documents are processed one at a time, in the order given. Before each one
//! the [`ProgressObserver`] is notified and may abort the batch; an abort only
//! takes effect between documents. A failing document never stops the batch.

use std::{
    fs,
    io::Write,
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use tempfile::NamedTempFile;

use scrub_core::graph::ObjectGraph;
use scrub_parser::error::Diagnostic;

use crate::{ScrubOutcome, Scrubber, error::ScrubError};

/// Provides the live object graph of a document.
pub trait GraphLoader {
    /// The graph type produced.
    type Graph: ObjectGraph;

    /// Loads the live graph of the document at `path`, whose text is `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::NotADocument`] if the file is not a text scene
    /// document; the batch then skips it.
    fn load(&self, path: &Path, source: &str) -> Result<Self::Graph, ScrubError>;
}

/// Receives batch progress.
pub trait ProgressObserver {
    /// Called before document `index` (zero-based) of `total` is processed.
    /// Returning [`ControlFlow::Break`] aborts the batch.
    fn on_document(&mut self, index: usize, total: usize, path: &Path) -> ControlFlow<()> {
        let _ = (index, total, path);
        ControlFlow::Continue(())
    }

    /// Called with the anomalies found in a document.
    fn on_diagnostics(&mut self, path: &Path, source: &str, diagnostics: &[Diagnostic]) {
        let _ = source;
        for diagnostic in diagnostics {
            let path = path.display().to_string();
            if diagnostic.severity().is_error() {
                error!(path, diagnostic:%; "Document anomaly");
            } else {
                warn!(path, diagnostic:%; "Document anomaly");
            }
        }
    }

    /// Called once when the batch ends, aborted or not.
    fn on_finished(&mut self, summary: &BatchSummary) {
        let _ = summary;
    }
}

/// An observer that never aborts and logs diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// What happened to the documents of a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    processed: usize,
    modified: Vec<PathBuf>,
    unchanged: usize,
    skipped: Vec<PathBuf>,
    failed: Vec<(PathBuf, ScrubError)>,
    aborted: bool,
}

impl BatchSummary {
    /// Number of documents visited.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Documents rewritten, in processing order.
    pub fn modified(&self) -> &[PathBuf] {
        &self.modified
    }

    /// Number of documents left as they were.
    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    /// Files that are not text scene documents.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Documents that could not be processed.
    pub fn failed(&self) -> &[(PathBuf, ScrubError)] {
        &self.failed
    }

    /// Whether the observer aborted the batch.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

enum Status {
    Modified,
    Unchanged,
}

/// Runs a [`Scrubber`] over a list of documents.
#[derive(Debug)]
pub struct BatchRunner<'s, L> {
    scrubber: &'s Scrubber,
    loader: L,
    dry_run: bool,
}

impl<'s, L: GraphLoader> BatchRunner<'s, L> {
    /// Creates a runner loading live graphs with `loader`.
    pub fn new(scrubber: &'s Scrubber, loader: L) -> Self {
        Self {
            scrubber,
            loader,
            dry_run: false,
        }
    }

    /// When set, documents are scrubbed but never written back.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes `paths` in order.
    pub fn run<P: AsRef<Path>>(
        &self,
        paths: &[P],
        observer: &mut dyn ProgressObserver,
    ) -> BatchSummary {
        let total = paths.len();
        let mut summary = BatchSummary::default();
        info!(documents_count = total, dry_run = self.dry_run; "Starting batch");

        for (index, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            if observer.on_document(index, total, path).is_break() {
                info!(processed = summary.processed; "Batch aborted");
                summary.aborted = true;
                break;
            }

            summary.processed += 1;
            match self.process(path, observer) {
                Ok(Status::Modified) => summary.modified.push(path.to_path_buf()),
                Ok(Status::Unchanged) => summary.unchanged += 1,
                Err(ScrubError::NotADocument(path)) => {
                    warn!(path = path.display().to_string(); "Skipping non-document asset");
                    summary.skipped.push(path);
                }
                Err(err) => {
                    error!(path = path.display().to_string(), err:%; "Failed to scrub document");
                    summary.failed.push((path.to_path_buf(), err));
                }
            }
        }

        info!(
            processed = summary.processed,
            modified = summary.modified.len(),
            unchanged = summary.unchanged,
            skipped = summary.skipped.len(),
            failed = summary.failed.len();
            "Batch finished"
        );
        observer.on_finished(&summary);

        summary
    }

    fn process(&self, path: &Path, observer: &mut dyn ProgressObserver) -> Result<Status, ScrubError> {
        let bytes = fs::read(path)?;
        let source =
            String::from_utf8(bytes).map_err(|_| ScrubError::NotADocument(path.to_path_buf()))?;

        let graph = self.loader.load(path, &source)?;
        let outcome: ScrubOutcome = self.scrubber.scrub(&source, &graph);

        if !outcome.diagnostics().is_empty() {
            observer.on_diagnostics(path, &source, outcome.diagnostics());
        }

        let Some(output) = outcome.output() else {
            debug!(path = path.display().to_string(); "Document unchanged");
            return Ok(Status::Unchanged);
        };

        if self.dry_run {
            info!(
                path = path.display().to_string(),
                removed_lines = outcome.removed_lines();
                "Document would be modified"
            );
        } else {
            write_atomically(path, output)?;
            info!(
                path = path.display().to_string(),
                removed_lines = outcome.removed_lines();
                "Document modified"
            );
        }

        Ok(Status::Modified)
    }
}

/// Replaces the file at `path` with `contents` through a temporary file in the
/// same directory, keeping the original permissions.
fn write_atomically(path: &Path, contents: &str) -> Result<(), ScrubError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.as_file().set_permissions(permissions)?;
    file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::project::{DocumentGraphLoader, ScriptRegistry};

    use super::*;

    const BROKEN: &str = "%YAML 1.1
--- !u!1 &100
GameObject:
  m_Component:
  - component: {fileID: 200}
  - component: {fileID: 201}
--- !u!4 &200
Transform:
  m_GameObject: {fileID: 100}
  m_Children: []
  m_Father: {fileID: 0}
";

    const FIXED: &str = "%YAML 1.1
--- !u!1 &100
GameObject:
  m_Component:
  - component: {fileID: 200}
--- !u!4 &200
Transform:
  m_GameObject: {fileID: 100}
  m_Children: []
  m_Father: {fileID: 0}
";

    fn runner(scrubber: &Scrubber) -> BatchRunner<'_, DocumentGraphLoader> {
        BatchRunner::new(scrubber, DocumentGraphLoader::new(ScriptRegistry::new()))
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(usize, usize)>,
        abort_at: Option<usize>,
        finished: bool,
    }

    impl ProgressObserver for Recorder {
        fn on_document(&mut self, index: usize, total: usize, _path: &Path) -> ControlFlow<()> {
            self.seen.push((index, total));
            if self.abort_at == Some(index) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }

        fn on_finished(&mut self, _summary: &BatchSummary) {
            self.finished = true;
        }
    }

    #[test]
    fn test_modifies_and_skips() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.prefab");
        let fixed = dir.path().join("fixed.prefab");
        let binary = dir.path().join("binary.prefab");
        fs::write(&broken, BROKEN).unwrap();
        fs::write(&fixed, FIXED).unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x01]).unwrap();

        let scrubber = Scrubber::default();
        let mut recorder = Recorder::default();
        let summary = runner(&scrubber).run(&[&broken, &fixed, &binary], &mut recorder);

        assert_eq!(summary.processed(), 3);
        assert_eq!(summary.modified(), [broken.clone()]);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.skipped(), [binary]);
        assert!(summary.failed().is_empty());
        assert!(!summary.is_aborted());
        assert_eq!(recorder.seen, vec![(0, 3), (1, 3), (2, 3)]);
        assert!(recorder.finished);

        assert_eq!(fs::read_to_string(&broken).unwrap(), FIXED);
        assert_eq!(fs::read_to_string(&fixed).unwrap(), FIXED);
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.prefab");
        fs::write(&broken, BROKEN).unwrap();

        let scrubber = Scrubber::default();
        let summary = runner(&scrubber)
            .with_dry_run(true)
            .run(&[&broken], &mut NoProgress);

        assert_eq!(summary.modified().len(), 1);
        assert_eq!(fs::read_to_string(&broken).unwrap(), BROKEN);
    }

    #[test]
    fn test_abort_between_documents() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.prefab");
        let second = dir.path().join("b.prefab");
        fs::write(&first, BROKEN).unwrap();
        fs::write(&second, BROKEN).unwrap();

        let scrubber = Scrubber::default();
        let mut recorder = Recorder {
            abort_at: Some(1),
            ..Recorder::default()
        };
        let summary = runner(&scrubber).run(&[&first, &second], &mut recorder);

        assert!(summary.is_aborted());
        assert_eq!(summary.processed(), 1);
        assert!(recorder.finished);
        assert_eq!(fs::read_to_string(&first).unwrap(), FIXED);
        assert_eq!(fs::read_to_string(&second).unwrap(), BROKEN);
    }

    #[test]
    fn test_missing_file_fails_without_stopping() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.prefab");
        let broken = dir.path().join("broken.prefab");
        fs::write(&broken, BROKEN).unwrap();

        let scrubber = Scrubber::default();
        let summary = runner(&scrubber).run(&[&missing, &broken], &mut NoProgress);

        assert_eq!(summary.failed().len(), 1);
        assert!(matches!(summary.failed()[0].1, ScrubError::Io(_)));
        assert_eq!(summary.modified(), [broken]);
    }

    #[test]
    fn test_write_keeps_line_endings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crlf.prefab");
        fs::write(&path, BROKEN.replace('\n', "\r\n")).unwrap();

        let scrubber = Scrubber::default();
        runner(&scrubber).run(&[&path], &mut NoProgress);

        assert_eq!(fs::read_to_string(&path).unwrap(), FIXED.replace('\n', "\r\n"));
    }
}
