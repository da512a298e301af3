//! Diagnostics for failures the pipeline recovers from
//!
//! Session discovery never aborts because of a single bad archive, file or
//! directory. Each such event is turned into a [`Diagnostic`] and handed to a
//! [`DiagnosticObserver`], so the failures stay observable without changing
//! what the pipeline returns.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::types::StreamKind;

/// A recovered failure or a deliberate skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Input folder does not exist or is not a directory
    MissingFolder { path: PathBuf },
    /// A directory entry could not be read during a walk
    WalkFailed { path: Option<PathBuf>, message: String },
    /// Archive already has an extraction output directory
    ArchiveAlreadyExtracted { archive: PathBuf, output: PathBuf },
    /// Archive could not be extracted
    ArchiveFailed { archive: PathBuf, message: String },
    /// Archive nested deeper than the configured limit was left packed
    ArchiveTooDeep { archive: PathBuf, depth: usize },
    /// Header row could not be read while sniffing content
    HeaderUnreadable { path: PathBuf, message: String },
    /// The file picked for a stream could not be read
    StreamUnreadable {
        session_key: String,
        kind: StreamKind,
        path: PathBuf,
        message: String,
    },
    /// A group produced a session key that was already emitted
    DuplicateSession { session_key: String },
}

impl Diagnostic {
    /// Whether this diagnostic represents a failure rather than a skip
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Diagnostic::WalkFailed { .. }
                | Diagnostic::ArchiveFailed { .. }
                | Diagnostic::HeaderUnreadable { .. }
                | Diagnostic::StreamUnreadable { .. }
        )
    }
}

/// Receives diagnostics as the pipeline runs
pub trait DiagnosticObserver: Send + Sync {
    fn on_diagnostic(&self, diagnostic: &Diagnostic);
}

/// Logs every diagnostic through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DiagnosticObserver for TracingObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::MissingFolder { path } => {
                tracing::debug!("Skipping missing input folder {:?}", path)
            }
            Diagnostic::WalkFailed { path, message } => {
                tracing::warn!("Failed to walk {:?}: {}", path, message)
            }
            Diagnostic::ArchiveAlreadyExtracted { archive, output } => {
                tracing::debug!("Archive {:?} already extracted to {:?}", archive, output)
            }
            Diagnostic::ArchiveFailed { archive, message } => {
                tracing::warn!("Failed to extract {:?}: {}", archive, message)
            }
            Diagnostic::ArchiveTooDeep { archive, depth } => {
                tracing::warn!("Not extracting {:?}: nested {} levels deep", archive, depth)
            }
            Diagnostic::HeaderUnreadable { path, message } => {
                tracing::debug!("Could not read header row of {:?}: {}", path, message)
            }
            Diagnostic::StreamUnreadable {
                session_key,
                kind,
                path,
                message,
            } => tracing::warn!(
                "Session '{}': {} stream from {:?} unreadable: {}",
                session_key,
                kind,
                path,
                message
            ),
            Diagnostic::DuplicateSession { session_key } => {
                tracing::debug!("Skipping duplicate session '{}'", session_key)
            }
        }
    }
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl DiagnosticObserver for NullObserver {
    fn on_diagnostic(&self, _diagnostic: &Diagnostic) {}
}

/// Records diagnostics in memory
#[derive(Debug, Default)]
pub struct CollectingObserver {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Number of recorded failures (skips excluded)
    pub fn failure_count(&self) -> usize {
        self.diagnostics().iter().filter(|d| d.is_failure()).count()
    }
}

impl DiagnosticObserver for CollectingObserver {
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic.clone());
        }
    }
}
