//! Top-level session loading
//!
//! For every input folder, in order:
//!
//! 1. Expand archives below the folder ([`ArchiveExpander`])
//! 2. Collect candidates from the folder and its extraction outputs ([`FileCollector`])
//! 3. Group candidates by derived key ([`group_by_session`])
//! 4. Assemble sessions, skipping keys already emitted ([`SessionAssembler`])
//!
//! Nothing below the folder level aborts a load; failures go to the
//! configured [`DiagnosticObserver`].

use std::path::Path;
use std::sync::Arc;

use crate::archive::ArchiveExpander;
use crate::classify::StreamClassifier;
use crate::collect::FileCollector;
use crate::config::LoaderConfig;
use crate::diagnostics::{Diagnostic, DiagnosticObserver, TracingObserver};
use crate::table::{CsvTableReader, TableReader};

use super::assembler::{SeenSessionKeys, SessionAssembler};
use super::grouper::group_by_session;
use super::types::Session;

/// Discovers sessions under input folders
pub struct SessionLoader {
    config: LoaderConfig,
    classifier: StreamClassifier,
    expander: ArchiveExpander,
    reader: Box<dyn TableReader>,
    observer: Arc<dyn DiagnosticObserver>,
}

impl Default for SessionLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl SessionLoader {
    /// Create a loader using the CSV reader and tracing diagnostics
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            classifier: StreamClassifier::new(&config),
            expander: ArchiveExpander::new(&config),
            reader: Box::new(CsvTableReader::with_delimiter(config.delimiter_byte())),
            observer: Arc::new(TracingObserver),
            config,
        }
    }

    /// Replace the table reader
    pub fn with_reader(mut self, reader: impl TableReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Replace the diagnostic observer
    pub fn with_observer(mut self, observer: Arc<dyn DiagnosticObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load sessions from all `folders`
    ///
    /// Sessions come out in folder order, then in group discovery order within
    /// each folder. Missing folders are skipped.
    pub fn load_sessions<P: AsRef<Path>>(&self, folders: &[P]) -> Vec<Session> {
        let mut seen = SeenSessionKeys::new();
        let mut sessions = Vec::new();

        for folder in folders {
            sessions.extend(self.load_folder(folder.as_ref(), &mut seen));
        }

        tracing::info!(
            "Loaded {} sessions from {} folders",
            sessions.len(),
            folders.len()
        );
        sessions
    }

    /// Load sessions from one folder, sharing `seen` with other folders
    pub fn load_folder(&self, folder: &Path, seen: &mut SeenSessionKeys) -> Vec<Session> {
        let observer = self.observer.as_ref();

        if !folder.is_dir() {
            observer.on_diagnostic(&Diagnostic::MissingFolder {
                path: folder.to_path_buf(),
            });
            return Vec::new();
        }

        if self.config.expand_archives {
            self.expander.expand(folder, observer);
        }

        let collector =
            FileCollector::new(&self.config, &self.classifier, self.reader.as_ref(), observer);
        let roots = collector.extraction_roots(folder);
        let candidates = collector.collect(&roots);
        if candidates.is_empty() {
            tracing::debug!("No sensor logs found under {:?}", folder);
            return Vec::new();
        }

        let groups = group_by_session(&candidates);
        let assembler = SessionAssembler::new(&self.classifier, self.reader.as_ref(), observer);
        let sessions = assembler.assemble(folder, groups, seen);

        tracing::info!(
            "Found {} sessions in {} candidate files under {:?}",
            sessions.len(),
            candidates.len(),
            folder
        );
        sessions
    }
}

/// Load sessions with the default configuration
pub fn load_sessions<P: AsRef<Path>>(folders: &[P]) -> Vec<Session> {
    SessionLoader::default().load_sessions(folders)
}
