//! Candidate file collection
//!
//! Walks a set of roots and keeps every tabular file the classifier accepts
//! as a sensor-log candidate. The result is deduplicated and sorted by path
//! string so that grouping does not depend on filesystem traversal order.
//! Every file is classified at most once, however many roots cover it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::archive::is_not_staging;
use crate::classify::{FileProbe, StreamClassifier};
use crate::config::LoaderConfig;
use crate::diagnostics::{Diagnostic, DiagnosticObserver};
use crate::table::TableReader;

/// Walks roots and gathers sensor-log candidates
pub struct FileCollector<'a> {
    config: &'a LoaderConfig,
    classifier: &'a StreamClassifier,
    reader: &'a dyn TableReader,
    observer: &'a dyn DiagnosticObserver,
}

impl<'a> FileCollector<'a> {
    pub fn new(
        config: &'a LoaderConfig,
        classifier: &'a StreamClassifier,
        reader: &'a dyn TableReader,
        observer: &'a dyn DiagnosticObserver,
    ) -> Self {
        Self {
            config,
            classifier,
            reader,
            observer,
        }
    }

    /// `folder` followed by every extraction output directory below it
    pub fn extraction_roots(&self, folder: &Path) -> Vec<PathBuf> {
        let mut roots = vec![folder.to_path_buf()];

        let walker = WalkDir::new(folder)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_not_staging);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.report_walk_error(&e);
                    continue;
                }
            };
            if entry.file_type().is_dir()
                && self
                    .config
                    .is_extraction_dir_name(&entry.file_name().to_string_lossy())
            {
                roots.push(entry.into_path());
            }
        }

        roots
    }

    /// Candidate files under all `roots`, deduplicated and sorted
    ///
    /// Roots that do not exist are skipped.
    pub fn collect(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for root in roots {
            if !root.is_dir() {
                continue;
            }

            for entry in WalkDir::new(root).into_iter().filter_entry(is_not_staging) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        self.report_walk_error(&e);
                        continue;
                    }
                };
                // `path().is_file()` follows symlinks to files
                if !self
                    .config
                    .is_tabular_name(&entry.file_name().to_string_lossy())
                    || !entry.path().is_file()
                {
                    continue;
                }

                let path = entry.into_path();
                if !seen.insert(path.clone()) {
                    continue;
                }

                let is_candidate = {
                    let probe = FileProbe::new(&path, self.reader, self.observer);
                    self.classifier.is_candidate(&probe)
                };
                if is_candidate {
                    candidates.push(path);
                }
            }
        }

        candidates.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
        tracing::debug!("Collected {} candidate files", candidates.len());
        candidates
    }

    fn report_walk_error(&self, error: &walkdir::Error) {
        self.observer.on_diagnostic(&Diagnostic::WalkFailed {
            path: error.path().map(Path::to_path_buf),
            message: error.to_string(),
        });
    }
}
