//! Archive expansion
//!
//! Every archive found under a root is unpacked into a sibling directory
//! named `<archive-filename><extraction-suffix>` (by default
//! `data.zip_unzipped`). The existence of that directory is the marker that
//! an archive has already been expanded, so repeated runs do no extra work.
//!
//! # Staging
//!
//! Contents are first unpacked into a hidden temporary directory next to the
//! output and renamed into place only when extraction succeeded. A failed
//! extraction therefore never leaves a directory behind that a later run
//! would take for a finished one.
//!
//! # Nesting
//!
//! Archives that appear inside a freshly created output directory are
//! expanded in the same run. The nesting depth of an archive is the number of
//! extraction output directories between the root and the archive; archives
//! deeper than `max_nesting_depth` are left packed.
//!
//! Staging directories left behind by an interrupted run are never walked,
//! neither here nor by the file collector.
//!
//! Concurrent runs against the same tree are not coordinated: both may unpack
//! the same archive, and the loser of the final rename discards its copy.

pub mod extract;

pub use extract::{extract_archive, ArchiveFormat};

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::LoaderConfig;
use crate::diagnostics::{Diagnostic, DiagnosticObserver};
use crate::error::{Result, SessionError};

/// Counters for one expansion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionStats {
    /// Archives unpacked by this run
    pub extracted: usize,
    /// Archives whose output directory already existed
    pub already_extracted: usize,
    /// Archives that could not be unpacked
    pub failed: usize,
    /// Archives nested deeper than the configured limit
    pub too_deep: usize,
}

impl ExpansionStats {
    /// Total number of archives seen
    pub fn total(&self) -> usize {
        self.extracted + self.already_extracted + self.failed + self.too_deep
    }
}

/// Suffix of the hidden directories extraction is staged in
pub const STAGING_SUFFIX: &str = ".partial";

/// Whether `name` is a staging directory name (`.<output>.XXXXXX.partial`)
pub fn is_staging_dir_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(STAGING_SUFFIX)
}

/// Walk filter that prunes staging directories
pub(crate) fn is_not_staging(entry: &DirEntry) -> bool {
    !(entry.file_type().is_dir() && is_staging_dir_name(&entry.file_name().to_string_lossy()))
}

/// Outcome of a single staged extraction
enum StagedOutcome {
    Extracted,
    /// Another process finished the same output first
    LostRace,
}

/// Recursively unpacks archives into sibling output directories
#[derive(Debug, Clone)]
pub struct ArchiveExpander {
    config: LoaderConfig,
}

impl Default for ArchiveExpander {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

impl ArchiveExpander {
    /// Create an expander from the loader settings
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Output directory used for `archive`
    pub fn output_dir_for(&self, archive: &Path) -> PathBuf {
        let mut name = archive
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.config.extraction_suffix);
        archive.with_file_name(name)
    }

    /// Expand every archive under `root`
    ///
    /// Failures are reported to `observer` and never stop the run. A missing
    /// root yields empty stats.
    pub fn expand(&self, root: &Path, observer: &dyn DiagnosticObserver) -> ExpansionStats {
        let mut stats = ExpansionStats::default();
        if root.is_dir() {
            self.expand_under(root, root, observer, &mut stats);
        }
        tracing::debug!(
            "Expanded {} archives under {:?}: {} extracted, {} cached, {} failed",
            stats.total(),
            root,
            stats.extracted,
            stats.already_extracted,
            stats.failed
        );
        stats
    }

    fn expand_under(
        &self,
        root: &Path,
        dir: &Path,
        observer: &dyn DiagnosticObserver,
        stats: &mut ExpansionStats,
    ) {
        // Collect first: extraction adds directories to the tree being walked
        let archives = self.find_archives(dir, observer);

        for archive in archives {
            let output = self.output_dir_for(&archive);
            if output.is_dir() {
                stats.already_extracted += 1;
                observer.on_diagnostic(&Diagnostic::ArchiveAlreadyExtracted { archive, output });
                continue;
            }

            let depth = self.nesting_depth(root, &archive);
            if depth > self.config.max_nesting_depth {
                stats.too_deep += 1;
                observer.on_diagnostic(&Diagnostic::ArchiveTooDeep { archive, depth });
                continue;
            }

            match self.extract_staged(&archive, &output) {
                Ok(StagedOutcome::Extracted) => {
                    tracing::info!("Extracted {:?} to {:?}", archive, output);
                    stats.extracted += 1;
                    self.expand_under(root, &output, observer, stats);
                }
                Ok(StagedOutcome::LostRace) => {
                    stats.already_extracted += 1;
                    observer.on_diagnostic(&Diagnostic::ArchiveAlreadyExtracted { archive, output });
                }
                Err(e) => {
                    stats.failed += 1;
                    observer.on_diagnostic(&Diagnostic::ArchiveFailed {
                        archive,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// All archive files under `dir`, in walk order
    pub fn find_archives(&self, dir: &Path, observer: &dyn DiagnosticObserver) -> Vec<PathBuf> {
        let mut archives = Vec::new();

        let walker = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_not_staging);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    observer.on_diagnostic(&Diagnostic::WalkFailed {
                        path: e.path().map(Path::to_path_buf),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            // `path().is_file()` follows symlinks to archives
            if self
                .config
                .is_archive_name(&entry.file_name().to_string_lossy())
                && entry.path().is_file()
            {
                archives.push(entry.into_path());
            }
        }

        archives
    }

    /// Number of extraction output directories between `root` and `archive`
    fn nesting_depth(&self, root: &Path, archive: &Path) -> usize {
        let relative = archive.strip_prefix(root).unwrap_or(archive);
        relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter(|c| {
                        self.config
                            .is_extraction_dir_name(&c.as_os_str().to_string_lossy())
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    fn extract_staged(&self, archive: &Path, output: &Path) -> Result<StagedOutcome> {
        let parent = output
            .parent()
            .ok_or_else(|| SessionError::archive(archive, "archive has no parent directory"))?;
        let stem = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Removed on drop, including after a successful rename
        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}.", stem))
            .suffix(STAGING_SUFFIX)
            .tempdir_in(parent)?;

        extract_archive(archive, staging.path())?;

        match std::fs::rename(staging.path(), output) {
            Ok(()) => Ok(StagedOutcome::Extracted),
            Err(_) if output.is_dir() => Ok(StagedOutcome::LostRace),
            Err(e) => Err(e.into()),
        }
    }
}
