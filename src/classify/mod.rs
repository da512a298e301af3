//! Sensor-log classification
//!
//! Two questions are answered for a tabular file:
//!
//! 1. Is it a sensor-log candidate at all? ([`StreamClassifier::is_candidate`])
//! 2. Does it carry a given stream kind? ([`StreamClassifier::matches_kind`])
//!
//! Both are answered by walking an ordered list of [`rules`]. Name rules come
//! first so the common case never opens the file; the header row is read only
//! when a content rule is reached, and at most once per [`FileProbe`].

pub mod rules;

pub use rules::{is_gps_header, CandidateRule, KindRule};

use std::cell::OnceCell;
use std::path::Path;

use crate::config::LoaderConfig;
use crate::diagnostics::{Diagnostic, DiagnosticObserver};
use crate::table::TableReader;
use crate::types::StreamKind;

/// A file under classification, with a lazily read header row
pub struct FileProbe<'a> {
    path: &'a Path,
    file_name: String,
    reader: &'a dyn TableReader,
    observer: &'a dyn DiagnosticObserver,
    headers: OnceCell<Option<Vec<String>>>,
}

impl<'a> FileProbe<'a> {
    pub fn new(
        path: &'a Path,
        reader: &'a dyn TableReader,
        observer: &'a dyn DiagnosticObserver,
    ) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            reader,
            observer,
            headers: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    /// Lowercased file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Header row, read on first use. Read failures yield `None`.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers
            .get_or_init(|| match self.reader.read_headers(self.path) {
                Ok(headers) => Some(headers),
                Err(e) => {
                    self.observer.on_diagnostic(&Diagnostic::HeaderUnreadable {
                        path: self.path.to_path_buf(),
                        message: e.to_string(),
                    });
                    None
                }
            })
            .as_deref()
    }

    /// Whether the header row has been read (or attempted)
    pub fn headers_loaded(&self) -> bool {
        self.headers.get().is_some()
    }
}

/// Ordered rule sets for candidacy and stream-kind matching
#[derive(Debug, Clone)]
pub struct StreamClassifier {
    candidate_rules: Vec<CandidateRule>,
    kind_rules: Vec<KindRule>,
}

impl Default for StreamClassifier {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

impl StreamClassifier {
    /// Build the rule lists from the configured log-name markers
    pub fn new(config: &LoaderConfig) -> Self {
        let markers: Vec<String> = config
            .log_name_markers
            .iter()
            .map(|m| m.to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();

        let mut candidate_rules: Vec<CandidateRule> = markers
            .iter()
            .cloned()
            .map(CandidateRule::NameMarker)
            .collect();
        candidate_rules.push(CandidateRule::GpsHeader);

        let mut kind_rules = vec![KindRule::Infix];
        kind_rules.extend(markers.into_iter().map(KindRule::MarkerPrefixed));
        kind_rules.push(KindRule::GpsHeaderFallback);

        Self {
            candidate_rules,
            kind_rules,
        }
    }

    pub fn candidate_rules(&self) -> &[CandidateRule] {
        &self.candidate_rules
    }

    pub fn kind_rules(&self) -> &[KindRule] {
        &self.kind_rules
    }

    /// First candidacy rule that accepts the file
    pub fn candidate_match(&self, probe: &FileProbe<'_>) -> Option<&CandidateRule> {
        self.candidate_rules.iter().find(|rule| {
            let headers = if rule.needs_headers() {
                probe.headers()
            } else {
                None
            };
            rule.matches(probe.file_name(), headers)
        })
    }

    /// Whether the file is a sensor-log candidate
    pub fn is_candidate(&self, probe: &FileProbe<'_>) -> bool {
        match self.candidate_match(probe) {
            Some(rule) => {
                tracing::trace!("{:?} is a candidate ({})", probe.path(), rule.name());
                true
            }
            None => false,
        }
    }

    /// First kind rule that assigns the file to `kind`
    pub fn kind_match(&self, probe: &FileProbe<'_>, kind: StreamKind) -> Option<&KindRule> {
        self.kind_rules
            .iter()
            .filter(|rule| rule.applies_to(kind))
            .find(|rule| {
                let headers = if rule.needs_headers() {
                    probe.headers()
                } else {
                    None
                };
                rule.matches(kind, probe.file_name(), headers)
            })
    }

    /// Whether the file carries the `kind` stream
    pub fn matches_kind(&self, probe: &FileProbe<'_>, kind: StreamKind) -> bool {
        self.kind_match(probe, kind).is_some()
    }
}
