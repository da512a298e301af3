//! Session assembly
//!
//! Turns session groups into [`Session`]s. Within a group every stream kind is
//! resolved on its own: the first file whose name (or, for position, header
//! row) matches the kind is read, and nothing else is tried if that read
//! fails.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::classify::{FileProbe, StreamClassifier};
use crate::diagnostics::{Diagnostic, DiagnosticObserver};
use crate::table::TableReader;
use crate::types::{Absence, StreamData, StreamKind};

use super::grouper::SessionGroup;
use super::types::Session;

/// Session keys already emitted during one top-level load
#[derive(Debug, Default, Clone)]
pub struct SeenSessionKeys {
    keys: HashSet<String>,
}

impl SeenSessionKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key; returns false if it was already present
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Build the composite session key `"<folder> | <group key>"`
pub fn session_key(folder: &Path, group_key: &str) -> String {
    format!("{} | {}", folder.display(), group_key)
}

/// Builds sessions from groups of candidate files
pub struct SessionAssembler<'a> {
    classifier: &'a StreamClassifier,
    reader: &'a dyn TableReader,
    observer: &'a dyn DiagnosticObserver,
}

impl<'a> SessionAssembler<'a> {
    pub fn new(
        classifier: &'a StreamClassifier,
        reader: &'a dyn TableReader,
        observer: &'a dyn DiagnosticObserver,
    ) -> Self {
        Self {
            classifier,
            reader,
            observer,
        }
    }

    /// Assemble one session per group, skipping keys already in `seen`
    pub fn assemble(
        &self,
        folder: &Path,
        groups: Vec<SessionGroup>,
        seen: &mut SeenSessionKeys,
    ) -> Vec<Session> {
        let mut sessions = Vec::with_capacity(groups.len());

        for group in groups {
            let key = session_key(folder, &group.key);
            if !seen.insert(key.clone()) {
                self.observer
                    .on_diagnostic(&Diagnostic::DuplicateSession { session_key: key });
                continue;
            }

            sessions.push(self.assemble_group(folder, key, group.files));
        }

        sessions
    }

    /// Assemble a single session without consulting the seen set
    pub fn assemble_group(&self, folder: &Path, key: String, files: Vec<PathBuf>) -> Session {
        let session = Session::assemble(folder, key.as_str(), files, |kind, files| {
            self.resolve_stream(&key, files, kind)
        });
        tracing::debug!(
            "Assembled session '{}' ({} files, streams: {:?})",
            session.session_key(),
            session.files().len(),
            session.loaded_kinds()
        );
        session
    }

    /// Content of the first file in `files` matching `kind`
    pub fn resolve_stream(&self, key: &str, files: &[PathBuf], kind: StreamKind) -> StreamData {
        let matched = files.iter().find(|path| {
            let probe = FileProbe::new(path, self.reader, self.observer);
            self.classifier.matches_kind(&probe, kind)
        });

        let Some(path) = matched else {
            return StreamData::Absent(Absence::NoMatch);
        };

        match self.reader.read_table(path) {
            Ok(table) => StreamData::Loaded(table),
            Err(e) => {
                let message = e.to_string();
                self.observer.on_diagnostic(&Diagnostic::StreamUnreadable {
                    session_key: key.to_string(),
                    kind,
                    path: path.clone(),
                    message: message.clone(),
                });
                StreamData::Absent(Absence::ReadFailed {
                    path: path.clone(),
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingObserver, NullObserver};
    use crate::error::{Result, SessionError};
    use crate::table::Table;

    /// Reader failing for every path listed in `broken`
    struct StubReader {
        broken: Vec<PathBuf>,
    }

    impl TableReader for StubReader {
        fn read_headers(&self, path: &Path) -> Result<Vec<String>> {
            Err(SessionError::table(path, "no content sniffing in this test"))
        }

        fn read_table(&self, path: &Path) -> Result<Table> {
            if self.broken.iter().any(|b| b == path) {
                return Err(SessionError::table(path, "corrupt"));
            }
            Ok(Table::new(path, vec!["t".into()], vec![vec!["0".into()]]))
        }
    }

    fn group(key: &str, files: &[&str]) -> SessionGroup {
        SessionGroup {
            key: key.to_string(),
            files: files.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_session_key_format() {
        assert_eq!(session_key(Path::new("/data/run"), "a_1"), "/data/run | a_1");
    }

    #[test]
    fn test_pos_only_group() {
        let classifier = StreamClassifier::default();
        let reader = StubReader { broken: vec![] };
        let assembler = SessionAssembler::new(&classifier, &reader, &NullObserver);

        let sessions = assembler.assemble(
            Path::new("/data"),
            vec![group("a_1", &["/data/sensorlog_pos_a_1.csv"])],
            &mut SeenSessionKeys::new(),
        );

        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.session_key(), "/data | a_1");
        assert!(session.pos().is_loaded());
        for kind in [
            StreamKind::Accel,
            StreamKind::Orient,
            StreamKind::AngVel,
            StreamKind::MagField,
        ] {
            assert_eq!(session.stream(kind).absence(), Some(&Absence::NoMatch));
        }
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = StreamClassifier::default();
        let reader = StubReader { broken: vec![] };
        let assembler = SessionAssembler::new(&classifier, &reader, &NullObserver);

        let session = assembler.assemble_group(
            Path::new("/d"),
            "/d | a_1".to_string(),
            vec![
                PathBuf::from("/d/x/sensorlog_accel_a_1.csv"),
                PathBuf::from("/d/sensorlog_accel_a_1.csv"),
            ],
        );

        assert_eq!(
            session.accel().table().unwrap().source(),
            Path::new("/d/x/sensorlog_accel_a_1.csv")
        );
    }

    #[test]
    fn test_read_failure_does_not_fall_back() {
        let classifier = StreamClassifier::default();
        let broken = PathBuf::from("/d/a/sensorlog_accel_a_1.csv");
        let reader = StubReader {
            broken: vec![broken.clone()],
        };
        let observer = CollectingObserver::new();
        let assembler = SessionAssembler::new(&classifier, &reader, &observer);

        let session = assembler.assemble_group(
            Path::new("/d"),
            "/d | a_1".to_string(),
            vec![broken.clone(), PathBuf::from("/d/b/sensorlog_accel_a_1.csv")],
        );

        assert!(matches!(
            session.accel().absence(),
            Some(Absence::ReadFailed { path, .. }) if *path == broken
        ));
        assert!(observer
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::StreamUnreadable { kind: StreamKind::Accel, .. })));
    }

    #[test]
    fn test_duplicate_keys_are_dropped() {
        let classifier = StreamClassifier::default();
        let reader = StubReader { broken: vec![] };
        let observer = CollectingObserver::new();
        let assembler = SessionAssembler::new(&classifier, &reader, &observer);
        let mut seen = SeenSessionKeys::new();

        let sessions = assembler.assemble(
            Path::new("/d"),
            vec![
                group("a_1", &["/d/sensorlog_pos_a_1.csv"]),
                group("a_1", &["/d/sensorlog_accel_a_1.csv"]),
            ],
            &mut seen,
        );

        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].pos().is_loaded());
        assert!(!sessions[0].accel().is_loaded());
        assert_eq!(seen.len(), 1);
        assert_eq!(
            observer.diagnostics(),
            vec![Diagnostic::DuplicateSession {
                session_key: "/d | a_1".to_string()
            }]
        );
    }

    #[test]
    fn test_seen_keys_span_calls() {
        let classifier = StreamClassifier::default();
        let reader = StubReader { broken: vec![] };
        let assembler = SessionAssembler::new(&classifier, &reader, &NullObserver);
        let mut seen = SeenSessionKeys::new();
        seen.insert("/d | a_1");

        let sessions = assembler.assemble(
            Path::new("/d"),
            vec![group("a_1", &["/d/sensorlog_pos_a_1.csv"])],
            &mut seen,
        );
        assert!(sessions.is_empty());
    }
}
