//! Session data types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::table::Table;
use crate::types::{Absence, StreamData, StreamKind};

/// One recording session: the sensor-log files of a single capture run
///
/// Sessions are built in one step by [`Session::assemble`] and cannot be
/// changed afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    folder: PathBuf,
    session_key: String,
    files: Vec<PathBuf>,
    pos: StreamData,
    accel: StreamData,
    orient: StreamData,
    angvel: StreamData,
    magfield: StreamData,
}

impl Session {
    /// Build a session, resolving every stream kind through `resolve`
    ///
    /// `resolve` is called once per kind in [`StreamKind::ALL`] order.
    pub fn assemble<F>(
        folder: impl Into<PathBuf>,
        session_key: impl Into<String>,
        files: Vec<PathBuf>,
        mut resolve: F,
    ) -> Self
    where
        F: FnMut(StreamKind, &[PathBuf]) -> StreamData,
    {
        let pos = resolve(StreamKind::Pos, &files);
        let accel = resolve(StreamKind::Accel, &files);
        let orient = resolve(StreamKind::Orient, &files);
        let angvel = resolve(StreamKind::AngVel, &files);
        let magfield = resolve(StreamKind::MagField, &files);

        Self {
            folder: folder.into(),
            session_key: session_key.into(),
            files,
            pos,
            accel,
            orient,
            angvel,
            magfield,
        }
    }

    /// Input folder the session was found under
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// `"<folder> | <group key>"`
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// All candidate files grouped under this session, in discovery order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn pos(&self) -> &StreamData {
        &self.pos
    }

    pub fn accel(&self) -> &StreamData {
        &self.accel
    }

    pub fn orient(&self) -> &StreamData {
        &self.orient
    }

    pub fn angvel(&self) -> &StreamData {
        &self.angvel
    }

    pub fn magfield(&self) -> &StreamData {
        &self.magfield
    }

    /// Stream slot for `kind`
    pub fn stream(&self, kind: StreamKind) -> &StreamData {
        match kind {
            StreamKind::Pos => &self.pos,
            StreamKind::Accel => &self.accel,
            StreamKind::Orient => &self.orient,
            StreamKind::AngVel => &self.angvel,
            StreamKind::MagField => &self.magfield,
        }
    }

    /// Loaded table for `kind`, if any
    pub fn table(&self, kind: StreamKind) -> Option<&Table> {
        self.stream(kind).table()
    }

    /// Kinds with a loaded table
    pub fn loaded_kinds(&self) -> Vec<StreamKind> {
        StreamKind::ALL
            .into_iter()
            .filter(|k| self.stream(*k).is_loaded())
            .collect()
    }

    /// Whether all five streams are loaded
    pub fn is_complete(&self) -> bool {
        StreamKind::ALL.iter().all(|k| self.stream(*k).is_loaded())
    }

    /// Serializable overview of the session
    pub fn summary(&self) -> SessionSummary {
        let streams = StreamKind::ALL
            .into_iter()
            .map(|kind| (kind, StreamSummary::from(self.stream(kind))))
            .collect();

        SessionSummary {
            folder: self.folder.clone(),
            session_key: self.session_key.clone(),
            files: self.files.clone(),
            streams,
        }
    }
}

/// Status of one stream in a [`SessionSummary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub absence: Option<Absence>,
}

impl From<&StreamData> for StreamSummary {
    fn from(data: &StreamData) -> Self {
        match data {
            StreamData::Loaded(table) => Self {
                loaded: true,
                source: Some(table.source().to_path_buf()),
                rows: Some(table.row_count()),
                absence: None,
            },
            StreamData::Absent(absence) => Self {
                loaded: false,
                source: None,
                rows: None,
                absence: Some(absence.clone()),
            },
        }
    }
}

/// Serializable overview of a [`Session`], without table contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub folder: PathBuf,
    pub session_key: String,
    pub files: Vec<PathBuf>,
    pub streams: BTreeMap<StreamKind, StreamSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_table() -> Table {
        Table::new(
            "/logs/sensorlog_pos_a_1.csv",
            vec!["lat".into(), "lon".into(), "time".into()],
            vec![vec!["1".into(), "2".into(), "3".into()]],
        )
    }

    fn pos_only_session() -> Session {
        Session::assemble(
            "/logs",
            "/logs | a_1",
            vec![PathBuf::from("/logs/sensorlog_pos_a_1.csv")],
            |kind, _| match kind {
                StreamKind::Pos => StreamData::Loaded(pos_table()),
                _ => StreamData::Absent(Absence::NoMatch),
            },
        )
    }

    #[test]
    fn test_assemble_resolves_every_kind_once() {
        let mut asked = Vec::new();
        let session = Session::assemble("/logs", "/logs | k", Vec::new(), |kind, files| {
            assert!(files.is_empty());
            asked.push(kind);
            StreamData::Absent(Absence::NoMatch)
        });

        assert_eq!(asked, StreamKind::ALL.to_vec());
        assert!(session.loaded_kinds().is_empty());
    }

    #[test]
    fn test_stream_accessors() {
        let session = pos_only_session();
        assert!(session.pos().is_loaded());
        assert!(!session.accel().is_loaded());
        assert!(!session.orient().is_loaded());
        assert!(!session.angvel().is_loaded());
        assert!(!session.magfield().is_loaded());
        assert_eq!(session.loaded_kinds(), vec![StreamKind::Pos]);
        assert!(!session.is_complete());
        assert_eq!(session.table(StreamKind::Pos).unwrap().row_count(), 1);
    }

    #[test]
    fn test_summary_json() {
        let summary = pos_only_session().summary();
        assert_eq!(summary.streams.len(), 5);
        assert!(summary.streams[&StreamKind::Pos].loaded);
        assert_eq!(summary.streams[&StreamKind::Pos].rows, Some(1));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["session_key"], "/logs | a_1");
        assert_eq!(json["streams"]["pos"]["loaded"], true);
        assert_eq!(json["streams"]["accel"]["absence"]["reason"], "no_match");
    }
}
