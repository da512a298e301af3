//! Core data types for sensorlog-sessions
//!
//! # Main Types
//!
//! - [`StreamKind`] - The five tracked sensor streams (pos, accel, orient, angvel, magfield)
//! - [`StreamData`] - A stream slot of a session: loaded table or an explicit absence
//! - [`Absence`] - Why a stream slot is empty
//!
//! Stream slots are a sum type rather than an `Option` so that consumers have
//! to decide what an unreadable stream means for them, separately from a
//! stream that simply was never recorded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::table::Table;

/// A tracked sensor data stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Positional / GPS fixes
    Pos,
    /// Accelerometer
    Accel,
    /// Orientation
    Orient,
    /// Angular velocity (gyroscope)
    AngVel,
    /// Magnetic field
    MagField,
}

impl StreamKind {
    /// All kinds, in the order session fields are resolved
    pub const ALL: [StreamKind; 5] = [
        StreamKind::Pos,
        StreamKind::Accel,
        StreamKind::Orient,
        StreamKind::AngVel,
        StreamKind::MagField,
    ];

    /// The lowercase token used in filenames (`sensorlog_<token>_...`)
    pub fn token(&self) -> &'static str {
        match self {
            StreamKind::Pos => "pos",
            StreamKind::Accel => "accel",
            StreamKind::Orient => "orient",
            StreamKind::AngVel => "angvel",
            StreamKind::MagField => "magfield",
        }
    }

    /// Display name for the kind
    pub fn display_name(&self) -> &'static str {
        match self {
            StreamKind::Pos => "Position",
            StreamKind::Accel => "Accelerometer",
            StreamKind::Orient => "Orientation",
            StreamKind::AngVel => "Angular velocity",
            StreamKind::MagField => "Magnetic field",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for StreamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        StreamKind::ALL
            .into_iter()
            .find(|k| k.token() == lower)
            .ok_or_else(|| format!("unknown stream kind '{}'", s))
    }
}

/// Why a stream slot has no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Absence {
    /// No file in the session matched the stream
    NoMatch,
    /// The first matching file could not be read
    ReadFailed { path: PathBuf, message: String },
}

/// Content of one stream slot of a [`Session`](crate::session::Session)
#[derive(Debug, Clone)]
pub enum StreamData {
    /// Parsed table for the stream
    Loaded(Table),
    /// No usable table
    Absent(Absence),
}

impl StreamData {
    /// Check if a table was loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, StreamData::Loaded(_))
    }

    /// Get the loaded table, if any
    pub fn table(&self) -> Option<&Table> {
        match self {
            StreamData::Loaded(table) => Some(table),
            StreamData::Absent(_) => None,
        }
    }

    /// Get the absence reason, if the slot is empty
    pub fn absence(&self) -> Option<&Absence> {
        match self {
            StreamData::Loaded(_) => None,
            StreamData::Absent(reason) => Some(reason),
        }
    }
}
