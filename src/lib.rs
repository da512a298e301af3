//! # sensorlog-sessions: Sensor-log session discovery
//!
//! Finds sensor-log CSV files (position, accelerometer, orientation, angular
//! velocity, magnetic field) anywhere under a set of folders, including inside
//! archives, and bundles the files of each capture run into a [`Session`].
//!
//! ## Architecture
//!
//! - **Archive**: Unpacks zip/tar archives into sibling `<name>_unzipped` directories
//! - **Classify**: Ordered name and header-row rules decide what a file is
//! - **Collect**: Walks folders and extraction outputs for candidate files
//! - **Session**: Groups candidates by filename key and assembles sessions
//! - **Diagnostics**: Recovered failures are reported to an observer instead of aborting
//!
//! ## Example
//!
//! ```ignore
//! use sensorlog_sessions::{load_sessions, StreamKind};
//!
//! for session in load_sessions(&["recordings/2024-01"]) {
//!     println!("{}: {:?}", session.session_key(), session.loaded_kinds());
//!     if let Some(pos) = session.table(StreamKind::Pos) {
//!         println!("  {} position fixes", pos.row_count());
//!     }
//! }
//! ```

pub mod archive;
pub mod classify;
pub mod collect;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod session;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use archive::{ArchiveExpander, ExpansionStats};
pub use classify::StreamClassifier;
pub use collect::FileCollector;
pub use config::LoaderConfig;
pub use diagnostics::{CollectingObserver, Diagnostic, DiagnosticObserver, TracingObserver};
pub use error::{Result, SessionError};
pub use session::{load_sessions, Session, SessionLoader, SessionSummary};
pub use table::{CsvTableReader, Table, TableReader};
pub use types::{Absence, StreamData, StreamKind};
