//! Session discovery module
//!
//! This module groups classified sensor-log files into recording sessions and
//! loads the tabular content of each session's streams.
//!
//! # Features
//!
//! - Derive a group key from each file name's trailing segments
//! - Assemble one immutable [`Session`] per group, one file per stream kind
//! - Drop groups whose session key was already produced in the same load
//! - Load everything under a list of folders in one call ([`load_sessions`])

pub mod assembler;
pub mod grouper;
pub mod loader;
pub mod types;

pub use assembler::{session_key, SeenSessionKeys, SessionAssembler};
pub use grouper::{derive_group_key, group_by_session, SessionGroup};
pub use loader::{load_sessions, SessionLoader};
pub use types::{Session, SessionSummary, StreamSummary};
