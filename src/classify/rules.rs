//! Classification rules
//!
//! Each rule is a pure predicate over a lowercased file name and, for content
//! rules, the file's header row. Rules never touch the filesystem; the caller
//! decides whether the header row is worth reading (see
//! [`needs_headers`](CandidateRule::needs_headers)).

use crate::types::StreamKind;

/// Whether a header row looks like GPS data
///
/// Requires a header containing `lat`, one containing `lon`, and one containing
/// `time` (which also covers `timestamp`). Matching is case-insensitive and
/// each header is checked on its own.
pub fn is_gps_header(headers: &[String]) -> bool {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let has_lat = lowered.iter().any(|h| h.contains("lat"));
    let has_lon = lowered.iter().any(|h| h.contains("lon"));
    let has_time = lowered
        .iter()
        .any(|h| h.contains("timestamp") || h.contains("time"));
    has_lat && has_lon && has_time
}

/// Rule deciding whether a file is a sensor log at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateRule {
    /// File name contains a log-name marker such as `sensorlog`
    NameMarker(String),
    /// Header row has latitude, longitude and time columns
    GpsHeader,
}

impl CandidateRule {
    /// Short name used in logs
    pub fn name(&self) -> String {
        match self {
            CandidateRule::NameMarker(marker) => format!("name-marker:{}", marker),
            CandidateRule::GpsHeader => "content:gps-header".to_string(),
        }
    }

    /// Whether evaluating the rule requires the header row
    pub fn needs_headers(&self) -> bool {
        matches!(self, CandidateRule::GpsHeader)
    }

    /// Evaluate the rule against a lowercased file name
    pub fn matches(&self, file_name: &str, headers: Option<&[String]>) -> bool {
        match self {
            CandidateRule::NameMarker(marker) => file_name.contains(marker.as_str()),
            CandidateRule::GpsHeader => headers.is_some_and(is_gps_header),
        }
    }
}

/// Rule deciding whether a file belongs to a given stream kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindRule {
    /// File name contains `_<kind>_`
    Infix,
    /// File name contains `<marker>_<kind>_`
    MarkerPrefixed(String),
    /// Header row looks like GPS data; position stream only
    GpsHeaderFallback,
}

impl KindRule {
    /// Short name used in logs
    pub fn name(&self) -> String {
        match self {
            KindRule::Infix => "name:_<kind>_".to_string(),
            KindRule::MarkerPrefixed(marker) => format!("name:{}_<kind>_", marker),
            KindRule::GpsHeaderFallback => "content:gps-header".to_string(),
        }
    }

    /// Whether the rule can match files of `kind`
    pub fn applies_to(&self, kind: StreamKind) -> bool {
        match self {
            KindRule::GpsHeaderFallback => kind == StreamKind::Pos,
            KindRule::Infix | KindRule::MarkerPrefixed(_) => true,
        }
    }

    /// Whether evaluating the rule requires the header row
    pub fn needs_headers(&self) -> bool {
        matches!(self, KindRule::GpsHeaderFallback)
    }

    /// Evaluate the rule for `kind` against a lowercased file name
    pub fn matches(&self, kind: StreamKind, file_name: &str, headers: Option<&[String]>) -> bool {
        if !self.applies_to(kind) {
            return false;
        }
        match self {
            KindRule::Infix => file_name.contains(&format!("_{}_", kind.token())),
            KindRule::MarkerPrefixed(marker) => {
                file_name.contains(&format!("{}_{}_", marker, kind.token()))
            }
            KindRule::GpsHeaderFallback => headers.is_some_and(is_gps_header),
        }
    }
}
