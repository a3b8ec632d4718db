//! Line status bitmasks and their human-readable decoding.
//!
//! The feed reports each line's status as a small bitmask. Bit 0 means
//! good service; bits 1-8 are independent conditions that may be active at
//! the same time. Zero means the status has not been received yet.

use serde::Serialize;

/// Mask covering the condition bits (1-8).
pub const CONDITION_MASK: u32 = 0x1FE;

/// Bit reported for a line running a good service.
pub const GOOD_SERVICE: u32 = 1;

/// Condition bits paired with their labels, in display order.
const CONDITIONS: [(u32, &str); 8] = [
    (1 << 1, "Minor Delays"),
    (1 << 2, "Bus Service"),
    (1 << 3, "Reduced Service"),
    (1 << 4, "Severe Delays"),
    (1 << 5, "Part Closure"),
    (1 << 6, "Planned Closure"),
    (1 << 7, "Part Suspended"),
    (1 << 8, "Suspended"),
];

/// How bad a decoded status is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Not yet known, or a value the decoder does not recognise.
    Unknown,
    /// Good service.
    Good,
    /// At least one condition is active.
    Problem,
}

/// Icon shown next to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconClass {
    Ok,
    Problem,
    Unknown,
}

impl Severity {
    /// The icon used to render this severity.
    pub fn icon(self) -> IconClass {
        match self {
            Severity::Unknown => IconClass::Unknown,
            Severity::Good => IconClass::Ok,
            Severity::Problem => IconClass::Problem,
        }
    }
}

/// A status bitmask decoded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedStatus {
    /// One label per active condition in ascending bit order, or a single
    /// summary label when no condition is active.
    pub labels: Vec<&'static str>,
    /// Number of text lines the labels occupy (at least one).
    pub line_count: usize,
    pub severity: Severity,
    pub icon: IconClass,
}

impl DecodedStatus {
    /// Labels joined for rendering, one per line.
    pub fn text(&self) -> String {
        self.labels.join("\n")
    }
}

/// Decode a status bitmask into labels, line count and severity.
///
/// Condition bits override bit 0: a value with both good service and a
/// condition set is reported as a problem and bit 0 gets no label.
///
/// # Examples
///
/// ```
/// use tube_status::domain::{decode, Severity};
///
/// let decoded = decode(2 | 16);
/// assert_eq!(decoded.labels, vec!["Minor Delays", "Severe Delays"]);
/// assert_eq!(decoded.line_count, 2);
/// assert_eq!(decoded.severity, Severity::Problem);
/// ```
pub fn decode(status: u32) -> DecodedStatus {
    let labels: Vec<&'static str> = CONDITIONS
        .iter()
        .filter(|(bit, _)| status & bit != 0)
        .map(|&(_, label)| label)
        .collect();

    let (labels, severity) = if labels.is_empty() {
        match status {
            0 => (vec!["Getting Status"], Severity::Unknown),
            GOOD_SERVICE => (vec!["Good Service"], Severity::Good),
            _ => (vec!["Unknown Status"], Severity::Unknown),
        }
    } else {
        (labels, Severity::Problem)
    };

    DecodedStatus {
        line_count: labels.len(),
        labels,
        severity,
        icon: severity.icon(),
    }
}
