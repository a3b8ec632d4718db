//! Render-ready view of the line board.
//!
//! Turns an engine [`Snapshot`] into the header text, one row per line in
//! display position order, and the options section. Labels stay a list
//! until render time, when they are joined one per text line.

use chrono::{DateTime, Local, NaiveTime, Utc};
use serde::Serialize;

use crate::domain::{IconClass, LineCode, Severity};
use crate::sync::{RefreshState, Snapshot};

/// Minimum height of a line row.
const MIN_CELL_HEIGHT: u16 = 40;
/// Row height taken by the line name.
const CELL_HEADER_HEIGHT: u16 = 24;
/// Row height added per status text line.
const CELL_LINE_HEIGHT: u16 = 16;
/// Height of one line of status text.
const TEXT_LINE_HEIGHT: u16 = 18;

/// Entries of the options section.
pub const OPTIONS: [&str; 1] = ["Refresh Lines"];

/// Presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Show times as 24-hour clock rather than 12-hour with AM/PM.
    pub clock_24h: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { clock_24h: true }
    }
}

/// One line as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub position: usize,
    pub code: LineCode,
    pub name: String,
    pub status: u32,
    pub labels: Vec<&'static str>,
    pub line_count: usize,
    pub severity: Severity,
    pub icon: IconClass,
    pub cell_height: u16,
    pub text_height: u16,
}

impl Row {
    /// Status labels joined one per line.
    pub fn text(&self) -> String {
        self.labels.join("\n")
    }
}

/// The whole board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub header: String,
    pub state: RefreshState,
    pub rows: Vec<Row>,
    pub options: Vec<&'static str>,
}

impl Board {
    /// Build the board for `snapshot`, showing times in local time.
    pub fn from_snapshot(snapshot: &Snapshot, config: BoardConfig) -> Self {
        let updated_at = snapshot.last_updated.map(local_time);
        let rows = snapshot
            .lines
            .iter()
            .map(|line| {
                let decoded = line.decoded();
                Row {
                    position: line.position,
                    code: line.code,
                    name: line.name.clone(),
                    status: line.status,
                    cell_height: cell_height(decoded.line_count),
                    text_height: text_height(decoded.line_count),
                    line_count: decoded.line_count,
                    severity: decoded.severity,
                    icon: decoded.icon,
                    labels: decoded.labels,
                }
            })
            .collect();

        Self {
            header: header_text(snapshot.state, updated_at, config.clock_24h),
            state: snapshot.state,
            rows,
            options: OPTIONS.to_vec(),
        }
    }

    /// Plain-text rendering of the board.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header);
        out.push('\n');

        for row in &self.rows {
            let marker = match row.icon {
                IconClass::Ok => "[ok]",
                IconClass::Problem => "[!!]",
                IconClass::Unknown => "[??]",
            };
            out.push_str(&format!("{marker} {}\n", row.name));
            for label in &row.labels {
                out.push_str(&format!("     {label}\n"));
            }
        }

        out.push_str("\nOptions\n");
        for option in &self.options {
            out.push_str(&format!("  {option}\n"));
        }
        out
    }
}

fn local_time(at: DateTime<Utc>) -> NaiveTime {
    at.with_timezone(&Local).time()
}

/// Header text for the lines section.
pub fn header_text(state: RefreshState, updated_at: Option<NaiveTime>, clock_24h: bool) -> String {
    match (state, updated_at) {
        (RefreshState::Updating, _) => "Updating...".to_string(),
        (RefreshState::Error, _) => "Updating Failed".to_string(),
        (RefreshState::Ok, Some(time)) => {
            let format = if clock_24h { "%H:%M" } else { "%-I:%M %p" };
            format!("Last Updated: {}", time.format(format))
        }
        (RefreshState::Ok, None) => "Last Updated".to_string(),
    }
}

/// Height of a row showing `line_count` lines of status text.
pub fn cell_height(line_count: usize) -> u16 {
    let lines = u16::try_from(line_count).unwrap_or(u16::MAX);
    CELL_HEADER_HEIGHT
        .saturating_add(CELL_LINE_HEIGHT.saturating_mul(lines))
        .max(MIN_CELL_HEIGHT)
}

/// Height of the status text box for `line_count` lines.
pub fn text_height(line_count: usize) -> u16 {
    let lines = u16::try_from(line_count).unwrap_or(u16::MAX);
    TEXT_LINE_HEIGHT.saturating_mul(lines).max(TEXT_LINE_HEIGHT)
}
