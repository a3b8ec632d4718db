//! The fixed catalog of known lines and their current statuses.
//!
//! A [`LineDirectory`] is built once and never gains or loses entries.
//! Lines are found by code when applying sync updates and by display
//! position when rendering. The only mutation is [`LineDirectory::apply_update`].

mod catalog;

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{DecodedStatus, InvalidLineCode, LineCode, decode};

pub use catalog::{LONDON_LINES, from_table, london};

/// Errors from building a directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The same code appears twice in a catalog.
    #[error("duplicate line code {0} in catalog")]
    DuplicateCode(LineCode),

    /// A catalog entry has a malformed code.
    #[error(transparent)]
    InvalidCode(#[from] InvalidLineCode),
}

/// An update named a code the catalog does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown line code {0}")]
pub struct UnknownLineCode(pub LineCode);

/// A tracked line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub code: LineCode,
    pub name: String,
    /// Fixed display position, assigned when the catalog is built.
    pub position: usize,
    /// Current status bitmask; 0 until the first successful sync.
    pub status: u32,
}

impl Line {
    /// Decode this line's current status for display.
    pub fn decoded(&self) -> DecodedStatus {
        decode(self.status)
    }
}

/// The catalog of lines, ordered by display position.
#[derive(Debug, Clone)]
pub struct LineDirectory {
    lines: Vec<Line>,
    by_code: HashMap<LineCode, usize>,
}

impl LineDirectory {
    /// Build a directory from `(code, name)` pairs in display order.
    ///
    /// Positions are assigned from the iteration order, starting at 0.
    pub fn new<I, S>(entries: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = (LineCode, S)>,
        S: Into<String>,
    {
        let mut lines = Vec::new();
        let mut by_code = HashMap::new();

        for (position, (code, name)) in entries.into_iter().enumerate() {
            if by_code.insert(code, position).is_some() {
                return Err(DirectoryError::DuplicateCode(code));
            }
            lines.push(Line {
                code,
                name: name.into(),
                position,
                status: 0,
            });
        }

        Ok(Self { lines, by_code })
    }

    /// Number of lines in the catalog.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the catalog has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lookup_by_code(&self, code: &LineCode) -> Option<&Line> {
        self.by_code.get(code).map(|&idx| &self.lines[idx])
    }

    pub fn lookup_by_position(&self, position: usize) -> Option<&Line> {
        self.lines.get(position)
    }

    /// All lines in display order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Overwrite the status of the line with the given code.
    ///
    /// Unknown codes leave the directory untouched.
    pub fn apply_update(&mut self, code: &LineCode, status: u32) -> Result<(), UnknownLineCode> {
        let idx = *self.by_code.get(code).ok_or(UnknownLineCode(*code))?;
        self.lines[idx].status = status;
        Ok(())
    }

    /// Every code concatenated in display order, as sent in a refresh request.
    pub fn concatenated_codes(&self) -> String {
        self.lines.iter().map(|l| l.code.as_str()).collect()
    }
}
