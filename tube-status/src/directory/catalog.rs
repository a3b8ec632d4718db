//! The reference catalog of London lines.

use crate::domain::LineCode;

use super::{DirectoryError, LineDirectory};

/// London lines as `(code, display name)`, in display order.
pub const LONDON_LINES: [(&str, &str); 13] = [
    ("BL", "Bakerloo"),
    ("CE", "Central"),
    ("CI", "Circle"),
    ("DI", "District"),
    ("DL", "DLR"),
    ("HC", "H'smith & City"),
    ("JL", "Jubilee"),
    ("ME", "Metropolitan"),
    ("NO", "Northern"),
    ("OV", "Overground"),
    ("PI", "Picadilly"),
    ("VI", "Victoria"),
    ("WC", "Waterloo & City"),
];

/// Build the London line directory.
pub fn london() -> Result<LineDirectory, DirectoryError> {
    from_table(&LONDON_LINES)
}

/// Build a directory from a `(code, name)` table in display order.
pub fn from_table(table: &[(&str, &str)]) -> Result<LineDirectory, DirectoryError> {
    let entries = table
        .iter()
        .map(|&(code, name)| Ok((LineCode::parse(code)?, name)))
        .collect::<Result<Vec<_>, DirectoryError>>()?;
    LineDirectory::new(entries)
}
