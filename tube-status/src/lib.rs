//! London line status tracker.
//!
//! Keeps a fixed catalog of lines in sync with a remote status feed and
//! decodes each line's status bitmask into display text.

pub mod board;
pub mod directory;
pub mod domain;
pub mod numeral;
pub mod sync;
pub mod web;
