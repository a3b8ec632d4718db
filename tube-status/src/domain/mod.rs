//! Domain types for the line status tracker.
//!
//! Line codes are validated at construction; status bitmasks are plain
//! integers decoded on demand for display.

mod line_code;
mod status;

pub use line_code::{InvalidLineCode, LineCode};
pub use status::{
    CONDITION_MASK, DecodedStatus, GOOD_SERVICE, IconClass, Severity, decode,
};
