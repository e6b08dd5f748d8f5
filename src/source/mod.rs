// src/source/mod.rs
// =============================================================================
// This module supplies the raw input lines.
//
// The manager only sees the LineSource trait, so tests can feed it lines from
// memory while the binary reads them from the --source file.
// =============================================================================

mod lines;

pub use lines::{open_source, LineSource};

#[cfg(test)]
pub use lines::FileLines;
