// src/output/mod.rs
// Result sink: where finished checks and rejected lines are written.

mod printer;

pub use printer::{ResultSink, TextPrinter};
