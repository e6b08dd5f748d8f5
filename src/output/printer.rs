// src/output/printer.rs
// =============================================================================
// Line-oriented text output, one line per call:
//
//   GET: <url>\tSTATUS: <text>\tCODE: <code>\tSIZE: <bytes>\tDURATION: <elapsed>
//   INVALID URL: <line>
//
// Several workers print at the same time, so the writer sits behind a Mutex
// and each line is formatted first, then written with a single write_all.
// =============================================================================

use std::io::{self, Write};
use std::sync::Mutex;

use crate::checker::CheckResult;

/// Destination for results; shared by every worker
pub trait ResultSink: Send + Sync {
    fn emit_result(&self, url: &str, result: &CheckResult) -> io::Result<()>;
    fn emit_validation_error(&self, url: &str) -> io::Result<()>;
}

pub struct TextPrinter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TextPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: String) -> io::Result<()> {
        // A panic in another worker must not silence the output
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(line.as_bytes())?;
        out.flush()
    }
}

// Formats a result line, without the trailing newline
fn format_result(url: &str, result: &CheckResult) -> String {
    format!(
        "GET: {}\tSTATUS: {}\tCODE: {}\tSIZE: {}\tDURATION: {:?}",
        url, result.status_text, result.status_code, result.content_length, result.elapsed
    )
}

impl<W: Write + Send> ResultSink for TextPrinter<W> {
    fn emit_result(&self, url: &str, result: &CheckResult) -> io::Result<()> {
        self.write_line(format!("{}\n", format_result(url, result)))
    }

    fn emit_validation_error(&self, url: &str) -> io::Result<()> {
        self.write_line(format!("INVALID URL: {}\n", url))
    }
}
