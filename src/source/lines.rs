// src/source/lines.rs
// =============================================================================
// Reads URLs from a newline-delimited file, one line per call.
//
// Rules:
// - "\n" and "\r\n" line endings are stripped
// - a line that is not valid UTF-8 is reported as an error and skipped
// - after an I/O error the stream is finished: the error is reported once
//   and every later call returns end-of-input
// =============================================================================

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::SourceError;

/// Produces one line per call; `Ok(None)` means the input is exhausted
#[async_trait]
pub trait LineSource: Send {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError>;
}

// Line reader over any buffered async reader
pub struct FileLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    finished: bool,
}

impl<R: AsyncBufRead + Unpin + Send> FileLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            finished: false,
        }
    }
}

// Opens the URL file, turning the common failures into specific errors
pub async fn open_source(path: &Path) -> Result<FileLines<BufReader<File>>, SourceError> {
    let display = path.display().to_string();

    let file = File::open(path).await.map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound { path: display.clone() },
        io::ErrorKind::PermissionDenied => SourceError::PermissionDenied { path: display.clone() },
        _ => SourceError::Open {
            path: display.clone(),
            source,
        },
    })?;

    Ok(FileLines::new(BufReader::new(file)))
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> LineSource for FileLines<R> {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        if self.finished {
            return Ok(None);
        }

        self.buf.clear();
        self.line_no += 1;

        let read = match self.reader.read_until(b'\n', &mut self.buf).await {
            Ok(read) => read,
            Err(source) => {
                self.finished = true;
                return Err(SourceError::Read {
                    line: self.line_no,
                    source,
                });
            }
        };

        if read == 0 {
            self.finished = true;
            return Ok(None);
        }

        if self.buf.ends_with(b"\n") {
            self.buf.pop();
            if self.buf.ends_with(b"\r") {
                self.buf.pop();
            }
        }

        match std::str::from_utf8(&self.buf) {
            Ok(line) => Ok(Some(line.to_string())),
            Err(_) => Err(SourceError::Decode { line: self.line_no }),
        }
    }
}
