//! Newline-delimited request loop.
//!
//! One line is read, answered and flushed before the next one is read. Decode
//! problems are answered in-band; only I/O failures end the loop early.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use super::{handle_line, PROTOCOL_TARGET};
use crate::model::response::Response;

/// Failures that end the request loop.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Reading from the request stream failed.
    #[error("failed to read request line: {0}")]
    Read(#[source] io::Error),

    /// Writing or flushing a response failed.
    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),

    /// Response serialization failed.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Answers every line from `reader` on `writer` until end of input.
///
/// Returns the number of lines answered.
///
/// # Errors
///
/// Returns a [`StreamError`] when the input cannot be read or a response
/// cannot be written.
pub fn serve<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> Result<usize, StreamError> {
    let mut line = Vec::new();
    let mut answered = 0;

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(StreamError::Read)?;
        if read == 0 {
            break;
        }

        let response = handle_line(&line);
        write_response(&mut writer, &response)?;
        answered += 1;
    }

    debug!(target: PROTOCOL_TARGET, answered, "request stream closed");
    Ok(answered)
}

/// Writes one response as a JSON line and flushes it.
///
/// # Errors
///
/// Returns a [`StreamError`] if serialization, writing or flushing fails.
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<(), StreamError> {
    serde_json::to_writer(&mut *writer, response)?;
    writer.write_all(b"\n").map_err(StreamError::Write)?;
    writer.flush().map_err(StreamError::Write)
}
