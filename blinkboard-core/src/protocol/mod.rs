//! Request decoding and command dispatch.

use tracing::{debug, info, warn};

use crate::model::request::{Request, RequestError};
use crate::model::response::Response;
use crate::services::status;

mod command;
pub mod stream;

use command::Command;

/// Version reported to the UI by `init`.
pub const BACKEND_VERSION: &str = "1.0.0";

const PROTOCOL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::protocol");

/// Decodes one request line. Trailing whitespace, including `\r\n`, is ignored.
///
/// Fails only when the line is not JSON or is JSON `null`.
pub fn decode(line: &[u8]) -> Result<Request, RequestError> {
    let value = serde_json::from_slice(trim_trailing_whitespace(line))?;
    Request::from_value(value)
}

/// Decodes and answers one line. Never fails: bad input becomes an error response.
pub fn handle_line(line: &[u8]) -> Response {
    match decode(line) {
        Ok(request) => {
            info!(target: PROTOCOL_TARGET, command = %request.command_name(), "received command");
            debug!(target: PROTOCOL_TARGET, sent_at = ?request.timestamp, "request timestamp");
            process_command(&request)
        }
        Err(error) => {
            warn!(target: PROTOCOL_TARGET, %error, "failed to parse command");
            Response::malformed(error)
        }
    }
}

pub fn process_command(request: &Request) -> Response {
    let name = request.command_name();

    match Command::from(name.as_ref()) {
        Command::Init => Response::success()
            .with_message("Backend initialized successfully")
            .with_version(BACKEND_VERSION),

        Command::Ping => Response::success().with_message("pong"),

        Command::GetStatus => Response::success().with_data(status::snapshot()),

        // No file I/O happens here yet; the UI only needs the acknowledgement.
        Command::FileOperation => Response::success().with_message("File operation completed"),

        Command::Unknown => {
            Response::failure().with_message(format!("Unknown command: {name}"))
        }
    }
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|pos| pos + 1)
        .unwrap_or(0);
    &bytes[..end]
}
