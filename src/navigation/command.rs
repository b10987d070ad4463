//! Host command channel and the navigation payload sent through it.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Payload of a navigation request: `{ "imageIndex": n }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// Slice index the host should jump to.
    #[serde(rename = "imageIndex")]
    pub image_index: u32,
}

/// Something that can run named commands on behalf of the viewport.
///
/// Execution semantics (synchronous or not, how failures surface) belong to
/// the host. The viewport treats every call as fire-and-forget and only logs
/// an `Err`.
pub trait CommandChannel {
    /// Run `name` with a JSON payload.
    fn run_command(
        &mut self,
        name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ViewportError>;
}

impl<F> CommandChannel for F
where
    F: FnMut(&str, &serde_json::Value) -> Result<(), ViewportError>,
{
    fn run_command(
        &mut self,
        name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ViewportError> {
        self(name, payload)
    }
}

/// One command per line as `{"command": name, "payload": {...}}`.
#[derive(Serialize)]
struct CommandLine<'a> {
    command: &'a str,
    payload: &'a serde_json::Value,
}

/// Writes commands as newline-delimited JSON, flushing after each line so a
/// host reading a pipe sees them immediately.
pub struct JsonLinesChannel<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesChannel<W> {
    /// Wrap a writer (typically stdout).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandChannel for JsonLinesChannel<W> {
    fn run_command(
        &mut self,
        name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ViewportError> {
        let line = serde_json::to_string(&CommandLine {
            command: name,
            payload,
        })
        .map_err(|e| ViewportError::Command(e.to_string()))?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
