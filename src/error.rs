//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the orbitview crate.
#[derive(Debug)]
pub enum ViewportError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Presenting a frame to the output surface failed.
    Surface(String),
    /// An asset could not be fetched from its URL.
    AssetFetch {
        /// The URL that was requested.
        url: String,
        /// Transport-level failure description.
        reason: String,
    },
    /// An asset was fetched but could not be decoded.
    AssetDecode {
        /// The URL the bytes came from.
        url: String,
        /// Decoder failure description.
        reason: String,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Calibration record could not be read.
    CalibrationParse(String),
    /// The host rejected a command.
    Command(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Surface(msg) => write!(f, "surface error: {msg}"),
            Self::AssetFetch { url, reason } => {
                write!(f, "failed to fetch {url}: {reason}")
            }
            Self::AssetDecode { url, reason } => {
                write!(f, "failed to decode {url}: {reason}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::CalibrationParse(msg) => {
                write!(f, "calibration parse error: {msg}")
            }
            Self::Command(msg) => write!(f, "command rejected: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for ViewportError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
