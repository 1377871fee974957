//! Error types module
//!
//! All ingestion failures are unified under `IngestError`. Each variant knows
//! its `Severity`: session-level failures abort the whole run, everything
//! else is scoped to the descriptor being processed and the run moves on.

use std::io;
use std::path::PathBuf;

/// How far an error propagates through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Credentials or connectivity are presumed broken; stop the run.
    Fatal,
    /// Only the current descriptor is affected.
    Descriptor,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid descriptor {path}: {message}")]
    Descriptor { path: PathBuf, message: String },

    #[error("Local file not accessible {path}: {source}")]
    LocalFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File is empty: {0}")]
    EmptyFile(PathBuf),

    #[error("Chunk {sequence} upload failed: {message}")]
    Transfer { sequence: u32, message: String },

    #[error("Blob upload from link failed: {0}")]
    LinkUpload(String),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Application creation rejected: {0}")]
    Creation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl IngestError {
    pub fn descriptor(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        IngestError::Descriptor {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IngestError::Session(_) | IngestError::Config(_) => Severity::Fatal,
            _ => Severity::Descriptor,
        }
    }

    /// Whether the run must stop after this error.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
