//! Error types for fconvert-av.

use std::time::Duration;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running an external converter.
///
/// A converter exiting with a nonzero status is *not* an error at this
/// layer; callers get the captured output back and classify it themselves.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The converter process could not be started at all.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exceeded its configured timeout.
    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// An I/O error occurred while waiting for the converter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a spawn error.
    pub fn spawn(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            tool: tool.into(),
            source,
        }
    }

    /// Create a timeout error.
    pub fn timeout(tool: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            tool: tool.into(),
            timeout,
        }
    }

    /// True when the failure was the program itself missing from `PATH`.
    pub fn is_program_missing(&self) -> bool {
        matches!(
            self,
            Error::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
