//! Error types for trace encoding and decoding.

use std::fmt;
use std::io;

/// Errors that can occur while reading or writing a trace stream.
#[derive(Debug)]
pub enum TraceError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with the expected `b"HTRC"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// An event tag byte is not recognized.
    UnknownEventTag {
        /// The unrecognized tag.
        tag: u8,
    },
    /// The stream ended in the middle of a record.
    Truncated,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"HTRC\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported trace format version {found}")
            }
            Self::UnknownEventTag { tag } => write!(f, "unknown event tag {tag}"),
            Self::Truncated => write!(f, "trace stream ended mid-record"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
