// src/error.rs
use std::io;
use thiserror::Error;

/// Broad class of a [`SegyError`], used by bindings to pick an exception type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
    UnsupportedFormat,
    UnsupportedByteOrder,
    IndexOutOfRange,
    Closed,
}

#[derive(Error, Debug)]
pub enum SegyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed SEG-Y file: {0}")]
    Format(String),

    #[error("File too short: expected at least {expected} bytes, found {actual}")]
    FileTooShort { expected: u64, actual: u64 },

    #[error("Unsupported data sample format code: {0}")]
    UnsupportedFormat(i16),

    #[error(
        "Unable to determine byte order: big-endian header reads {big_samples} samples with format code {big_format}, \
         little-endian reads {little_samples} samples with format code {little_format}"
    )]
    UnsupportedByteOrder {
        big_samples: u16,
        big_format: i16,
        little_samples: u16,
        little_format: i16,
    },

    #[error("Trace {requested} is out of range: traces are numbered 1..={trace_count}")]
    TraceOutOfRange { requested: u64, trace_count: u64 },

    #[error("Invalid trace range {start}..={end}: traces are numbered 1..={trace_count}")]
    InvalidRange { start: u64, end: u64, trace_count: u64 },

    #[error("Trace {trace} has {found} samples but the range started with {expected}; traces of unequal length cannot be read as one block")]
    RaggedRange { trace: u64, expected: usize, found: usize },

    #[error("File is closed")]
    Closed,
}

impl SegyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SegyError::Io(_) => ErrorKind::Io,
            SegyError::Format(_) | SegyError::FileTooShort { .. } => ErrorKind::Format,
            SegyError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            SegyError::UnsupportedByteOrder { .. } => ErrorKind::UnsupportedByteOrder,
            SegyError::TraceOutOfRange { .. }
            | SegyError::InvalidRange { .. }
            | SegyError::RaggedRange { .. } => ErrorKind::IndexOutOfRange,
            SegyError::Closed => ErrorKind::Closed,
        }
    }

    /// Whether the handle that produced this error is still usable
    ///
    /// Only meaningful for errors returned by calls on an open [`SegyFile`](crate::SegyFile).
    /// An error from `open` leaves no handle behind, whatever its kind. A failed
    /// read does not change the handle, so another trace or range may still succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::IndexOutOfRange | ErrorKind::Io
        )
    }
}

pub type Result<T> = std::result::Result<T, SegyError>;
