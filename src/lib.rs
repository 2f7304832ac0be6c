// src/lib.rs
//! # fastsegy
//!
//! Fast random-access reading of SEG-Y seismic files.
//!
//! ## Features
//!
//! - **Random Access**: any trace is one positioned read away; the file is never loaded whole
//! - **Thread-Safe**: a single open handle serves concurrent readers without a seek lock
//! - **Parallel Decode**: range reads spread sample decoding over a rayon pool
//! - **Legacy Formats**: IBM base-16 floats, 8/16/32-bit integers and IEEE floats, either byte order
//! - **Self-Describing**: byte order, text encoding and trace geometry are detected at open
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fastsegy::*;
//!
//! fn main() -> Result<()> {
//!     let segy = SegyFile::open("line_042.sgy")?;
//!
//!     println!("{}", segy.get_header()?);
//!
//!     let metadata = segy.get_metadata()?;
//!     println!("{} traces of {} samples", metadata.trace_count, metadata.samples_per_trace);
//!
//!     // Traces are numbered from 1
//!     let trace = segy.get_trace(1)?;
//!     let gather = segy.get_trace_range(1, 240)?;
//!     assert_eq!(gather.row(0), Some(&trace[..]));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Async Reading
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! use fastsegy::*;
//!
//! # #[cfg(feature = "async")]
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let segy = AsyncSegyFile::open("line_042.sgy").await?;
//!
//!     let (a, b) = tokio::join!(segy.get_trace(10), segy.get_trace_range(100, 200));
//!     println!("{} samples, {:?}", a?.len(), b?.shape());
//!     Ok(())
//! }
//! # #[cfg(not(feature = "async"))]
//! # fn main() {}
//! ```

// Modules
pub mod error;
pub mod types;
pub mod config;
pub mod header;
pub mod metadata;
pub mod raw_data;
pub mod reader;

mod utils;

// Re-export commonly used types at the crate root for convenience
pub use error::{SegyError, ErrorKind, Result};

pub use types::{
    SampleFormat, ByteOrder, TextEncoding, Geometry, Revision,
    TEXTUAL_HEADER_SIZE, BINARY_HEADER_SIZE, TRACE_HEADER_SIZE, RECOMMENDED_MAX_RANGE,
};

pub use config::{SegyOptions, GeometryMode};

pub use header::{TextualHeader, BinaryHeader, TraceHeader};

pub use metadata::{MetadataSnapshot, MetadataValue, TraceIndex};

pub use raw_data::{SampleDecoder, decode_samples, ibm_to_f64};

pub use reader::{SegyFile, TraceMatrix, TraceChunks, TraceSource, FileSource, MemorySource};

#[cfg(feature = "mmap")]
pub use reader::MmapSource;

#[cfg(feature = "async")]
pub use reader::AsyncSegyFile;

/// Prelude module for convenient imports
///
/// ```
/// use fastsegy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{SegyError, Result};
    pub use crate::types::{SampleFormat, ByteOrder, Geometry};
    pub use crate::config::SegyOptions;
    pub use crate::reader::{SegyFile, TraceMatrix};

    #[cfg(feature = "async")]
    pub use crate::reader::AsyncSegyFile;
}

// Version information
/// Highest SEG-Y revision whose header fields this library reads
pub const SEGY_REVISION: Revision = Revision { major: 2, minor: 1 };

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
