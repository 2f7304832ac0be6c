// src/reader/mod.rs
mod source;
mod segy_file;
mod range;
mod streaming;
#[cfg(feature = "async")]
mod async_reader;

pub use source::{TraceSource, FileSource, MemorySource};
#[cfg(feature = "mmap")]
pub use source::MmapSource;
pub use segy_file::SegyFile;
pub use range::TraceMatrix;
pub use streaming::TraceChunks;
#[cfg(feature = "async")]
pub use async_reader::AsyncSegyFile;
