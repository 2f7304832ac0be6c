// src/config.rs
use crate::types::{ByteOrder, TextEncoding};

/// How the trace layout is established when a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryMode {
    /// Trust the fixed-length flag, otherwise probe the first and last trace
    /// headers and fall back to a scan if they disagree with the binary header.
    /// Reads under a fixed layout reject traces whose own sample count differs.
    #[default]
    Auto,
    /// Always compute offsets from the binary header's sample count
    Fixed,
    /// Always walk the trace headers and build an offset table
    Scan,
}

/// Options controlling how a [`SegyFile`](crate::SegyFile) is opened and read
///
/// # Example
///
/// ```
/// use fastsegy::{SegyOptions, ByteOrder};
///
/// let options = SegyOptions::default()
///     .with_byte_order(ByteOrder::Little)
///     .with_worker_threads(4)
///     .with_parallel_threshold(64);
/// assert_eq!(options.worker_threads, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegyOptions {
    /// Skip byte order detection and use this order
    pub byte_order: Option<ByteOrder>,
    /// Skip textual header encoding detection and use this encoding
    pub text_encoding: Option<TextEncoding>,
    pub geometry: GeometryMode,
    /// Minimum number of traces in a range before decoding is spread over the pool
    pub parallel_threshold: usize,
    /// Size of a dedicated decode pool; `None` uses rayon's global pool
    pub worker_threads: Option<usize>,
    /// Upper bound on the bytes fetched by a single positioned read during range reads
    pub max_read_bytes: usize,
}

impl SegyOptions {
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16;
    pub const DEFAULT_MAX_READ_BYTES: usize = 64 * 1024 * 1024;

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    pub fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = Some(encoding);
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryMode) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_parallel_threshold(mut self, traces: usize) -> Self {
        self.parallel_threshold = traces;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads.max(1));
        self
    }

    pub fn with_max_read_bytes(mut self, bytes: usize) -> Self {
        self.max_read_bytes = bytes.max(1);
        self
    }
}

impl Default for SegyOptions {
    fn default() -> Self {
        SegyOptions {
            byte_order: None,
            text_encoding: None,
            geometry: GeometryMode::Auto,
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
            worker_threads: None,
            max_read_bytes: Self::DEFAULT_MAX_READ_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SegyOptions::default();
        assert_eq!(options.byte_order, None);
        assert_eq!(options.geometry, GeometryMode::Auto);
        assert_eq!(options.parallel_threshold, 16);
        assert_eq!(options.max_read_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn test_builders_clamp() {
        let options = SegyOptions::default().with_worker_threads(0).with_max_read_bytes(0);
        assert_eq!(options.worker_threads, Some(1));
        assert_eq!(options.max_read_bytes, 1);
    }
}
