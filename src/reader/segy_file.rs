// src/reader/segy_file.rs
use crate::config::SegyOptions;
use crate::error::{SegyError, Result};
use crate::header::{BinaryHeader, TextualHeader, TraceHeader};
use crate::metadata::{MetadataSnapshot, TraceIndex};
use crate::raw_data::SampleDecoder;
use crate::reader::range::{RangeReader, TraceMatrix};
use crate::reader::source::{FileSource, MemorySource, TraceSource};
use crate::reader::streaming::TraceChunks;
use crate::types::{
    Geometry, BINARY_HEADER_OFFSET, MANDATORY_HEADERS_SIZE, TEXTUAL_HEADER_SIZE,
    TRACE_HEADER_SIZE,
};
use bytes::Bytes;
use parking_lot::RwLock;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "mmap")]
use crate::reader::source::MmapSource;

/// An open SEG-Y file with random access to its traces
///
/// All headers are parsed and the trace index is built when the file is
/// opened. After that every read is a positioned read against the
/// underlying source, so one handle can be shared between threads
/// (`SegyFile` is `Send + Sync`) without any lock around a file cursor.
///
/// Traces are numbered from 1.
///
/// # Example
///
/// ```no_run
/// use fastsegy::SegyFile;
///
/// let segy = SegyFile::open("line_001.sgy").unwrap();
/// println!("{}", segy.get_header().unwrap());
///
/// let first = segy.get_trace(1).unwrap();
/// let block = segy.get_trace_range(1, 100).unwrap();
/// assert_eq!(block.row(0).unwrap(), &first[..]);
/// ```
pub struct SegyFile {
    path: Option<PathBuf>,
    source: RwLock<Option<Arc<dyn TraceSource>>>,
    textual: TextualHeader,
    extended: Vec<TextualHeader>,
    binary: BinaryHeader,
    index: TraceIndex,
    decoder: SampleDecoder,
    options: SegyOptions,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl SegyFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, SegyOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: SegyOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = FileSource::open(path)?;
        Self::from_source(Arc::new(source), Some(path.to_path_buf()), options)
    }

    /// Open a file through a read-only memory map (requires "mmap" feature)
    #[cfg(feature = "mmap")]
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_mmap_with(path, SegyOptions::default())
    }

    #[cfg(feature = "mmap")]
    pub fn open_mmap_with(path: impl AsRef<Path>, options: SegyOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = MmapSource::open(path)?;
        Self::from_source(Arc::new(source), Some(path.to_path_buf()), options)
    }

    /// Read a SEG-Y file that is already in memory
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self> {
        Self::from_bytes_with(data, SegyOptions::default())
    }

    pub fn from_bytes_with(data: impl Into<Bytes>, options: SegyOptions) -> Result<Self> {
        Self::from_source(Arc::new(MemorySource::new(data)), None, options)
    }

    /// Parse headers and build the trace index over any byte source
    pub fn from_source(
        source: Arc<dyn TraceSource>,
        path: Option<PathBuf>,
        options: SegyOptions,
    ) -> Result<Self> {
        let file_size = source.len();
        if file_size < MANDATORY_HEADERS_SIZE {
            return Err(SegyError::FileTooShort {
                expected: MANDATORY_HEADERS_SIZE,
                actual: file_size,
            });
        }

        let mut headers = vec![0u8; MANDATORY_HEADERS_SIZE as usize];
        source.read_exact_at(0, &mut headers)?;
        let (textual_block, binary_block) = headers.split_at(BINARY_HEADER_OFFSET as usize);

        let textual = match options.text_encoding {
            Some(encoding) => TextualHeader::parse_with(textual_block, encoding)?,
            None => TextualHeader::parse(textual_block)?,
        };

        let binary = match options.byte_order {
            Some(order) => BinaryHeader::parse_with(binary_block, order)?,
            None => BinaryHeader::parse(binary_block)?,
        };

        let extended = read_extended_headers(source.as_ref(), &binary, &textual)?;

        let base_offset = if binary.first_trace_offset > 0 {
            binary.first_trace_offset
        } else {
            MANDATORY_HEADERS_SIZE + (extended.len() * TEXTUAL_HEADER_SIZE) as u64
        };
        if base_offset > file_size {
            return Err(SegyError::Format(format!(
                "first trace offset {} is past the end of the {}-byte file",
                base_offset, file_size
            )));
        }

        let index = TraceIndex::build(source.as_ref(), &binary, base_offset, options.geometry)?;
        let decoder = SampleDecoder::new(binary.format, binary.byte_order);

        let pool = match options.worker_threads {
            Some(threads) => Some(Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("fastsegy-decode-{}", i))
                    .build()
                    .map_err(|e| SegyError::Io(io::Error::new(io::ErrorKind::Other, e)))?,
            )),
            None => None,
        };

        debug!(
            path = ?path,
            byte_order = %binary.byte_order,
            format = %binary.format,
            samples = binary.samples_per_trace,
            traces = index.trace_count(),
            geometry = ?index.geometry(),
            extended_headers = extended.len(),
            "Opened SEG-Y file"
        );

        Ok(SegyFile {
            path,
            source: RwLock::new(Some(source)),
            textual,
            extended,
            binary,
            index,
            decoder,
            options,
            pool,
        })
    }

    /// Clone the source out of the lock so I/O never happens while holding it
    fn source(&self) -> Result<Arc<dyn TraceSource>> {
        self.source.read().as_ref().cloned().ok_or(SegyError::Closed)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.source.read().is_none() {
            return Err(SegyError::Closed);
        }
        Ok(())
    }

    /// The textual header as 40 lines of 80 characters joined with `\n`
    pub fn get_header(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.textual.to_text())
    }

    pub fn get_metadata(&self) -> Result<MetadataSnapshot> {
        self.ensure_open()?;
        Ok(MetadataSnapshot {
            samples_per_trace: self.binary.samples_per_trace as usize,
            bytes_per_sample: self.binary.bytes_per_sample(),
            data_format: self.binary.format,
            byte_order: self.binary.byte_order,
            trace_count: self.index.trace_count(),
            sample_interval: self.binary.sample_interval,
            geometry: self.index.geometry(),
            revision: self.binary.revision,
            extended_header_count: self.extended.len() as u32,
            size_consistent: self.index.is_size_consistent(),
        })
    }

    /// Decoded samples of trace `n`
    pub fn get_trace(&self, n: u64) -> Result<Vec<f64>> {
        let record = self.read_raw_trace(n)?;
        let (trace_header, raw) = record.split_at(TRACE_HEADER_SIZE);
        self.index.verify_record(n, trace_header, self.binary.byte_order)?;
        self.decoder.decode(raw)
    }

    /// Decoded samples of traces `start..=end`, one row per trace
    pub fn get_trace_range(&self, start: u64, end: u64) -> Result<TraceMatrix> {
        let source = self.source()?;
        RangeReader {
            source: source.as_ref(),
            index: &self.index,
            decoder: self.decoder,
            options: &self.options,
            pool: self.pool.as_deref(),
        }
        .read(start, end)
    }

    pub fn get_trace_header(&self, n: u64) -> Result<TraceHeader> {
        let source = self.source()?;
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        source.read_exact_at(self.index.byte_offset_of(n)?, &mut buf)?;
        TraceHeader::parse(&buf, self.binary.byte_order)
    }

    /// Trace `n` exactly as stored: its 240-byte header followed by undecoded samples
    pub fn read_raw_trace(&self, n: u64) -> Result<Bytes> {
        let source = self.source()?;
        let offset = self.index.byte_offset_of(n)?;
        let len = TRACE_HEADER_SIZE + self.index.samples_in(n)? * self.binary.bytes_per_sample();

        let mut raw = vec![0u8; len];
        source.read_exact_at(offset, &mut raw)?;
        Ok(Bytes::from(raw))
    }

    /// Stream traces `start..=end` in blocks of at most `chunk` traces
    pub fn iter_traces(&self, start: u64, end: u64, chunk: usize) -> Result<TraceChunks<'_>> {
        self.ensure_open()?;
        self.index.check_range(start, end)?;
        Ok(TraceChunks::new(self, start, end, chunk))
    }

    /// Release the underlying source. Further reads fail with [`SegyError::Closed`].
    pub fn close(&self) {
        if self.source.write().take().is_some() {
            debug!(path = ?self.path, "Closed SEG-Y file");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.source.read().is_none()
    }

    pub fn textual_header(&self) -> &TextualHeader {
        &self.textual
    }

    pub fn extended_textual_headers(&self) -> &[TextualHeader] {
        &self.extended
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary
    }

    pub fn trace_index(&self) -> &TraceIndex {
        &self.index
    }

    pub fn trace_count(&self) -> u64 {
        self.index.trace_count()
    }

    pub fn geometry(&self) -> Geometry {
        self.index.geometry()
    }

    pub fn is_size_consistent(&self) -> bool {
        self.index.is_size_consistent()
    }

    pub fn options(&self) -> &SegyOptions {
        &self.options
    }

    /// Path the file was opened from, `None` for in-memory data
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for SegyFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegyFile")
            .field("path", &self.path)
            .field("format", &self.binary.format)
            .field("byte_order", &self.binary.byte_order)
            .field("trace_count", &self.index.trace_count())
            .field("geometry", &self.index.geometry())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Decode the extended textual headers following the binary header
///
/// A count of -1 means the list runs until a stanza containing
/// `((SEG: EndText))`, which is itself part of the list.
fn read_extended_headers(
    source: &dyn TraceSource,
    binary: &BinaryHeader,
    textual: &TextualHeader,
) -> Result<Vec<TextualHeader>> {
    let encoding = textual.encoding();
    let file_size = source.len();
    let mut offset = MANDATORY_HEADERS_SIZE;
    let mut block = vec![0u8; TEXTUAL_HEADER_SIZE];
    let mut headers = Vec::new();

    if binary.extended_header_count >= 0 {
        let count = binary.extended_header_count as u64;
        if offset + count * TEXTUAL_HEADER_SIZE as u64 > file_size {
            return Err(SegyError::Format(format!(
                "binary header declares {} extended textual headers but the file ends at byte {}",
                count, file_size
            )));
        }
        for _ in 0..count {
            source.read_exact_at(offset, &mut block)?;
            headers.push(TextualHeader::parse_with(&block, encoding)?);
            offset += TEXTUAL_HEADER_SIZE as u64;
        }
        return Ok(headers);
    }

    while offset + TEXTUAL_HEADER_SIZE as u64 <= file_size {
        source.read_exact_at(offset, &mut block)?;
        let header = TextualHeader::parse_with(&block, encoding)?;
        let done = header.is_end_text();
        headers.push(header);
        offset += TEXTUAL_HEADER_SIZE as u64;
        if done {
            return Ok(headers);
        }
    }

    Err(SegyError::Format(
        "extended textual headers are not terminated by an EndText stanza".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, ByteOrder as _};

    fn minimal_file(samples: u16, traces: usize) -> Vec<u8> {
        let mut data = vec![b' '; TEXTUAL_HEADER_SIZE];
        data.resize(MANDATORY_HEADERS_SIZE as usize, 0);
        let bin = TEXTUAL_HEADER_SIZE;
        BigEndian::write_u16(&mut data[bin + 16..], 1000);
        BigEndian::write_u16(&mut data[bin + 20..], samples);
        BigEndian::write_i16(&mut data[bin + 24..], 3);

        for t in 0..traces {
            data.extend_from_slice(&[0u8; TRACE_HEADER_SIZE]);
            for s in 0..samples {
                let mut word = [0u8; 2];
                BigEndian::write_i16(&mut word, (t * 100 + s as usize) as i16);
                data.extend_from_slice(&word);
            }
        }
        data
    }

    #[test]
    fn test_from_bytes() {
        let segy = SegyFile::from_bytes(minimal_file(3, 5)).unwrap();
        assert_eq!(segy.trace_count(), 5);
        assert_eq!(segy.path(), None);
        assert_eq!(segy.get_trace(2).unwrap(), vec![100.0, 101.0, 102.0]);
        assert_eq!(segy.read_raw_trace(1).unwrap().len(), TRACE_HEADER_SIZE + 6);
    }

    #[test]
    fn test_too_short() {
        let err = SegyFile::from_bytes(vec![0u8; 100]).unwrap_err();
        assert!(matches!(err, SegyError::FileTooShort { .. }));
    }

    #[test]
    fn test_close_is_idempotent() {
        let segy = SegyFile::from_bytes(minimal_file(3, 2)).unwrap();
        segy.close();
        segy.close();
        assert!(segy.is_closed());
        assert!(matches!(segy.get_trace(1), Err(SegyError::Closed)));
        assert!(matches!(segy.get_header(), Err(SegyError::Closed)));
        assert!(matches!(segy.get_metadata(), Err(SegyError::Closed)));
    }

    #[test]
    fn test_dedicated_pool() {
        let options = SegyOptions::default()
            .with_worker_threads(2)
            .with_parallel_threshold(1);
        let segy = SegyFile::from_bytes_with(minimal_file(4, 20), options).unwrap();
        assert_eq!(segy.options().worker_threads, Some(2));
        assert_eq!(segy.options().parallel_threshold, 1);
        let matrix = segy.get_trace_range(1, 20).unwrap();
        assert_eq!(matrix.shape(), (20, 4));
        assert_eq!(matrix.row(19).unwrap(), &[1900.0, 1901.0, 1902.0, 1903.0][..]);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SegyFile>();
    }
}
