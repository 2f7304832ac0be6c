// src/header/binary.rs
use crate::error::{SegyError, Result};
use crate::types::{ByteOrder, Revision, SampleFormat, BINARY_HEADER_SIZE, TRACE_HEADER_SIZE};
use crate::utils::{read_f64_at, read_i16_at, read_i32_at, read_u16_at, read_u32_at, read_u64_at};
use tracing::{debug, warn};

// Field offsets within the 400-byte block (file bytes 3201..=3600)
const JOB_ID: usize = 0;
const LINE_NUMBER: usize = 4;
const REEL_NUMBER: usize = 8;
const TRACES_PER_ENSEMBLE: usize = 12;
const AUX_TRACES_PER_ENSEMBLE: usize = 14;
const SAMPLE_INTERVAL: usize = 16;
const SAMPLES_PER_TRACE: usize = 20;
const FORMAT_CODE: usize = 24;
const MEASUREMENT_SYSTEM: usize = 54;
const BYTE_ORDER_MARK: usize = 96;
const EXT_SAMPLES_PER_TRACE: usize = 100;
const EXT_SAMPLE_INTERVAL: usize = 104;
const REVISION: usize = 300;
const FIXED_LENGTH_FLAG: usize = 302;
const EXTENDED_HEADER_COUNT: usize = 304;
const TRACE_COUNT: usize = 312;
const FIRST_TRACE_OFFSET: usize = 320;
const TRAILER_STANZA_COUNT: usize = 328;

/// Rev2 byte order constant, as it reads when interpreted in the file's own order
const BYTE_ORDER_CONSTANT: u32 = 0x0102_0304;

/// Parsed 400-byte binary file header
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryHeader {
    pub job_id: i32,
    pub line_number: i32,
    pub reel_number: i32,
    pub traces_per_ensemble: i16,
    pub aux_traces_per_ensemble: i16,
    /// Sample interval in microseconds
    pub sample_interval: f64,
    pub samples_per_trace: u32,
    pub format: SampleFormat,
    pub measurement_system: i16,
    pub revision: Revision,
    pub fixed_length_traces: bool,
    /// Number of 3200-byte extended textual headers; -1 means "until EndText"
    pub extended_header_count: i16,
    /// Trace count declared by rev2 headers, 0 when absent
    pub declared_trace_count: u64,
    /// Byte offset of the first trace declared by rev2 headers, 0 when absent
    pub first_trace_offset: u64,
    pub trailer_stanza_count: u32,
    pub byte_order: ByteOrder,
}

/// Sanity window used to decide whether a byte order reading of the header makes sense
pub fn is_plausible(buf: &[u8], order: ByteOrder) -> bool {
    let samples = read_u16_at(buf, SAMPLES_PER_TRACE, order);
    let format = read_i16_at(buf, FORMAT_CODE, order);
    samples >= 1 && (1..=8).contains(&format)
}

/// Detect the byte order of a binary header block.
///
/// Big endian is tried first. A rev2 byte order constant, when present, is
/// consulted before that but still has to pass the sanity window.
pub fn detect_byte_order(buf: &[u8]) -> Result<ByteOrder> {
    check_len(buf)?;

    let hinted = match read_u32_at(buf, BYTE_ORDER_MARK, ByteOrder::Big) {
        BYTE_ORDER_CONSTANT => Some(ByteOrder::Big),
        0x0403_0201 => Some(ByteOrder::Little),
        _ => None,
    };

    if let Some(order) = hinted {
        if is_plausible(buf, order) {
            return Ok(order);
        }
        warn!(%order, "Byte order constant contradicts header contents, falling back to detection");
    }

    if is_plausible(buf, ByteOrder::Big) {
        return Ok(ByteOrder::Big);
    }

    if is_plausible(buf, ByteOrder::Little) {
        debug!("Binary header implausible as big endian, using little endian");
        return Ok(ByteOrder::Little);
    }

    Err(SegyError::UnsupportedByteOrder {
        big_samples: read_u16_at(buf, SAMPLES_PER_TRACE, ByteOrder::Big),
        big_format: read_i16_at(buf, FORMAT_CODE, ByteOrder::Big),
        little_samples: read_u16_at(buf, SAMPLES_PER_TRACE, ByteOrder::Little),
        little_format: read_i16_at(buf, FORMAT_CODE, ByteOrder::Little),
    })
}

fn check_len(buf: &[u8]) -> Result<()> {
    if buf.len() < BINARY_HEADER_SIZE {
        return Err(SegyError::FileTooShort {
            expected: BINARY_HEADER_SIZE as u64,
            actual: buf.len() as u64,
        });
    }
    Ok(())
}

impl BinaryHeader {
    /// Parse a binary header, detecting its byte order
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let order = detect_byte_order(buf)?;
        Self::parse_with(buf, order)
    }

    /// Parse a binary header in a known byte order
    pub fn parse_with(buf: &[u8], order: ByteOrder) -> Result<Self> {
        check_len(buf)?;

        let format_code = read_i16_at(buf, FORMAT_CODE, order);
        let format = SampleFormat::from_code(format_code).map_err(|_| {
            SegyError::Format(format!(
                "binary header declares unsupported data sample format code {}",
                format_code
            ))
        })?;

        let revision = Revision::from_raw(read_u16_at(buf, REVISION, order));
        let rev2 = revision.major >= 2;

        let mut samples_per_trace = read_u16_at(buf, SAMPLES_PER_TRACE, order) as u32;
        if rev2 {
            let extended = read_u32_at(buf, EXT_SAMPLES_PER_TRACE, order);
            if extended > 0 {
                samples_per_trace = extended;
            }
        }
        if samples_per_trace == 0 {
            return Err(SegyError::Format(
                "binary header declares zero samples per trace".to_string(),
            ));
        }

        let mut sample_interval = read_u16_at(buf, SAMPLE_INTERVAL, order) as f64;
        if sample_interval == 0.0 && rev2 {
            let extended = read_f64_at(buf, EXT_SAMPLE_INTERVAL, order);
            if extended.is_finite() && extended > 0.0 {
                sample_interval = extended;
            }
        }

        let extended_header_count = read_i16_at(buf, EXTENDED_HEADER_COUNT, order);
        if extended_header_count < -1 {
            return Err(SegyError::Format(format!(
                "binary header declares {} extended textual headers",
                extended_header_count
            )));
        }

        let (declared_trace_count, first_trace_offset, trailer_stanza_count) = if rev2 {
            (
                read_u64_at(buf, TRACE_COUNT, order),
                read_u64_at(buf, FIRST_TRACE_OFFSET, order),
                read_i32_at(buf, TRAILER_STANZA_COUNT, order).max(0) as u32,
            )
        } else {
            (0, 0, 0)
        };

        Ok(BinaryHeader {
            job_id: read_i32_at(buf, JOB_ID, order),
            line_number: read_i32_at(buf, LINE_NUMBER, order),
            reel_number: read_i32_at(buf, REEL_NUMBER, order),
            traces_per_ensemble: read_i16_at(buf, TRACES_PER_ENSEMBLE, order),
            aux_traces_per_ensemble: read_i16_at(buf, AUX_TRACES_PER_ENSEMBLE, order),
            sample_interval,
            samples_per_trace,
            format,
            measurement_system: read_i16_at(buf, MEASUREMENT_SYSTEM, order),
            revision,
            fixed_length_traces: revision.major >= 1 && read_i16_at(buf, FIXED_LENGTH_FLAG, order) == 1,
            extended_header_count,
            declared_trace_count,
            first_trace_offset,
            trailer_stanza_count,
            byte_order: order,
        })
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.format.bytes_per_sample()
    }

    /// Size of one trace's sample data in bytes
    pub fn trace_data_size(&self) -> u64 {
        self.samples_per_trace as u64 * self.bytes_per_sample() as u64
    }

    /// Size of one trace record (header plus samples) under fixed geometry
    pub fn trace_stride(&self) -> u64 {
        TRACE_HEADER_SIZE as u64 + self.trace_data_size()
    }
}
