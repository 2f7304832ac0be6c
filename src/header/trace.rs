// src/header/trace.rs
use crate::error::{SegyError, Result};
use crate::types::{ByteOrder, TRACE_HEADER_SIZE};
use crate::utils::{read_i16_at, read_i32_at, read_u16_at};

const SEQUENCE_IN_LINE: usize = 0;
const SEQUENCE_IN_FILE: usize = 4;
const FIELD_RECORD: usize = 8;
const TRACE_IN_FIELD_RECORD: usize = 12;
const TRACE_ID_CODE: usize = 28;
const ELEVATION_SCALAR: usize = 68;
const COORDINATE_SCALAR: usize = 70;
const SOURCE_X: usize = 72;
const SOURCE_Y: usize = 76;
const GROUP_X: usize = 80;
const GROUP_Y: usize = 84;
const DELAY_RECORDING_TIME: usize = 108;
const SAMPLE_COUNT: usize = 114;
const SAMPLE_INTERVAL: usize = 116;

/// Fixed fields of a 240-byte trace header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceHeader {
    pub sequence_in_line: i32,
    pub sequence_in_file: i32,
    pub field_record: i32,
    pub trace_in_field_record: i32,
    pub trace_id_code: i16,
    pub elevation_scalar: i16,
    pub coordinate_scalar: i16,
    pub source_x: i32,
    pub source_y: i32,
    pub group_x: i32,
    pub group_y: i32,
    /// Delay recording time in milliseconds
    pub delay_recording_time: i16,
    /// Per-trace sample count; 0 means "use the binary header's value"
    pub sample_count: u16,
    /// Per-trace sample interval in microseconds; 0 when unset
    pub sample_interval: u16,
}

impl TraceHeader {
    pub fn parse(buf: &[u8], order: ByteOrder) -> Result<Self> {
        if buf.len() < TRACE_HEADER_SIZE {
            return Err(SegyError::FileTooShort {
                expected: TRACE_HEADER_SIZE as u64,
                actual: buf.len() as u64,
            });
        }

        Ok(TraceHeader {
            sequence_in_line: read_i32_at(buf, SEQUENCE_IN_LINE, order),
            sequence_in_file: read_i32_at(buf, SEQUENCE_IN_FILE, order),
            field_record: read_i32_at(buf, FIELD_RECORD, order),
            trace_in_field_record: read_i32_at(buf, TRACE_IN_FIELD_RECORD, order),
            trace_id_code: read_i16_at(buf, TRACE_ID_CODE, order),
            elevation_scalar: read_i16_at(buf, ELEVATION_SCALAR, order),
            coordinate_scalar: read_i16_at(buf, COORDINATE_SCALAR, order),
            source_x: read_i32_at(buf, SOURCE_X, order),
            source_y: read_i32_at(buf, SOURCE_Y, order),
            group_x: read_i32_at(buf, GROUP_X, order),
            group_y: read_i32_at(buf, GROUP_Y, order),
            delay_recording_time: read_i16_at(buf, DELAY_RECORDING_TIME, order),
            sample_count: read_u16_at(buf, SAMPLE_COUNT, order),
            sample_interval: read_u16_at(buf, SAMPLE_INTERVAL, order),
        })
    }

    /// Read only the per-trace sample count override
    pub(crate) fn sample_count_of(buf: &[u8], order: ByteOrder) -> u16 {
        read_u16_at(buf, SAMPLE_COUNT, order)
    }

    /// Number of samples in this trace, falling back to the file-wide value
    pub fn samples_or(&self, default: u32) -> u32 {
        if self.sample_count == 0 {
            default
        } else {
            self.sample_count as u32
        }
    }

    /// Apply a SEG-Y scalar: positive multiplies, negative divides, zero is 1
    pub fn apply_scalar(value: i32, scalar: i16) -> f64 {
        match scalar {
            0 => value as f64,
            s if s > 0 => value as f64 * s as f64,
            s => value as f64 / (-(s as f64)),
        }
    }

    pub fn scaled_source(&self) -> (f64, f64) {
        (
            Self::apply_scalar(self.source_x, self.coordinate_scalar),
            Self::apply_scalar(self.source_y, self.coordinate_scalar),
        )
    }

    pub fn scaled_group(&self) -> (f64, f64) {
        (
            Self::apply_scalar(self.group_x, self.coordinate_scalar),
            Self::apply_scalar(self.group_y, self.coordinate_scalar),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

    #[test]
    fn test_parse_fields() {
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        BigEndian::write_i32(&mut buf[SEQUENCE_IN_LINE..], 3);
        BigEndian::write_i32(&mut buf[SEQUENCE_IN_FILE..], 103);
        BigEndian::write_i16(&mut buf[COORDINATE_SCALAR..], -100);
        BigEndian::write_i32(&mut buf[SOURCE_X..], 123_456);
        BigEndian::write_u16(&mut buf[SAMPLE_COUNT..], 750);
        BigEndian::write_u16(&mut buf[SAMPLE_INTERVAL..], 4000);

        let header = TraceHeader::parse(&buf, ByteOrder::Big).unwrap();
        assert_eq!(header.sequence_in_line, 3);
        assert_eq!(header.sequence_in_file, 103);
        assert_eq!(header.sample_count, 750);
        assert_eq!(header.sample_interval, 4000);
        assert_eq!(header.samples_or(1000), 750);
        assert!((header.scaled_source().0 - 1234.56).abs() < 1e-9);
    }

    #[test]
    fn test_little_endian_sample_count() {
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        LittleEndian::write_u16(&mut buf[SAMPLE_COUNT..], 12);
        assert_eq!(TraceHeader::sample_count_of(&buf, ByteOrder::Little), 12);
        assert_eq!(TraceHeader::parse(&buf, ByteOrder::Little).unwrap().samples_or(99), 12);
    }

    #[test]
    fn test_zero_sample_count_falls_back() {
        let header = TraceHeader::default();
        assert_eq!(header.samples_or(1000), 1000);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(TraceHeader::apply_scalar(10, 0), 10.0);
        assert_eq!(TraceHeader::apply_scalar(10, 100), 1000.0);
        assert_eq!(TraceHeader::apply_scalar(10, -10), 1.0);
    }

    #[test]
    fn test_scaled_group() {
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        BigEndian::write_i16(&mut buf[COORDINATE_SCALAR..], 10);
        BigEndian::write_i32(&mut buf[GROUP_X..], 500);
        BigEndian::write_i32(&mut buf[GROUP_Y..], -25);

        let header = TraceHeader::parse(&buf, ByteOrder::Big).unwrap();
        assert_eq!(header.scaled_group(), (5000.0, -250.0));
        assert_eq!(header.scaled_source(), (0.0, 0.0));
    }

    #[test]
    fn test_short_buffer() {
        assert!(TraceHeader::parse(&[0u8; 100], ByteOrder::Big).is_err());
    }
}
