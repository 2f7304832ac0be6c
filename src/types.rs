// src/types.rs
use crate::error::{SegyError, Result};
use std::fmt;

/// Size of the textual file header (and of every extended textual header)
pub const TEXTUAL_HEADER_SIZE: usize = 3200;
/// Size of the binary file header
pub const BINARY_HEADER_SIZE: usize = 400;
/// Size of the header preceding every trace's samples
pub const TRACE_HEADER_SIZE: usize = 240;
/// Offset of the binary header within the file
pub const BINARY_HEADER_OFFSET: u64 = TEXTUAL_HEADER_SIZE as u64;
/// Offset of the first byte after the mandatory headers
pub const MANDATORY_HEADERS_SIZE: u64 = (TEXTUAL_HEADER_SIZE + BINARY_HEADER_SIZE) as u64;
/// Upper bound on range sizes clients are expected to request in one call.
///
/// Not enforced; a range of `n` traces needs `n * samples * 8` bytes of output.
pub const RECOMMENDED_MAX_RANGE: u64 = 1500;

/// Data sample format, selected by the binary header's format code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum SampleFormat {
    /// 4-byte IBM base-16 floating point
    IbmFloat32 = 1,
    /// 4-byte two's complement integer
    Int32 = 2,
    /// 2-byte two's complement integer
    Int16 = 3,
    /// 4-byte IEEE-754 floating point
    IeeeFloat32 = 5,
    /// 1-byte two's complement integer
    Int8 = 8,
}

impl SampleFormat {
    pub fn from_code(code: i16) -> Result<Self> {
        match code {
            1 => Ok(SampleFormat::IbmFloat32),
            2 => Ok(SampleFormat::Int32),
            3 => Ok(SampleFormat::Int16),
            5 => Ok(SampleFormat::IeeeFloat32),
            8 => Ok(SampleFormat::Int8),
            other => Err(SegyError::UnsupportedFormat(other)),
        }
    }

    pub fn code(&self) -> i16 {
        *self as i16
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::IbmFloat32 | SampleFormat::Int32 | SampleFormat::IeeeFloat32 => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 => 1,
        }
    }

    /// Name reported under the "Data Format" metadata key
    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::IbmFloat32 => "IBMf32",
            SampleFormat::Int32 => "I32",
            SampleFormat::Int16 => "I16",
            SampleFormat::IeeeFloat32 => "IEEEf32",
            SampleFormat::Int8 => "I8",
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::IbmFloat32 | SampleFormat::IeeeFloat32)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of every multi-byte field in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

impl ByteOrder {
    pub fn is_big_endian(&self) -> bool {
        matches!(self, ByteOrder::Big)
    }

    pub fn swapped(&self) -> Self {
        match self {
            ByteOrder::Big => ByteOrder::Little,
            ByteOrder::Little => ByteOrder::Big,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::Big => "big",
            ByteOrder::Little => "little",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoding of the textual headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ebcdic,
    Ascii,
}

/// How trace records are laid out after the headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    /// Every trace has the binary header's sample count; offsets are computed
    Fixed,
    /// Trace headers override the sample count; offsets come from a scan
    Variable,
}

impl Geometry {
    /// Informational id reported under the "index" metadata key
    pub fn id(&self) -> i64 {
        match self {
            Geometry::Fixed => 0,
            Geometry::Variable => 1,
        }
    }
}

/// SEG-Y revision as stored in the binary header (major.minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Revision {
    pub major: u8,
    pub minor: u8,
}

impl Revision {
    pub fn from_raw(raw: u16) -> Self {
        Revision {
            major: (raw >> 8) as u8,
            minor: (raw & 0xFF) as u8,
        }
    }

    pub fn raw_value(&self) -> u16 {
        ((self.major as u16) << 8) | self.minor as u16
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
