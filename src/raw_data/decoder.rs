// src/raw_data/decoder.rs
use crate::error::{SegyError, Result};
use crate::raw_data::ibm::ibm_to_f64;
use crate::types::{ByteOrder, SampleFormat};
use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};

/// Decodes raw trace sample bytes into `f64` values
///
/// A decoder is a pure function of its format and byte order; it holds no
/// buffers and is freely shared between threads.
///
/// # Example
///
/// ```
/// use fastsegy::raw_data::SampleDecoder;
/// use fastsegy::{ByteOrder, SampleFormat};
///
/// let decoder = SampleDecoder::new(SampleFormat::Int16, ByteOrder::Big);
/// let values = decoder.decode(&[0x00, 0x01, 0xFF, 0xFF]).unwrap();
/// assert_eq!(values, vec![1.0, -1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDecoder {
    format: SampleFormat,
    byte_order: ByteOrder,
}

impl SampleDecoder {
    pub fn new(format: SampleFormat, byte_order: ByteOrder) -> Self {
        SampleDecoder { format, byte_order }
    }

    /// Build a decoder from a raw format code
    pub fn from_code(code: i16, byte_order: ByteOrder) -> Result<Self> {
        Ok(SampleDecoder::new(SampleFormat::from_code(code)?, byte_order))
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Number of whole samples contained in `byte_len` bytes
    pub fn sample_count(&self, byte_len: usize) -> usize {
        byte_len / self.format.bytes_per_sample()
    }

    /// Decode a buffer of raw samples into a new vector
    pub fn decode(&self, raw: &[u8]) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.sample_count(raw.len())];
        self.decode_into(raw, &mut out)?;
        Ok(out)
    }

    /// Decode raw samples into a caller-provided slice
    ///
    /// `raw` must hold exactly `out.len()` samples.
    pub fn decode_into(&self, raw: &[u8], out: &mut [f64]) -> Result<()> {
        let expected = out.len() * self.format.bytes_per_sample();
        if raw.len() != expected {
            return Err(SegyError::Format(format!(
                "expected {} bytes of {} samples, found {}",
                expected, self.format, raw.len()
            )));
        }

        match self.byte_order {
            ByteOrder::Big => decode_with::<BigEndian>(self.format, raw, out),
            ByteOrder::Little => decode_with::<LittleEndian>(self.format, raw, out),
        }
        Ok(())
    }
}

fn decode_with<E: Endian>(format: SampleFormat, raw: &[u8], out: &mut [f64]) {
    match format {
        SampleFormat::IbmFloat32 => {
            for (chunk, value) in raw.chunks_exact(4).zip(out.iter_mut()) {
                *value = ibm_to_f64(E::read_u32(chunk));
            }
        }
        SampleFormat::Int32 => {
            for (chunk, value) in raw.chunks_exact(4).zip(out.iter_mut()) {
                *value = E::read_i32(chunk) as f64;
            }
        }
        SampleFormat::Int16 => {
            for (chunk, value) in raw.chunks_exact(2).zip(out.iter_mut()) {
                *value = E::read_i16(chunk) as f64;
            }
        }
        SampleFormat::IeeeFloat32 => {
            for (chunk, value) in raw.chunks_exact(4).zip(out.iter_mut()) {
                *value = E::read_f32(chunk) as f64;
            }
        }
        SampleFormat::Int8 => {
            for (&byte, value) in raw.iter().zip(out.iter_mut()) {
                *value = byte as i8 as f64;
            }
        }
    }
}

/// Decode raw sample bytes given a format code straight from a header
///
/// Unknown codes fail with [`SegyError::UnsupportedFormat`].
pub fn decode_samples(raw: &[u8], format_code: i16, byte_order: ByteOrder) -> Result<Vec<f64>> {
    SampleDecoder::from_code(format_code, byte_order)?.decode(raw)
}
