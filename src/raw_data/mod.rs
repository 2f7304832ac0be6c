// src/raw_data/mod.rs
//! Decoding of raw trace samples
//!
//! SEG-Y stores samples in one of several encodings selected by the binary
//! header's format code. This module turns those bytes into `f64`:
//!
//! - [`SampleDecoder`] - format + byte order dispatch, decoding into new or caller-owned buffers
//! - [`decode_samples`] - one-shot decode keyed by a raw format code
//! - [`ibm_to_f64`] - the IBM base-16 float conversion used by format code 1
//!
//! # Examples
//!
//! ```
//! use fastsegy::raw_data::decode_samples;
//! use fastsegy::ByteOrder;
//!
//! // IBM float 10.0 is 0x41A00000
//! let values = decode_samples(&[0x41, 0xA0, 0x00, 0x00], 1, ByteOrder::Big).unwrap();
//! assert_eq!(values, vec![10.0]);
//! ```

mod decoder;
mod ibm;

pub use decoder::{SampleDecoder, decode_samples};
pub use ibm::ibm_to_f64;
