// src/header/mod.rs
//! Parsers for the fixed-size header blocks of a SEG-Y file
//!
//! - [`TextualHeader`] - the 3200-byte EBCDIC/ASCII card image block
//! - [`BinaryHeader`] - the 400-byte file-wide geometry block, including byte order detection
//! - [`TraceHeader`] - the 240-byte block in front of every trace

mod textual;
mod binary;
mod trace;

pub use textual::{TextualHeader, TEXTUAL_HEADER_LINES, TEXTUAL_HEADER_COLUMNS, END_TEXT_STANZA};
pub use binary::{BinaryHeader, detect_byte_order, is_plausible};
pub use trace::TraceHeader;
