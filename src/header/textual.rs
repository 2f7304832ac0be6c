// src/header/textual.rs
use crate::error::{SegyError, Result};
use crate::types::{TextEncoding, TEXTUAL_HEADER_SIZE};
use crate::utils::{ebcdic_block_to_ascii, looks_like_ebcdic, printable_ascii};

pub const TEXTUAL_HEADER_LINES: usize = 40;
pub const TEXTUAL_HEADER_COLUMNS: usize = 80;

/// Marker closing the list of extended textual headers when their count is -1
pub const END_TEXT_STANZA: &str = "((SEG: EndText))";

/// Decoded 3200-byte textual header, stored as 40 lines of 80 ASCII characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualHeader {
    lines: Vec<String>,
    encoding: TextEncoding,
}

impl TextualHeader {
    /// Decode a textual header block, detecting its encoding
    pub fn parse(block: &[u8]) -> Result<Self> {
        let encoding = Self::detect_encoding(block)?;
        Self::parse_with(block, encoding)
    }

    /// Decode a textual header block with a known encoding
    pub fn parse_with(block: &[u8], encoding: TextEncoding) -> Result<Self> {
        let block = Self::checked_block(block)?;
        let translated;
        let ascii = match encoding {
            TextEncoding::Ebcdic => {
                translated = ebcdic_block_to_ascii(block);
                &translated[..]
            }
            TextEncoding::Ascii => block,
        };

        let lines = ascii
            .chunks_exact(TEXTUAL_HEADER_COLUMNS)
            .map(|card| card.iter().map(|&b| printable_ascii(b)).collect::<String>())
            .collect();

        Ok(TextualHeader { lines, encoding })
    }

    pub fn detect_encoding(block: &[u8]) -> Result<TextEncoding> {
        let block = Self::checked_block(block)?;
        Ok(if looks_like_ebcdic(block) {
            TextEncoding::Ebcdic
        } else {
            TextEncoding::Ascii
        })
    }

    fn checked_block(block: &[u8]) -> Result<&[u8]> {
        if block.len() < TEXTUAL_HEADER_SIZE {
            return Err(SegyError::FileTooShort {
                expected: TEXTUAL_HEADER_SIZE as u64,
                actual: block.len() as u64,
            });
        }
        Ok(&block[..TEXTUAL_HEADER_SIZE])
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether this block is the stanza ending a variable-length list of extended headers
    pub fn is_end_text(&self) -> bool {
        self.lines.iter().any(|line| line.contains(END_TEXT_STANZA))
    }

    /// The 40 lines joined with `\n`
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl std::fmt::Display for TextualHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}
