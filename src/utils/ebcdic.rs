// src/utils/ebcdic.rs
use ebcdic::ebcdic::Ebcdic;

/// Translate an EBCDIC block to ASCII bytes, one output byte per input byte.
///
/// Control codes are passed through; [`printable_ascii`] blanks them for display.
pub fn ebcdic_block_to_ascii(block: &[u8]) -> Vec<u8> {
    let mut ascii = vec![0u8; block.len()];
    Ebcdic::ebcdic_to_ascii(block, &mut ascii, block.len(), false, false);
    ascii
}

/// Guess whether a textual header block is EBCDIC.
///
/// EBCDIC letters and digits all live above 0x80 and its space is 0x40, while
/// ASCII text stays within 0x20..=0x7E. Whichever population is larger wins;
/// ties (including an all-zero block) are treated as ASCII.
pub fn looks_like_ebcdic(block: &[u8]) -> bool {
    let mut ebcdic_score = 0usize;
    let mut ascii_score = 0usize;

    for &b in block {
        match b {
            0x40 | 0x81..=0xF9 => ebcdic_score += 1,
            0x20..=0x7E => ascii_score += 1,
            _ => {}
        }
    }

    ebcdic_score > ascii_score
}

/// Map a decoded byte to a displayable ASCII character
pub fn printable_ascii(byte: u8) -> char {
    if (0x20..=0x7E).contains(&byte) {
        byte as char
    } else {
        ' '
    }
}
