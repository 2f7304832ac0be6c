// src/utils/endian.rs
use crate::types::ByteOrder;
use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};

// Fixed-position field readers for header buffers. Callers hand in buffers of
// the full header size, so offsets are always in bounds.

pub fn read_u16_at(buf: &[u8], offset: usize, order: ByteOrder) -> u16 {
    let bytes = &buf[offset..offset + 2];
    match order {
        ByteOrder::Big => BigEndian::read_u16(bytes),
        ByteOrder::Little => LittleEndian::read_u16(bytes),
    }
}

pub fn read_i16_at(buf: &[u8], offset: usize, order: ByteOrder) -> i16 {
    read_u16_at(buf, offset, order) as i16
}

pub fn read_u32_at(buf: &[u8], offset: usize, order: ByteOrder) -> u32 {
    let bytes = &buf[offset..offset + 4];
    match order {
        ByteOrder::Big => BigEndian::read_u32(bytes),
        ByteOrder::Little => LittleEndian::read_u32(bytes),
    }
}

pub fn read_i32_at(buf: &[u8], offset: usize, order: ByteOrder) -> i32 {
    read_u32_at(buf, offset, order) as i32
}

pub fn read_u64_at(buf: &[u8], offset: usize, order: ByteOrder) -> u64 {
    let bytes = &buf[offset..offset + 8];
    match order {
        ByteOrder::Big => BigEndian::read_u64(bytes),
        ByteOrder::Little => LittleEndian::read_u64(bytes),
    }
}

pub fn read_f64_at(buf: &[u8], offset: usize, order: ByteOrder) -> f64 {
    f64::from_bits(read_u64_at(buf, offset, order))
}
