// src/utils/mod.rs
mod ebcdic;
mod endian;

pub(crate) use self::ebcdic::*;
pub(crate) use self::endian::*;
