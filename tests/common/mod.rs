// tests/common/mod.rs
#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::path::PathBuf;
use tempfile::TempDir;

pub const TEXT_SIZE: usize = 3200;
pub const BINARY_SIZE: usize = 400;
pub const TRACE_HEADER: usize = 240;

/// Encode a value as an IBM base-16 float word
pub fn ibm_word(value: f64) -> u32 {
    if value == 0.0 {
        return 0;
    }
    let sign = if value < 0.0 { 1u32 << 31 } else { 0 };
    let mut x = value.abs();
    let mut exponent = 64i32;
    while x >= 1.0 {
        x /= 16.0;
        exponent += 1;
    }
    while x < 1.0 / 16.0 {
        x *= 16.0;
        exponent -= 1;
    }
    let mut fraction = (x * (1u64 << 24) as f64).round() as u32;
    if fraction == 1 << 24 {
        fraction >>= 4;
        exponent += 1;
    }
    sign | ((exponent as u32) << 24) | fraction
}

/// ASCII to EBCDIC for the characters used in fixture headers
fn to_ebcdic(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => 0xF0 + (c - b'0'),
        b'A'..=b'I' => 0xC1 + (c - b'A'),
        b'J'..=b'R' => 0xD1 + (c - b'J'),
        b'S'..=b'Z' => 0xE2 + (c - b'S'),
        b'a'..=b'i' => 0x81 + (c - b'a'),
        b'j'..=b'r' => 0x91 + (c - b'j'),
        b's'..=b'z' => 0xA2 + (c - b's'),
        b'(' => 0x4D,
        b')' => 0x5D,
        b':' => 0x7A,
        _ => 0x40,
    }
}

/// 40 card-image lines, "C 1 ... C40"
pub fn card_lines(title: &str) -> Vec<String> {
    (1..=40)
        .map(|i| {
            let line = if i == 1 {
                format!("C{:>2} {}", i, title)
            } else {
                format!("C{:>2} CARD {}", i, i)
            };
            format!("{:<80}", line)
        })
        .collect()
}

/// Builder for synthetic SEG-Y files
#[derive(Clone)]
pub struct SegyBuilder {
    little_endian: bool,
    ebcdic: bool,
    format: i16,
    samples: u16,
    interval: u16,
    revision: u16,
    fixed_length: bool,
    declared_traces: u64,
    write_order_constant: bool,
    variable_extended: bool,
    lines: Vec<String>,
    extended: Vec<String>,
    traces: Vec<Vec<f64>>,
    trailing: Vec<u8>,
}

impl SegyBuilder {
    pub fn new(format: i16, samples: u16) -> Self {
        SegyBuilder {
            little_endian: false,
            ebcdic: false,
            format,
            samples,
            interval: 2000,
            revision: 0,
            fixed_length: false,
            declared_traces: 0,
            write_order_constant: false,
            variable_extended: false,
            lines: card_lines("FASTSEGY TEST FILE"),
            extended: Vec::new(),
            traces: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn little_endian(mut self) -> Self {
        self.little_endian = true;
        self
    }

    pub fn ebcdic(mut self) -> Self {
        self.ebcdic = true;
        self
    }

    pub fn interval(mut self, micros: u16) -> Self {
        self.interval = micros;
        self
    }

    pub fn lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    /// Mark the file as revision 2 with the byte order constant written
    pub fn revision2(mut self) -> Self {
        self.revision = 0x0200;
        self.write_order_constant = true;
        self
    }

    pub fn fixed_length(mut self) -> Self {
        self.fixed_length = true;
        self
    }

    pub fn declared_traces(mut self, count: u64) -> Self {
        self.declared_traces = count;
        self
    }

    /// Append an extended textual header whose first line is `text`
    pub fn extended_header(mut self, text: &str) -> Self {
        self.extended.push(text.to_string());
        self
    }

    /// Declare the extended header count as -1 (list ends with EndText)
    pub fn variable_extended_headers(mut self) -> Self {
        self.variable_extended = true;
        self
    }

    pub fn trace(mut self, samples: &[f64]) -> Self {
        self.traces.push(samples.to_vec());
        self
    }

    pub fn traces(mut self, traces: &[Vec<f64>]) -> Self {
        self.traces.extend_from_slice(traces);
        self
    }

    /// Garbage appended after the last trace
    pub fn trailing_bytes(mut self, n: usize) -> Self {
        self.trailing = vec![0xAB; n];
        self
    }

    fn put_u16(&self, buf: &mut [u8], offset: usize, v: u16) {
        if self.little_endian {
            LittleEndian::write_u16(&mut buf[offset..], v)
        } else {
            BigEndian::write_u16(&mut buf[offset..], v)
        }
    }

    fn put_i16(&self, buf: &mut [u8], offset: usize, v: i16) {
        self.put_u16(buf, offset, v as u16)
    }

    fn put_u32(&self, buf: &mut [u8], offset: usize, v: u32) {
        if self.little_endian {
            LittleEndian::write_u32(&mut buf[offset..], v)
        } else {
            BigEndian::write_u32(&mut buf[offset..], v)
        }
    }

    fn put_u64(&self, buf: &mut [u8], offset: usize, v: u64) {
        if self.little_endian {
            LittleEndian::write_u64(&mut buf[offset..], v)
        } else {
            BigEndian::write_u64(&mut buf[offset..], v)
        }
    }

    fn text_block(&self, lines: &[String]) -> Vec<u8> {
        let mut block = Vec::with_capacity(TEXT_SIZE);
        for i in 0..40 {
            let line = lines.get(i).map(String::as_str).unwrap_or("");
            let line = format!("{:<80}", line);
            block.extend(line.bytes().take(80).map(|b| if self.ebcdic { to_ebcdic(b) } else { b }));
        }
        block
    }

    fn encode_samples(&self, values: &[f64], out: &mut Vec<u8>) {
        for &v in values {
            let start = out.len();
            match self.format {
                1 => {
                    out.resize(start + 4, 0);
                    self.put_u32(out, start, ibm_word(v));
                }
                2 => {
                    out.resize(start + 4, 0);
                    self.put_u32(out, start, v as i32 as u32);
                }
                3 => {
                    out.resize(start + 2, 0);
                    self.put_i16(out, start, v as i16);
                }
                5 => {
                    out.resize(start + 4, 0);
                    self.put_u32(out, start, (v as f32).to_bits());
                }
                8 => out.push(v as i8 as u8),
                other => panic!("fixture cannot encode format {}", other),
            }
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = self.text_block(&self.lines);

        let mut bin = vec![0u8; BINARY_SIZE];
        self.put_u16(&mut bin, 16, self.interval);
        self.put_u16(&mut bin, 20, self.samples);
        self.put_i16(&mut bin, 24, self.format);
        if self.write_order_constant {
            self.put_u32(&mut bin, 96, 0x0102_0304);
        }
        self.put_u16(&mut bin, 300, self.revision);
        self.put_i16(&mut bin, 302, self.fixed_length as i16);
        let extended_count = if self.variable_extended { -1 } else { self.extended.len() as i16 };
        self.put_i16(&mut bin, 304, extended_count);
        if self.revision >= 0x0200 {
            self.put_u64(&mut bin, 312, self.declared_traces);
        }
        data.extend_from_slice(&bin);

        for text in &self.extended {
            data.extend(self.text_block(&[text.clone()]));
        }

        for (i, trace) in self.traces.iter().enumerate() {
            let mut header = vec![0u8; TRACE_HEADER];
            self.put_u32(&mut header, 0, (i + 1) as u32);
            self.put_u32(&mut header, 4, (i + 1) as u32);
            if trace.len() != self.samples as usize {
                self.put_u16(&mut header, 114, trace.len() as u16);
            }
            self.put_u16(&mut header, 116, self.interval);
            data.extend_from_slice(&header);
            self.encode_samples(trace, &mut data);
        }

        data.extend_from_slice(&self.trailing);
        data
    }

    /// Write the file into `dir` and return its path
    pub fn write(&self, dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Deterministic trace values: trace `t` (1-based), sample `s` -> `t * 10 + s * 0.5`
pub fn ramp(traces: usize, samples: usize) -> Vec<Vec<f64>> {
    (1..=traces)
        .map(|t| (0..samples).map(|s| t as f64 * 10.0 + s as f64 * 0.5).collect())
        .collect()
}

/// Integer variant of [`ramp`] for integer formats
pub fn int_ramp(traces: usize, samples: usize) -> Vec<Vec<f64>> {
    (1..=traces)
        .map(|t| (0..samples).map(|s| (t * 10 + s) as f64 - 50.0).collect())
        .collect()
}
