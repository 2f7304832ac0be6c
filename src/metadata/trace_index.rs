// src/metadata/trace_index.rs
use crate::config::GeometryMode;
use crate::error::{SegyError, Result};
use crate::header::{BinaryHeader, TraceHeader};
use crate::reader::TraceSource;
use crate::types::{ByteOrder, Geometry, TEXTUAL_HEADER_SIZE, TRACE_HEADER_SIZE};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
enum Layout {
    Fixed { stride: u64, samples: u32 },
    Variable { offsets: Vec<u64>, samples: Vec<u32> },
}

/// Maps 1-based trace numbers to byte offsets in the file
///
/// Under fixed geometry the offset of trace `n` is
/// `base_offset + (n - 1) * stride`. Under variable geometry the offsets come
/// from a single sequential walk over the trace headers done when the index
/// is built.
#[derive(Debug, Clone)]
pub struct TraceIndex {
    base_offset: u64,
    layout: Layout,
    trace_count: u64,
    declared_trace_count: u64,
    size_consistent: bool,
    verify_overrides: bool,
}

/// End of the trace region, excluding any rev2 data trailer stanzas
fn data_end(header: &BinaryHeader, file_size: u64) -> u64 {
    let trailer = header.trailer_stanza_count as u64 * TEXTUAL_HEADER_SIZE as u64;
    file_size.saturating_sub(trailer)
}

impl TraceIndex {
    /// Build an index for `header`, choosing the layout according to `mode`
    pub fn build(
        source: &dyn TraceSource,
        header: &BinaryHeader,
        base_offset: u64,
        mode: GeometryMode,
    ) -> Result<Self> {
        match mode {
            GeometryMode::Fixed => Ok(TraceIndex {
                verify_overrides: false,
                ..Self::fixed(header, base_offset, source.len())
            }),
            GeometryMode::Scan => Self::scan(source, header, base_offset),
            GeometryMode::Auto => {
                let fixed = Self::fixed(header, base_offset, source.len());
                if header.fixed_length_traces || fixed.trace_count == 0 {
                    return Ok(fixed);
                }

                let end = data_end(header, source.len());
                let stride = header.trace_stride();
                let aligned = (end - base_offset.min(end)) % stride == 0;

                if aligned
                    && fixed.probe_agrees(source, header, 1)?
                    && fixed.probe_agrees(source, header, fixed.trace_count)?
                {
                    return Ok(fixed);
                }

                warn!(
                    "Trace headers disagree with the binary header's sample count, scanning trace headers"
                );
                Self::scan(source, header, base_offset)
            }
        }
    }

    /// Whether trace `n`'s own sample count agrees with the binary header
    fn probe_agrees(&self, source: &dyn TraceSource, header: &BinaryHeader, n: u64) -> Result<bool> {
        let mut buf = [0u8; TRACE_HEADER_SIZE];
        source.read_exact_at(self.byte_offset_of(n)?, &mut buf)?;
        let count = TraceHeader::sample_count_of(&buf, header.byte_order);
        Ok(count == 0 || count as u32 == header.samples_per_trace)
    }

    /// Index computed purely from the binary header and the file size
    pub fn fixed(header: &BinaryHeader, base_offset: u64, file_size: u64) -> Self {
        let stride = header.trace_stride();
        let end = data_end(header, file_size);
        let data_len = end.saturating_sub(base_offset);
        let size_derived = data_len / stride;
        let declared = header.declared_trace_count;

        let trace_count = if declared > 0 && declared <= size_derived {
            declared
        } else {
            if declared > size_derived {
                warn!(
                    declared,
                    size_derived,
                    "Declared trace count exceeds what the file holds, using size-derived count"
                );
            }
            size_derived
        };

        let size_consistent = if declared > 0 {
            declared
                .checked_mul(stride)
                .and_then(|len| len.checked_add(base_offset))
                .map_or(false, |expected| expected == end)
        } else {
            data_len % stride == 0
        };

        if !size_consistent {
            warn!(
                file_size,
                base_offset,
                stride,
                declared,
                "File size does not match the trace layout declared by the headers"
            );
        }

        TraceIndex {
            base_offset,
            layout: Layout::Fixed {
                stride,
                samples: header.samples_per_trace,
            },
            trace_count,
            declared_trace_count: declared,
            size_consistent,
            verify_overrides: true,
        }
    }

    /// Walk every trace header from `base_offset` and record where each trace starts
    pub fn scan(source: &dyn TraceSource, header: &BinaryHeader, base_offset: u64) -> Result<Self> {
        let end = data_end(header, source.len());
        let bytes_per_sample = header.bytes_per_sample() as u64;
        let record_header = TRACE_HEADER_SIZE as u64;

        let mut offsets = Vec::new();
        let mut samples = Vec::new();
        let mut offset = base_offset;
        let mut header_buf = [0u8; TRACE_HEADER_SIZE];

        while offset + record_header <= end {
            source.read_exact_at(offset, &mut header_buf)?;
            let count = TraceHeader::sample_count_of(&header_buf, header.byte_order);
            let count = if count == 0 { header.samples_per_trace } else { count as u32 };

            let record = record_header + count as u64 * bytes_per_sample;
            if offset + record > end {
                break;
            }

            offsets.push(offset);
            samples.push(count);
            offset += record;
        }

        let size_consistent = offset == end;
        if !size_consistent {
            warn!(
                trailing_bytes = end.saturating_sub(offset),
                "Trailing bytes after the last complete trace"
            );
        }

        let declared = header.declared_trace_count;
        let scanned = offsets.len() as u64;
        let trace_count = if declared > 0 && declared <= scanned {
            declared
        } else {
            scanned
        };

        if samples.iter().all(|&n| n == header.samples_per_trace) {
            debug!(traces = trace_count, "Scan found uniform traces, using fixed geometry");
            return Ok(TraceIndex {
                base_offset,
                layout: Layout::Fixed {
                    stride: header.trace_stride(),
                    samples: header.samples_per_trace,
                },
                trace_count,
                declared_trace_count: declared,
                size_consistent,
                verify_overrides: true,
            });
        }

        debug!(traces = trace_count, "Built variable geometry trace index");
        Ok(TraceIndex {
            base_offset,
            layout: Layout::Variable { offsets, samples },
            trace_count,
            declared_trace_count: declared,
            size_consistent,
            verify_overrides: true,
        })
    }

    fn check(&self, n: u64) -> Result<usize> {
        if n < 1 || n > self.trace_count {
            return Err(SegyError::TraceOutOfRange {
                requested: n,
                trace_count: self.trace_count,
            });
        }
        Ok((n - 1) as usize)
    }

    /// Byte offset of trace `n`'s 240-byte header
    pub fn byte_offset_of(&self, n: u64) -> Result<u64> {
        let i = self.check(n)?;
        Ok(match &self.layout {
            Layout::Fixed { stride, .. } => self.base_offset + i as u64 * stride,
            Layout::Variable { offsets, .. } => offsets[i],
        })
    }

    /// Byte offset of trace `n`'s first sample
    pub fn data_offset_of(&self, n: u64) -> Result<u64> {
        Ok(self.byte_offset_of(n)? + TRACE_HEADER_SIZE as u64)
    }

    /// Number of samples in trace `n`
    pub fn samples_in(&self, n: u64) -> Result<usize> {
        let i = self.check(n)?;
        Ok(match &self.layout {
            Layout::Fixed { samples, .. } => *samples as usize,
            Layout::Variable { samples, .. } => samples[i] as usize,
        })
    }

    /// Check trace `n`'s own header against a fixed layout
    ///
    /// A non-zero sample count that differs from the file-wide one means every
    /// offset from this trace on is wrong. Variable layouts and layouts forced
    /// with [`GeometryMode::Fixed`] always pass.
    pub fn verify_record(&self, n: u64, trace_header: &[u8], order: ByteOrder) -> Result<()> {
        if !self.verify_overrides {
            return Ok(());
        }
        if let Layout::Fixed { samples, .. } = &self.layout {
            let count = TraceHeader::sample_count_of(trace_header, order);
            if count != 0 && count as u32 != *samples {
                return Err(SegyError::Format(format!(
                    "trace {} declares {} samples but the binary header declares {}; \
                     open with GeometryMode::Scan to index traces of varying length",
                    n, count, samples
                )));
            }
        }
        Ok(())
    }

    /// Validate an inclusive 1-based range
    pub fn check_range(&self, start: u64, end: u64) -> Result<()> {
        if start < 1 || start > end || end > self.trace_count {
            return Err(SegyError::InvalidRange {
                start,
                end,
                trace_count: self.trace_count,
            });
        }
        Ok(())
    }

    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    /// Trace count found in the binary header, 0 when it does not declare one
    pub fn declared_trace_count(&self) -> u64 {
        self.declared_trace_count
    }

    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// Record length shared by every trace, `None` under variable geometry
    pub fn stride(&self) -> Option<u64> {
        match &self.layout {
            Layout::Fixed { stride, .. } => Some(*stride),
            Layout::Variable { .. } => None,
        }
    }

    pub fn geometry(&self) -> Geometry {
        match &self.layout {
            Layout::Fixed { .. } => Geometry::Fixed,
            Layout::Variable { .. } => Geometry::Variable,
        }
    }

    /// Whether the file size matched the layout the headers declare
    pub fn is_size_consistent(&self) -> bool {
        self.size_consistent
    }
}
