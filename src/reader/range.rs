// src/reader/range.rs
use crate::config::SegyOptions;
use crate::error::{SegyError, Result};
use crate::metadata::TraceIndex;
use crate::raw_data::SampleDecoder;
use crate::reader::TraceSource;
use crate::types::TRACE_HEADER_SIZE;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::trace;

/// A block of traces stored row-major, one row per trace
///
/// Rows are always in ascending trace order.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceMatrix {
    data: Vec<f64>,
    rows: usize,
    samples: usize,
}

impl TraceMatrix {
    pub(crate) fn new(data: Vec<f64>, rows: usize, samples: usize) -> Self {
        debug_assert_eq!(data.len(), rows * samples);
        TraceMatrix { data, rows, samples }
    }

    /// `(traces, samples per trace)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.samples)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `i`, counted from 0 within the matrix
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.data[i * self.samples..(i + 1) * self.samples])
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.samples.max(1)).take(self.rows)
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows_iter().map(<[f64]>::to_vec).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Reads an inclusive run of traces into a [`TraceMatrix`]
pub(crate) struct RangeReader<'a> {
    pub source: &'a dyn TraceSource,
    pub index: &'a TraceIndex,
    pub decoder: SampleDecoder,
    pub options: &'a SegyOptions,
    pub pool: Option<&'a ThreadPool>,
}

impl<'a> RangeReader<'a> {
    pub fn read(&self, start: u64, end: u64) -> Result<TraceMatrix> {
        self.index.check_range(start, end)?;
        let rows = (end - start + 1) as usize;
        let samples = self.index.samples_in(start)?;

        let mut data = vec![0.0; rows * samples];
        let parallel = rows >= self.options.parallel_threshold;

        match self.pool {
            Some(pool) if parallel => pool.install(|| self.fill(start, samples, parallel, &mut data))?,
            _ => self.fill(start, samples, parallel, &mut data)?,
        }

        Ok(TraceMatrix::new(data, rows, samples))
    }

    fn fill(&self, start: u64, samples: usize, parallel: bool, out: &mut [f64]) -> Result<()> {
        match self.index.stride() {
            Some(stride) => self.fill_fixed(start, stride as usize, samples, parallel, out),
            None => self.fill_variable(start, samples, parallel, out),
        }
    }

    /// One positioned read per block of whole trace records, then decode rows out of it
    fn fill_fixed(
        &self,
        start: u64,
        stride: usize,
        samples: usize,
        parallel: bool,
        out: &mut [f64],
    ) -> Result<()> {
        let traces_per_block = (self.options.max_read_bytes / stride).max(1);
        let mut block = Vec::new();

        for (block_no, rows) in out.chunks_mut(traces_per_block * samples).enumerate() {
            let first = start + (block_no * traces_per_block) as u64;
            let count = rows.len() / samples;

            block.resize(count * stride, 0u8);
            self.source
                .read_exact_at(self.index.byte_offset_of(first)?, &mut block)?;
            trace!(first, count, bytes = block.len(), "Read trace block");

            let decode = |(i, (row, record)): (usize, (&mut [f64], &[u8]))| {
                let (trace_header, raw) = record.split_at(TRACE_HEADER_SIZE);
                self.index
                    .verify_record(first + i as u64, trace_header, self.decoder.byte_order())?;
                self.decoder.decode_into(raw, row)
            };

            if parallel {
                rows.par_chunks_mut(samples)
                    .zip(block.par_chunks(stride))
                    .enumerate()
                    .try_for_each(decode)?;
            } else {
                rows.chunks_mut(samples)
                    .zip(block.chunks(stride))
                    .enumerate()
                    .try_for_each(decode)?;
            }
        }

        Ok(())
    }

    /// Independent positioned reads per trace; every trace must match the first one's length
    fn fill_variable(&self, start: u64, samples: usize, parallel: bool, out: &mut [f64]) -> Result<()> {
        let rows = out.len() / samples;
        for i in 1..rows as u64 {
            let found = self.index.samples_in(start + i)?;
            if found != samples {
                return Err(SegyError::RaggedRange {
                    trace: start + i,
                    expected: samples,
                    found,
                });
            }
        }

        let width = self.decoder.format().bytes_per_sample();
        let read_one = |(i, row): (usize, &mut [f64])| -> Result<()> {
            let mut raw = vec![0u8; samples * width];
            self.source
                .read_exact_at(self.index.data_offset_of(start + i as u64)?, &mut raw)?;
            self.decoder.decode_into(&raw, row)
        };

        if parallel {
            out.par_chunks_mut(samples).enumerate().try_for_each(read_one)
        } else {
            out.chunks_mut(samples).enumerate().try_for_each(read_one)
        }
    }
}
