// src/reader/streaming.rs
use crate::error::Result;
use crate::reader::{SegyFile, TraceMatrix};

/// Streaming iterator over a trace range, yielding bounded blocks
///
/// This keeps memory bounded when walking through large files by reading
/// `chunk` traces at a time instead of the whole range.
///
/// # Example
///
/// ```no_run
/// use fastsegy::SegyFile;
///
/// let segy = SegyFile::open("survey.sgy").unwrap();
/// let mut peak = 0.0f64;
/// for block in segy.iter_traces(1, segy.trace_count(), 500).unwrap() {
///     let block = block.unwrap();
///     peak = block.as_slice().iter().fold(peak, |m, v| m.max(v.abs()));
/// }
/// println!("Peak amplitude: {}", peak);
/// ```
pub struct TraceChunks<'a> {
    file: &'a SegyFile,
    next: u64,
    end: u64,
    chunk: u64,
}

impl<'a> TraceChunks<'a> {
    pub(crate) fn new(file: &'a SegyFile, start: u64, end: u64, chunk: usize) -> Self {
        TraceChunks {
            file,
            next: start,
            end,
            chunk: chunk.max(1) as u64,
        }
    }

    /// Number of the first trace in the next block
    pub fn position(&self) -> u64 {
        self.next
    }

    /// Traces not yet yielded
    pub fn remaining(&self) -> u64 {
        (self.end + 1).saturating_sub(self.next)
    }
}

impl<'a> Iterator for TraceChunks<'a> {
    type Item = Result<TraceMatrix>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }

        let last = (self.next + self.chunk - 1).min(self.end);
        let block = self.file.get_trace_range(self.next, last);

        // A failed block ends the stream
        self.next = match block {
            Ok(_) => last + 1,
            Err(_) => self.end + 1,
        };
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let blocks = ((self.remaining() + self.chunk - 1) / self.chunk) as usize;
        (0, Some(blocks))
    }
}
