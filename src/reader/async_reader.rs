// src/reader/async_reader.rs
use crate::config::SegyOptions;
use crate::error::{SegyError, Result};
use crate::header::TraceHeader;
use crate::metadata::MetadataSnapshot;
use crate::reader::{SegyFile, TraceMatrix};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::task;

/// Async facade over [`SegyFile`] for use inside a tokio runtime
///
/// Every read runs on tokio's blocking pool, so callers never stall the
/// async executor on disk I/O. Clones share one open file.
#[derive(Clone, Debug)]
pub struct AsyncSegyFile {
    inner: Arc<SegyFile>,
}

fn join_error(e: task::JoinError) -> SegyError {
    SegyError::Io(io::Error::new(io::ErrorKind::Other, e))
}

impl AsyncSegyFile {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, SegyOptions::default()).await
    }

    pub async fn open_with(path: impl AsRef<Path>, options: SegyOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = task::spawn_blocking(move || SegyFile::open_with(path, options))
            .await
            .map_err(join_error)??;
        Ok(Self::from_file(file))
    }

    pub fn from_file(file: SegyFile) -> Self {
        AsyncSegyFile { inner: Arc::new(file) }
    }

    /// The shared synchronous handle
    pub fn inner(&self) -> &Arc<SegyFile> {
        &self.inner
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SegyFile) -> Result<T> + Send + 'static,
    {
        let file = Arc::clone(&self.inner);
        task::spawn_blocking(move || f(file.as_ref()))
            .await
            .map_err(join_error)?
    }

    pub fn get_header(&self) -> Result<String> {
        self.inner.get_header()
    }

    pub fn get_metadata(&self) -> Result<MetadataSnapshot> {
        self.inner.get_metadata()
    }

    pub async fn get_trace(&self, n: u64) -> Result<Vec<f64>> {
        self.run(move |file| file.get_trace(n)).await
    }

    pub async fn get_trace_range(&self, start: u64, end: u64) -> Result<TraceMatrix> {
        self.run(move |file| file.get_trace_range(start, end)).await
    }

    pub async fn get_trace_header(&self, n: u64) -> Result<TraceHeader> {
        self.run(move |file| file.get_trace_header(n)).await
    }

    pub fn trace_count(&self) -> u64 {
        self.inner.trace_count()
    }

    pub fn close(&self) {
        self.inner.close()
    }
}
