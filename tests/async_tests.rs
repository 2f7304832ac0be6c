// tests/async_tests.rs
#![cfg(feature = "async")]

mod common;

use common::{ramp, SegyBuilder};
use fastsegy::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_async_reads() {
    let dir = TempDir::new().unwrap();
    let path = SegyBuilder::new(5, 6).traces(&ramp(30, 6)).write(&dir, "async.sgy");

    let segy = AsyncSegyFile::open(&path).await.unwrap();
    assert_eq!(segy.trace_count(), 30);
    assert_eq!(segy.get_metadata().unwrap().samples_per_trace, 6);

    let (trace, range, header) = tokio::join!(
        segy.get_trace(12),
        segy.get_trace_range(1, 30),
        segy.get_trace_header(30),
    );
    assert_eq!(trace.unwrap(), ramp(12, 6)[11]);
    assert_eq!(range.unwrap().into_rows(), ramp(30, 6));
    assert_eq!(header.unwrap().sequence_in_line, 30);
}

#[tokio::test]
async fn test_async_tasks_share_handle() {
    let segy = AsyncSegyFile::from_file(SegyFile::from_bytes(SegyBuilder::new(3, 4).traces(&ramp(16, 4)).build()).unwrap());

    let tasks: Vec<_> = (1..=16u64)
        .map(|n| {
            let segy = segy.clone();
            tokio::spawn(async move { (n, segy.get_trace(n).await) })
        })
        .collect();

    let expected = ramp(16, 4);
    for task in tasks {
        let (n, trace) = task.await.unwrap();
        assert_eq!(trace.unwrap(), expected[n as usize - 1]);
    }
}

#[tokio::test]
async fn test_async_errors() {
    let dir = TempDir::new().unwrap();
    let err = AsyncSegyFile::open(dir.path().join("missing.sgy")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let segy = AsyncSegyFile::from_file(SegyFile::from_bytes(SegyBuilder::new(5, 4).traces(&ramp(2, 4)).build()).unwrap());
    assert!(matches!(segy.get_trace(3).await, Err(SegyError::TraceOutOfRange { .. })));

    segy.close();
    assert!(segy.inner().is_closed());
    assert!(matches!(segy.get_trace(1).await, Err(SegyError::Closed)));
}
