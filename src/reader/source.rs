// src/reader/source.rs
use crate::error::Result;
use bytes::Bytes;
use std::fs::File;
use std::io;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Random-access byte source behind a [`SegyFile`](crate::SegyFile)
///
/// Every read names its own offset, so one source can serve concurrent
/// readers without a shared cursor.
pub trait TraceSource: Send + Sync {
    /// Total length of the source in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `offset`; short reads are errors
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;
}

fn out_of_bounds(offset: u64, wanted: usize, len: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!(
            "read of {} bytes at offset {} runs past the end of the {}-byte source",
            wanted, offset, len
        ),
    )
}

/// Operating system file read with positioned reads
pub struct FileSource {
    #[cfg(any(unix, windows))]
    file: File,
    #[cfg(not(any(unix, windows)))]
    file: parking_lot::Mutex<File>,
    len: u64,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(FileSource {
            #[cfg(any(unix, windows))]
            file,
            #[cfg(not(any(unix, windows)))]
            file: parking_lot::Mutex::new(file),
            len,
        })
    }
}

impl TraceSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    #[cfg(unix)]
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)?;
        Ok(())
    }

    #[cfg(windows)]
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        use std::os::windows::fs::FileExt;
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.file.seek_read(&mut buf[filled..], offset + filled as u64) {
                Ok(0) => return Err(out_of_bounds(offset, buf.len(), self.len).into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    #[cfg(not(any(unix, windows)))]
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(())
    }
}

/// In-memory source, for data that is already loaded or received over the wire
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        MemorySource { data: data.into() }
    }
}

impl TraceSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        copy_range(&self.data, offset, buf)
    }
}

/// Memory-mapped file source (requires "mmap" feature)
#[cfg(feature = "mmap")]
pub struct MmapSource {
    mmap: Mmap,
}

#[cfg(feature = "mmap")]
impl MmapSource {
    /// Map a file read-only.
    ///
    /// The file must not be truncated or modified while the map is alive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(MmapSource { mmap })
    }
}

#[cfg(feature = "mmap")]
impl TraceSource for MmapSource {
    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        copy_range(&self.mmap, offset, buf)
    }
}

fn copy_range(data: &[u8], offset: u64, buf: &mut [u8]) -> Result<()> {
    let len = data.len() as u64;
    let end = offset
        .checked_add(buf.len() as u64)
        .filter(|&end| end <= len)
        .ok_or_else(|| out_of_bounds(offset, buf.len(), len))?;
    buf.copy_from_slice(&data[offset as usize..end as usize]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegyError;
    use std::io::Write;

    #[test]
    fn test_memory_source_reads() {
        let source = MemorySource::new((0u8..100).collect::<Vec<_>>());
        assert_eq!(source.len(), 100);

        let mut buf = [0u8; 4];
        source.read_exact_at(10, &mut buf).unwrap();
        assert_eq!(buf, [10, 11, 12, 13]);

        let err = source.read_exact_at(98, &mut buf).unwrap_err();
        match err {
            SegyError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_source_positioned_reads() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&(0u8..=255).collect::<Vec<_>>()).unwrap();
        tmp.flush().unwrap();

        let source = FileSource::open(tmp.path()).unwrap();
        assert_eq!(source.len(), 256);

        let mut a = [0u8; 3];
        let mut b = [0u8; 3];
        source.read_exact_at(200, &mut a).unwrap();
        source.read_exact_at(5, &mut b).unwrap();
        assert_eq!(a, [200, 201, 202]);
        assert_eq!(b, [5, 6, 7]);

        let mut tail = [0u8; 8];
        assert!(source.read_exact_at(252, &mut tail).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = FileSource::open("definitely/not/here.segy").err().unwrap();
        assert!(matches!(err, SegyError::Io(_)));
    }
}
