use std::{
    fs::File,
    io::{self, Write},
    sync::atomic::{AtomicUsize, Ordering},
};

use bytemuck::{Pod, Zeroable};
use memmap2::Mmap;
use thiserror::Error;

use crate::{FromBytes, MemoryMapper, OsMapper};

/// Wraps [`OsMapper`] with leak counters and failure injection.
#[derive(Default)]
pub struct CountingMapper {
    maps: AtomicUsize,
    unmaps: AtomicUsize,
    pub fail_map: bool,
    pub fail_unmap: bool,
}
impl CountingMapper {
    pub fn failing_map() -> Self {
        Self {
            fail_map: true,
            ..Default::default()
        }
    }
    pub fn failing_unmap() -> Self {
        Self {
            fail_unmap: true,
            ..Default::default()
        }
    }
    pub fn maps(&self) -> usize {
        self.maps.load(Ordering::SeqCst)
    }
    pub fn unmaps(&self) -> usize {
        self.unmaps.load(Ordering::SeqCst)
    }
    pub fn outstanding(&self) -> usize {
        self.maps() - self.unmaps()
    }
}

impl MemoryMapper for CountingMapper {
    fn map(&self, file: &File, len: usize) -> io::Result<Mmap> {
        if self.fail_map {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "mmap disabled"));
        }
        let map = OsMapper::new().map(file, len)?;
        self.maps.fetch_add(1, Ordering::SeqCst);
        Ok(map)
    }

    fn unmap(&self, map: Mmap) -> io::Result<()> {
        self.unmaps.fetch_add(1, Ordering::SeqCst);
        drop(map);
        if self.fail_unmap {
            return Err(io::Error::other("munmap failed"));
        }
        Ok(())
    }
}

pub const TEST_MAGIC: u32 = 0x424d_4444; // "DDMB"

/// Fixed-layout header at the start of every test database.
#[derive(Copy, Clone, Pod, Zeroable, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct TestHeader {
    pub magic: u32,
    pub record_count: u32,
}
pub const TEST_HEADER_SIZE: usize = std::mem::size_of::<TestHeader>();

#[derive(Error, Debug)]
pub enum TestDbError {
    #[error("buffer too short for header: {0} bytes")]
    TooShort(usize),
    #[error("invalid magic number: {0:#x}")]
    BadMagic(u32),
}

/// Minimal decoder: validates the header and remembers it.
#[derive(Debug)]
pub struct TestDb {
    pub header: TestHeader,
}

impl FromBytes for TestDb {
    type Error = TestDbError;

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < TEST_HEADER_SIZE {
            return Err(TestDbError::TooShort(bytes.len()));
        }
        let header: TestHeader = bytemuck::pod_read_unaligned(&bytes[..TEST_HEADER_SIZE]);
        if header.magic != TEST_MAGIC {
            return Err(TestDbError::BadMagic(header.magic));
        }
        Ok(Self { header })
    }
}

/// Builds a valid test database of exactly `size` bytes.
pub fn test_db_bytes(size: usize) -> Vec<u8> {
    assert!(size >= TEST_HEADER_SIZE);
    let header = TestHeader {
        magic: TEST_MAGIC,
        record_count: (size - TEST_HEADER_SIZE) as u32,
    };
    let mut bytes = bytemuck::bytes_of(&header).to_vec();
    bytes.extend((0..size - TEST_HEADER_SIZE).map(|i| (i % 251) as u8));
    bytes
}

pub fn temp_file_with(content: &[u8]) -> File {
    let mut file = tempfile::tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}
