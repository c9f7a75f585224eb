use std::{fs::File, io};

use memmap2::{Mmap, MmapOptions};

/// Platform primitive for read-only file mappings.
///
/// Implementations must map the whole requested length, read-only, starting
/// at offset zero. Every view returned from [`map`](Self::map) is handed back
/// to [`unmap`](Self::unmap) exactly once by the reader that owns it.
///
/// The mapping does not protect against the file being truncated or
/// rewritten by another process; touching pages past a truncated end is an
/// environmental fault outside of this crate's control.
pub trait MemoryMapper: Send + Sync {
    /// Maps `len` bytes of `file` starting at offset zero.
    fn map(&self, file: &File, len: usize) -> io::Result<Mmap>;

    /// Releases a view previously returned by [`map`](Self::map).
    fn unmap(&self, map: Mmap) -> io::Result<()>;
}

/// Default [`MemoryMapper`] backed by `memmap2`.
///
/// Zero-length mappings are rejected with [`io::ErrorKind::InvalidInput`].
///
/// # Examples
///
/// ```rust
/// use dbmap::{MemoryMapper, OsMapper};
/// use std::io::Write;
///
/// # fn main() -> std::io::Result<()> {
/// let mut file = tempfile::tempfile()?;
/// file.write_all(b"0123456789")?;
///
/// let mapper = OsMapper::new();
/// let map = mapper.map(&file, 10)?;
/// assert_eq!(&map[..], b"0123456789");
/// mapper.unmap(map)?;
/// # Ok(())
/// # }
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct OsMapper {
    populate: bool,
}
impl OsMapper {
    pub fn new() -> Self {
        Self::default()
    }
    /// Prefault the mapped pages (`MAP_POPULATE`, Linux only).
    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }
}

impl MemoryMapper for OsMapper {
    fn map(&self, file: &File, len: usize) -> io::Result<Mmap> {
        if len == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot map a zero-length file",
            ));
        }
        let mut options = MmapOptions::new();
        options.len(len);
        if self.populate {
            options.populate();
        }
        unsafe { options.map(file) }
    }

    fn unmap(&self, map: Mmap) -> io::Result<()> {
        // memmap2 unmaps on drop and swallows munmap failures
        drop(map);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(content: &[u8]) -> File {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_map_whole_file() {
        let content: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let file = file_with(&content);

        let mapper = OsMapper::new();
        let map = mapper.map(&file, content.len()).unwrap();
        assert_eq!(map.len(), 4096);
        assert_eq!(&map[..], &content[..]);
        mapper.unmap(map).unwrap();
    }

    #[test]
    fn test_map_zero_length_is_rejected() {
        let file = file_with(&[]);
        let err = OsMapper::new().map(&file, 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_map_with_populate() {
        let file = file_with(b"prefaulted");
        let mapper = OsMapper::new().populate(true);
        let map = mapper.map(&file, 10).unwrap();
        assert_eq!(&map[..], b"prefaulted");
    }

    #[test]
    fn test_map_is_read_only_view_of_offset_zero() {
        let file = file_with(b"headerbody");
        let map = OsMapper::new().map(&file, 6).unwrap();
        assert_eq!(&map[..], b"header");
    }
}
