use std::{
    fmt,
    fs::File,
    io::{Seek, SeekFrom},
    sync::Arc,
};

use log::{debug, warn};
use memmap2::Mmap;

use crate::{
    io::guard::BufferGuard, read_full, AccessPattern, Config, DbMapError, FileHandle, FromBytes,
    IntoDbMapError, MappedBuffer, MemoryMapper, OsMapper, Reader,
};

/// Opens database files into [`Reader`]s.
///
/// The opener queries the handle's size, maps native files through its
/// [`MemoryMapper`], and (unless [`Config::allow_fallback_read`] is off)
/// reads the whole file into memory when mapping is impossible. The buffer
/// is then passed to [`FromBytes::from_bytes`].
///
/// # Examples
///
/// ```rust
/// use dbmap::{Config, FileHandle, Opener, Reader};
/// use std::io::{Cursor, Write};
///
/// # fn main() -> dbmap::Result<()> {
/// let opener = Opener::new(Config::default());
///
/// // Native files are memory mapped
/// let mut file = tempfile::tempfile().unwrap();
/// file.write_all(&[1u8; 4096]).unwrap();
/// let mapped: Reader<()> = opener.open(file)?;
/// assert!(mapped.has_mapped_file());
///
/// // Streams are read into memory
/// let stream = FileHandle::stream(Cursor::new(vec![2u8; 2048]));
/// let buffered: Reader<()> = opener.open(stream)?;
/// assert!(!buffered.has_mapped_file());
/// assert_eq!(buffered.len(), 2048);
///
/// mapped.close()?;
/// buffered.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Opener {
    config: Config,
    mapper: Arc<dyn MemoryMapper>,
}
impl Opener {
    /// Creates an opener using the default [`OsMapper`].
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mapper: Arc::new(OsMapper::new().populate(config.populate)),
        }
    }

    /// Replaces the mapping primitive.
    pub fn with_mapper(mut self, mapper: Arc<dyn MemoryMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Acquires the contents of `handle` and decodes them as `D`.
    ///
    /// # Errors
    ///
    /// - [`DbMapError::Stat`] / [`DbMapError::TooLarge`] if the size is
    ///   unavailable, unaddressable, or too large to buffer in memory
    /// - [`DbMapError::UnsupportedHandle`] for streams when fallback reads
    ///   are disabled
    /// - [`DbMapError::Map`] when mapping fails and fallback reads are
    ///   disabled
    /// - [`DbMapError::Read`] / [`DbMapError::ShortRead`] when the fallback
    ///   read fails or ends early
    /// - [`DbMapError::Decode`] when the decoder rejects the buffer. Any
    ///   mapping is released first; an unmap failure at that point is
    ///   discarded in favour of the decode error.
    pub fn open<D: FromBytes>(&self, handle: impl Into<FileHandle>) -> crate::Result<Reader<D>> {
        let handle = handle.into();

        let size = handle.size().map_err(DbMapError::Stat)?;
        let len = usize::try_from(size).map_err(|_| DbMapError::TooLarge(size))?;

        let buffer = self.acquire(handle, len)?;

        let database = match D::from_bytes(&buffer) {
            Ok(database) => database,
            Err(e) => {
                if let MappedBuffer::Mapped(map) = buffer {
                    // the decode error is more useful to the caller than this one
                    if let Err(unmap_err) = self.mapper.unmap(map) {
                        debug!("discarding unmap error after decode failure: {}", unmap_err);
                    }
                }
                return Err(e.into_dbmap_error());
            }
        };

        let guard = BufferGuard::new(buffer, self.mapper.clone());
        Ok(Reader::new(database, guard, len))
    }

    fn acquire(&self, handle: FileHandle, len: usize) -> crate::Result<MappedBuffer> {
        match handle {
            FileHandle::Stream(_) if !self.config.allow_fallback_read => {
                Err(DbMapError::UnsupportedHandle)
            }
            _ if len == 0 => {
                debug!("empty database file, skipping mapping");
                Ok(MappedBuffer::Heap(Vec::new()))
            }
            FileHandle::Native(file) => match self.mapper.map(&file, len) {
                Ok(map) => {
                    debug!("mapped {} byte database file", len);
                    self.advise(&map);
                    Ok(MappedBuffer::Mapped(map))
                }
                Err(e) if self.config.allow_fallback_read => {
                    debug!("mapping failed ({}), reading {} bytes instead", e, len);
                    read_native(file, len).map(MappedBuffer::Heap)
                }
                Err(e) => Err(DbMapError::Map(e)),
            },
            FileHandle::Stream(source) => {
                debug!("reading {} byte database stream", len);
                read_full(source, len).map(MappedBuffer::Heap)
            }
        }
    }

    #[cfg(unix)]
    fn advise(&self, map: &Mmap) {
        use memmap2::Advice;

        let advice = match self.config.access_pattern {
            AccessPattern::Normal => return,
            AccessPattern::Random => Advice::Random,
            AccessPattern::Sequential => Advice::Sequential,
        };
        if let Err(e) = map.advise(advice) {
            warn!("failed to set mmap advice: {}", e);
        }
    }

    #[cfg(not(unix))]
    fn advise(&self, _map: &Mmap) {}
}

impl Default for Opener {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for Opener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opener")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Reads a native file from its start, matching the view a mapping gives.
fn read_native(mut file: File, len: usize) -> crate::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0)).map_err(DbMapError::Read)?;
    read_full(file, len)
}

/// Opens `handle` with the default [`Config`] and [`OsMapper`].
///
/// # Examples
///
/// ```rust
/// use dbmap::{open, Reader};
/// use std::io::Write;
///
/// # fn main() -> dbmap::Result<()> {
/// let mut file = tempfile::tempfile().unwrap();
/// file.write_all(b"database contents").unwrap();
///
/// let reader: Reader<()> = open(file)?;
/// assert_eq!(&*reader.bytes()?, b"database contents");
/// reader.close()?;
/// # Ok(())
/// # }
/// ```
pub fn open<D: FromBytes>(handle: impl Into<FileHandle>) -> crate::Result<Reader<D>> {
    Opener::default().open(handle)
}
