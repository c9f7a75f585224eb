//! Read-only database reader over an acquired byte buffer.

use std::{convert::Infallible, error::Error as StdError, fmt};

use crate::{io::guard::BufferGuard, Bytes, IntoDbMapError};

/// Constructor interface implemented by database decoders.
///
/// `from_bytes` is called exactly once per open with the complete file
/// contents. The decoder keeps whatever it needs to answer lookups (header
/// fields, section offsets, tree roots) and reads record data later through
/// [`Reader::bytes`].
///
/// # Examples
///
/// ```rust
/// use dbmap::{FromBytes, Reader};
///
/// struct Magic(u32);
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("buffer shorter than 4 bytes")]
/// struct TooShort;
///
/// impl FromBytes for Magic {
///     type Error = TooShort;
///
///     fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
///         let head: [u8; 4] = bytes.get(..4).ok_or(TooShort)?.try_into().unwrap();
///         Ok(Magic(u32::from_le_bytes(head)))
///     }
/// }
///
/// # fn main() -> dbmap::Result<()> {
/// let reader: Reader<Magic> = Reader::from_bytes(vec![1, 0, 0, 0, 9, 9])?;
/// assert_eq!(reader.database().0, 1);
/// # Ok(())
/// # }
/// ```
pub trait FromBytes: Sized {
    type Error: StdError + Send + Sync + 'static;

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// Accepts any buffer; useful when only the raw bytes are needed.
impl FromBytes for () {
    type Error = Infallible;

    fn from_bytes(_bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(())
    }
}

/// A decoded database together with the buffer backing it.
///
/// The buffer is either a memory mapping or a heap copy of the file (see
/// [`has_mapped_file`](Self::has_mapped_file)). Mapped buffers should be
/// released with [`close`](Self::close); dropping the reader releases them
/// too, but only when the last owner goes away.
///
/// `Reader` is `Send + Sync` whenever `D` is. Any number of threads may
/// borrow [`bytes`](Self::bytes) at once; `close` waits for those borrows to
/// end, so calling it while the same thread still holds one deadlocks.
/// [`has_mapped_file`](Self::has_mapped_file) and
/// [`is_closed`](Self::is_closed) never wait on the buffer lock.
///
/// # Examples
///
/// ```rust
/// use dbmap::{open, DbMapError, Reader};
/// use std::io::Write;
///
/// # fn main() -> dbmap::Result<()> {
/// let mut file = tempfile::tempfile().unwrap();
/// file.write_all(&[0u8; 4096]).unwrap();
///
/// let reader: Reader<()> = open(file)?;
/// assert_eq!(reader.len(), 4096);
/// assert_eq!(reader.bytes()?.len(), 4096);
///
/// reader.close()?;
/// reader.close()?; // no-op
/// assert!(matches!(reader.bytes(), Err(DbMapError::Closed)));
/// # Ok(())
/// # }
/// ```
pub struct Reader<D> {
    /// Value produced by the decoder
    database: D,

    /// Owner of the backing buffer
    guard: BufferGuard,

    /// Buffer length fixed at acquisition time
    len: usize,
}
impl<D> Reader<D> {
    pub(crate) fn new(database: D, guard: BufferGuard, len: usize) -> Self {
        Self {
            database,
            guard,
            len,
        }
    }

    /// Returns the decoded database.
    pub fn database(&self) -> &D {
        &self.database
    }

    /// Borrows the backing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DbMapError::Closed`](crate::DbMapError::Closed) once the
    /// reader has been closed.
    pub fn bytes(&self) -> crate::Result<Bytes<'_>> {
        self.guard.bytes()
    }

    /// Length of the buffer as observed when the file was opened.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true while the buffer is an OS mapping awaiting release.
    pub fn has_mapped_file(&self) -> bool {
        self.guard.has_mapped_file()
    }

    pub fn is_closed(&self) -> bool {
        self.guard.is_closed()
    }

    /// Releases the resources used by the database.
    ///
    /// Mapped buffers are unmapped; heap buffers are dropped. Either way the
    /// buffer is invalidated and later [`bytes`](Self::bytes) calls fail.
    /// Calling `close` again does nothing and returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns [`DbMapError::Unmap`](crate::DbMapError::Unmap) if the mapper
    /// fails to release the mapping. The mapping is considered released
    /// regardless and is not retried.
    pub fn close(&self) -> crate::Result<()> {
        self.guard.close()
    }
}

impl<D: FromBytes> Reader<D> {
    /// Builds a reader over bytes already in memory.
    ///
    /// The buffer is never mapped, so [`close`](Self::close) only invalidates
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`DbMapError::Decode`](crate::DbMapError::Decode) if the
    /// decoder rejects the bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> crate::Result<Self> {
        let database = D::from_bytes(&bytes).map_err(IntoDbMapError::into_dbmap_error)?;
        let len = bytes.len();
        Ok(Self::new(database, BufferGuard::heap(bytes), len))
    }
}

impl<D: fmt::Debug> fmt::Debug for Reader<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("database", &self.database)
            .field("len", &self.len)
            .field("has_mapped_file", &self.has_mapped_file())
            .field("closed", &self.is_closed())
            .finish()
    }
}
