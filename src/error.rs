//! Error handling for the dbmap library.
//!
//! Every failure names the phase it came from (stat, map, read, decode,
//! unmap) and keeps the underlying cause reachable through
//! [`std::error::Error::source`].

use std::error::Error as StdError;
use thiserror::Error;

/// A specialized `Result` type for dbmap operations.
///
/// It's equivalent to `std::result::Result<T, DbMapError>`.
pub type Result<T> = std::result::Result<T, DbMapError>;

/// Error types for acquiring and releasing database buffers.
///
/// # Examples
///
/// ```rust
/// use dbmap::{DbMapError, FileHandle, Opener, Config};
/// use std::io::Cursor;
///
/// # fn main() {
/// // Stream handles are rejected when fallback reads are disabled
/// let handle = FileHandle::stream(Cursor::new(vec![0u8; 16]));
/// let opener = Opener::new(Config::default().allow_fallback_read(false));
///
/// match opener.open::<()>(handle) {
///     Err(DbMapError::UnsupportedHandle) => println!("needs a native file"),
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// # }
/// ```
#[derive(Error, Debug)]
pub enum DbMapError {
    /// The size of the handle could not be determined.
    #[error("failed to get file stats")]
    Stat(#[source] std::io::Error),

    /// The reported size does not fit in the address space or cannot be
    /// allocated for a full read.
    #[error("file size ({0} bytes) exceeds addressable memory")]
    TooLarge(u64),

    /// A stream-only handle was given while fallback reads are disabled.
    #[error("memory mapping requires a native file handle")]
    UnsupportedHandle,

    /// The mapping syscall failed.
    #[error("failed to memory map file")]
    Map(#[source] std::io::Error),

    /// The fallback read returned an I/O error.
    #[error("failed to read file")]
    Read(#[source] std::io::Error),

    /// The fallback read ended before the stat-reported size.
    ///
    /// This usually means the file was truncated between the size query
    /// and the read.
    #[error("failed to read file: expected ({expected}) bytes, read ({actual})")]
    ShortRead { expected: usize, actual: usize },

    /// The decoder rejected the buffer.
    #[error("failed to create reader from bytes")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// Releasing the mapping failed.
    ///
    /// Unmap failures point at misuse or an OS-level fault and are never
    /// retried.
    #[error("failed to unmap file")]
    Unmap(#[source] std::io::Error),

    /// The buffer was accessed after [`Reader::close`](crate::Reader::close).
    #[error("reader has been closed")]
    Closed,
}

/// Trait for converting decoder errors into `DbMapError::Decode`.
///
/// # Examples
///
/// ```rust
/// use dbmap::{DbMapError, IntoDbMapError};
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct BadMagic;
///
/// impl fmt::Display for BadMagic {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "bad magic")
///     }
/// }
///
/// impl std::error::Error for BadMagic {}
///
/// match BadMagic.into_dbmap_error() {
///     DbMapError::Decode(_) => println!("Converted successfully"),
///     _ => unreachable!(),
/// }
/// ```
pub trait IntoDbMapError {
    /// Converts the error into a `DbMapError`.
    fn into_dbmap_error(self) -> DbMapError;
}

impl<E> IntoDbMapError for E
where
    E: StdError + Send + Sync + 'static,
{
    fn into_dbmap_error(self) -> DbMapError {
        DbMapError::Decode(self.into())
    }
}
