//! # dbmap - Byte Buffers for Read-Only Database Readers
//!
//! `dbmap` turns an open file into a contiguous, read-only byte buffer and
//! hands it to a database decoder. Native files are memory mapped for
//! zero-copy access; when mapping is unavailable the whole file is read into
//! memory instead. The resulting [`Reader`] owns the buffer and releases any
//! mapping exactly once, either through an explicit [`Reader::close`] or when
//! it is dropped.
//!
//! ## Acquisition
//!
//! 1. The handle's size is queried ([`Stat`]).
//! 2. [`FileHandle::Native`] files are mapped read-only, whole-file, from
//!    offset zero by a [`MemoryMapper`] ([`OsMapper`] by default).
//! 3. If mapping fails, or the handle is a [`FileHandle::Stream`], the file
//!    is read fully into memory ([`read_full`]). With
//!    [`Config::allow_fallback_read`] turned off these cases are errors
//!    instead.
//! 4. The buffer is passed to [`FromBytes::from_bytes`]. If the decoder
//!    fails, any mapping is released before the error is returned.
//!
//! Zero-length files are never mapped: they produce an empty heap buffer on
//! every path.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dbmap::{open, FromBytes, Reader};
//! use std::io::Write;
//!
//! /// Decoder that only records the version byte
//! struct Versioned {
//!     version: u8,
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("empty database")]
//! struct Empty;
//!
//! impl FromBytes for Versioned {
//!     type Error = Empty;
//!
//!     fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
//!         let version = *bytes.first().ok_or(Empty)?;
//!         Ok(Versioned { version })
//!     }
//! }
//!
//! # fn main() -> dbmap::Result<()> {
//! let mut file = tempfile::tempfile().unwrap();
//! file.write_all(&[3, 10, 20, 30]).unwrap();
//!
//! let reader: Reader<Versioned> = open(file)?;
//! assert_eq!(reader.database().version, 3);
//! assert_eq!(&reader.bytes()?[1..], &[10, 20, 30]);
//!
//! // Return the mapping to the system
//! reader.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Strict Mode
//!
//! ```rust
//! use dbmap::{Config, DbMapError, FileHandle, Opener};
//! use std::io::Cursor;
//!
//! # fn main() {
//! let opener = Opener::new(Config::default().allow_fallback_read(false));
//! let stream = FileHandle::stream(Cursor::new(vec![0u8; 2048]));
//!
//! match opener.open::<()>(stream) {
//!     Err(DbMapError::UnsupportedHandle) => println!("stream handles need fallback reads"),
//!     Err(e) => println!("Other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, DbMapError>`. Each variant names the
//! phase that failed and keeps the underlying cause as its source. When a
//! decoder fails and releasing the mapping fails as well, the decode error
//! is the one returned.

mod constructs;
mod error;
mod io;

pub use constructs::{
    AccessPattern, Config, FileHandle, MappedBuffer, SizedReader, Stat, StreamSource,
};
pub use error::{DbMapError, IntoDbMapError, Result};
pub use io::{open, read_full, Bytes, FromBytes, MemoryMapper, Opener, OsMapper, Reader};
