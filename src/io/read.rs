use std::io::{ErrorKind, Read};

use crate::DbMapError;

/// Reads exactly `size` bytes from `inner` into a fresh heap buffer.
///
/// Reads are retried on [`ErrorKind::Interrupted`]. A source that ends before
/// `size` bytes yields [`DbMapError::ShortRead`]; any other I/O failure
/// yields [`DbMapError::Read`]. Bytes past `size` are never consumed.
/// A `size` the allocator cannot satisfy yields [`DbMapError::TooLarge`]
/// before anything is read.
///
/// # Examples
///
/// ```rust
/// use dbmap::{read_full, DbMapError};
///
/// # fn main() -> dbmap::Result<()> {
/// let data: &[u8] = &[1, 2, 3, 4];
/// assert_eq!(read_full(data, 4)?, vec![1, 2, 3, 4]);
///
/// let short: &[u8] = &[1, 2];
/// assert!(matches!(
///     read_full(short, 4),
///     Err(DbMapError::ShortRead { expected: 4, actual: 2 })
/// ));
/// # Ok(())
/// # }
/// ```
pub fn read_full<R: Read>(mut inner: R, size: usize) -> crate::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| DbMapError::TooLarge(size as u64))?;
    buffer.resize(size, 0);

    let mut read = 0;
    while read < buffer.len() {
        match inner.read(&mut buffer[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DbMapError::Read(e)),
        }
    }
    if read < size {
        return Err(DbMapError::ShortRead {
            expected: size,
            actual: read,
        });
    }
    Ok(buffer)
}
