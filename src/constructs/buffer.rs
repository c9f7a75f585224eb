use std::ops::Deref;

use memmap2::Mmap;

/// Immutable byte region backing a [`Reader`](crate::Reader).
///
/// The length is fixed when the buffer is acquired and matches the file
/// size observed at that moment.
#[derive(Debug)]
pub enum MappedBuffer {
    /// Read-only view mapped by a [`MemoryMapper`](crate::MemoryMapper).
    Mapped(Mmap),
    /// Bytes owned on the heap (fallback reads and in-memory readers).
    Heap(Vec<u8>),
}
impl MappedBuffer {
    /// Returns true if the buffer must be released through a mapper.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }
}

impl Deref for MappedBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(map) => map,
            Self::Heap(bytes) => bytes,
        }
    }
}

impl From<Vec<u8>> for MappedBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Heap(bytes)
    }
}
