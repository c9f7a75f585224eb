use std::{
    fmt,
    fs::File,
    io::{self, Cursor, Read},
};

/// Size query for a file-like handle.
pub trait Stat {
    /// Returns the size of the underlying data in bytes.
    fn stat(&self) -> io::Result<u64>;
}

impl Stat for File {
    fn stat(&self) -> io::Result<u64> {
        self.metadata().map(|m| m.len())
    }
}

/// Reports the bytes left from the current position, which is what a read
/// from here can deliver.
impl<T: AsRef<[u8]>> Stat for Cursor<T> {
    fn stat(&self) -> io::Result<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        Ok(len.saturating_sub(self.position()))
    }
}

/// A sequential, size-aware source that cannot be memory mapped.
pub trait StreamSource: Read + Stat + Send {}
impl<T: Read + Stat + Send> StreamSource for T {}

/// Adapts any reader of known length into a [`StreamSource`].
///
/// The length is trusted as-is: if the reader ends early the fallback read
/// reports a short read.
///
/// # Examples
///
/// ```rust
/// use dbmap::{FileHandle, SizedReader};
///
/// let data: &[u8] = b"some bytes";
/// let handle = FileHandle::stream(SizedReader::new(data, 10));
/// assert!(!handle.is_native());
/// ```
#[derive(Debug)]
pub struct SizedReader<R> {
    inner: R,
    size: u64,
}
impl<R: Read> SizedReader<R> {
    pub fn new(inner: R, size: u64) -> Self {
        Self { inner, size }
    }
    pub fn into_inner(self) -> R {
        self.inner
    }
}
impl<R: Read> Read for SizedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
impl<R: Read> Stat for SizedReader<R> {
    fn stat(&self) -> io::Result<u64> {
        Ok(self.size)
    }
}

/// Input handle for opening a database.
///
/// The variant decides which acquisition paths are available: only native
/// files can be memory mapped, streams always go through a full read.
pub enum FileHandle {
    /// An OS-backed file exposing a descriptor suitable for mapping.
    Native(File),
    /// An opaque handle supporting only size queries and sequential reads.
    Stream(Box<dyn StreamSource>),
}
impl FileHandle {
    pub fn stream<S: StreamSource + 'static>(source: S) -> Self {
        Self::Stream(Box::new(source))
    }
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
    pub fn size(&self) -> io::Result<u64> {
        match self {
            Self::Native(file) => file.stat(),
            Self::Stream(source) => source.stat(),
        }
    }
}
impl From<File> for FileHandle {
    fn from(file: File) -> Self {
        Self::Native(file)
    }
}
impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(file) => f.debug_tuple("Native").field(file).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_native_size_from_metadata() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&[7u8; 300]).unwrap();

        let handle = FileHandle::from(file);
        assert!(handle.is_native());
        assert_eq!(handle.size().unwrap(), 300);
    }

    #[test]
    fn test_cursor_stream_size() {
        let handle = FileHandle::stream(Cursor::new(vec![1u8; 2048]));
        assert!(!handle.is_native());
        assert_eq!(handle.size().unwrap(), 2048);
    }

    #[test]
    fn test_cursor_size_counts_from_position() {
        let mut cursor = Cursor::new((0..16u8).collect::<Vec<_>>());
        cursor.set_position(8);
        assert_eq!(cursor.stat().unwrap(), 8);

        cursor.set_position(32);
        assert_eq!(cursor.stat().unwrap(), 0);
    }

    #[test]
    fn test_sized_reader_reports_declared_size() {
        let data: &[u8] = &[1, 2, 3];
        let mut reader = SizedReader::new(data, 10);
        assert_eq!(reader.stat().unwrap(), 10);

        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_debug_names_variant() {
        let handle = FileHandle::stream(Cursor::new(Vec::<u8>::new()));
        assert!(format!("{:?}", handle).starts_with("Stream"));
    }
}
