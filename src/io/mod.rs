mod guard;
mod mmap;
mod open;
mod read;
mod reader;

#[cfg(test)]
pub(crate) mod testing;

pub use guard::Bytes;
pub use mmap::{MemoryMapper, OsMapper};
pub use open::{open, Opener};
pub use read::read_full;
pub use reader::{FromBytes, Reader};
