mod buffer;
mod config;
mod handle;

pub use buffer::MappedBuffer;
pub use config::{AccessPattern, Config};
pub use handle::{FileHandle, SizedReader, Stat, StreamSource};
