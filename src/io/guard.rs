use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{debug, warn};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::{DbMapError, MappedBuffer, MemoryMapper};

/// Shared borrow of a reader's bytes.
///
/// Holding one blocks [`Reader::close`](crate::Reader::close) until it is
/// dropped.
pub type Bytes<'a> = MappedRwLockReadGuard<'a, [u8]>;

/// Owns a reader's buffer and releases it exactly once.
///
/// `close` and `Drop` both go through the write lock and `Option::take`, so
/// whichever runs first performs the release and every later call sees
/// `None`. The state flags live outside the lock so querying them never
/// queues behind a pending `close`.
pub(crate) struct BufferGuard {
    buffer: RwLock<Option<MappedBuffer>>,
    mapper: Option<Arc<dyn MemoryMapper>>,
    mapped: AtomicBool,
    closed: AtomicBool,
}
impl BufferGuard {
    /// Mapped buffers must come through [`BufferGuard::new`] so they have a
    /// mapper to return to.
    pub fn heap(bytes: Vec<u8>) -> Self {
        Self {
            buffer: RwLock::new(Some(MappedBuffer::Heap(bytes))),
            mapper: None,
            mapped: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// The mapper must be the one that produced `buffer` when it is mapped.
    pub fn new(buffer: MappedBuffer, mapper: Arc<dyn MemoryMapper>) -> Self {
        Self {
            mapped: AtomicBool::new(buffer.is_mapped()),
            closed: AtomicBool::new(false),
            buffer: RwLock::new(Some(buffer)),
            mapper: Some(mapper),
        }
    }

    pub fn has_mapped_file(&self) -> bool {
        self.mapped.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn bytes(&self) -> crate::Result<Bytes<'_>> {
        RwLockReadGuard::try_map(self.buffer.read(), |buffer| buffer.as_deref())
            .map_err(|_| DbMapError::Closed)
    }

    pub fn close(&self) -> crate::Result<()> {
        let taken = {
            let mut buffer = self.buffer.write();
            self.mapped.store(false, Ordering::Release);
            self.closed.store(true, Ordering::Release);
            buffer.take()
        };
        self.release(taken)
    }

    fn release(&self, buffer: Option<MappedBuffer>) -> crate::Result<()> {
        match (buffer, &self.mapper) {
            (Some(MappedBuffer::Mapped(map)), Some(mapper)) => {
                debug!("unmapping {} byte database buffer", map.len());
                mapper.unmap(map).map_err(DbMapError::Unmap)
            }
            // heap buffers are freed by dropping them
            _ => Ok(()),
        }
    }
}

impl Drop for BufferGuard {
    fn drop(&mut self) {
        let taken = self.buffer.get_mut().take();
        if taken.as_ref().is_some_and(MappedBuffer::is_mapped) {
            debug!("reader dropped without close, releasing mapping");
        }
        if let Err(e) = self.release(taken) {
            warn!("failed to release database mapping on drop: {}", e);
        }
    }
}
