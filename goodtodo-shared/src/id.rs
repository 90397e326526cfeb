/// Identifier generation
///
/// Interactors draw every new id (tenants, users, todos, verification tokens)
/// from an [`IdGenerator`] so tests can make them deterministic.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// Random UUID v4 generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator yielding `prefix-0000-4000-8000-<counter>` style ids
///
/// The high 32 bits are a fixed prefix so ids from distinct generators never
/// collide in the same test.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    prefix: u32,
    next: AtomicU64,
}

impl SequenceIdGenerator {
    pub fn new(prefix: u32) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let value = ((self.prefix as u128) << 96) | (0x4000u128 << 64) | (0x8000u128 << 48) | n as u128;
        Uuid::from_u128(value)
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Arc<T> {
    fn generate(&self) -> Uuid {
        (**self).generate()
    }
}
