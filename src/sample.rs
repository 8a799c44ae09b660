use crate::Instant;

/// A single observed append-entries event: when it was seen and how many bytes it carried.
///
/// A `Sample` is never mutated after it is built; a [`RateWindow`](crate::RateWindow) replaces
/// the slot holding it on eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample<I>
where I: Instant
{
    observed_at: I,
    size: u64,
}

impl<I> Sample<I>
where I: Instant
{
    pub fn new(observed_at: I, size: u64) -> Self {
        Self { observed_at, size }
    }

    /// Build a sample observed right now.
    pub fn now(size: u64) -> Self {
        Self::new(I::now(), size)
    }

    pub fn observed_at(&self) -> I {
        self.observed_at
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}
