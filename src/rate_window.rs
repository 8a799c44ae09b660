use std::fmt;
use std::sync::Mutex;

use crate::Instant;
use crate::Rate;
use crate::Sample;

/// Number of samples a [`RateWindow`] retains by default.
pub const DEFAULT_RATE_WINDOW_CAPACITY: usize = 200;

/// A fixed-capacity window over the most recent append-entries events.
///
/// The window retains the last `capacity` [`Sample`]s in insertion order and the running sum of
/// their sizes. Once it is full, every insert evicts exactly the oldest sample. The time span a
/// window covers is therefore not fixed: it shrinks under bursty traffic and grows when traffic
/// is sparse, while memory stays bounded.
///
/// All methods take `&self`: inserts and reads are serialized by one lock that is held only for
/// the index and counter arithmetic.
pub struct RateWindow<I>
where I: Instant
{
    capacity: usize,
    ring: Mutex<Ring<I>>,
}

/// The unsynchronized ring buffer behind a [`RateWindow`].
#[derive(Debug)]
struct Ring<I>
where I: Instant
{
    slots: Box<[Option<Sample<I>>]>,

    /// Slot index of the oldest retained sample.
    front: usize,

    /// Number of retained samples.
    len: usize,

    /// Sum of sizes of the retained samples.
    ///
    /// Wider than a sample size so that `capacity` samples of any size never overflow it.
    total_size: u128,
}

impl<I> Ring<I>
where I: Instant
{
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            front: 0,
            len: 0,
            total_size: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot index of the `nth` retained sample, counting from the oldest.
    fn slot_index(&self, nth: usize) -> usize {
        (self.front + nth) % self.capacity()
    }

    fn push_back(&mut self, sample: Sample<I>) {
        if self.len == self.capacity() {
            if let Some(evicted) = self.slots[self.front].take() {
                self.total_size -= evicted.size() as u128;
            }
            self.front = self.slot_index(1);
            self.len -= 1;
        }

        let back = self.slot_index(self.len);
        self.total_size += sample.size() as u128;
        self.slots[back] = Some(sample);
        self.len += 1;
    }

    fn oldest(&self) -> Option<&Sample<I>> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.front].as_ref()
    }

    fn newest(&self) -> Option<&Sample<I>> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.slot_index(self.len - 1)].as_ref()
    }
}

impl<I> RateWindow<I>
where I: Instant
{
    /// Create an empty window retaining at most `capacity` samples.
    ///
    /// A window always has room for at least one sample: a `capacity` of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            ring: Mutex::new(Ring::new(capacity)),
        }
    }

    /// The max number of samples this window retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Admit one sample, evicting the oldest one if the window is full.
    pub fn insert(&self, sample: Sample<I>) {
        let mut ring = self.ring.lock().unwrap();
        ring.push_back(sample);
    }

    /// Admit a sample of `size` bytes observed now.
    pub fn record(&self, size: u64) {
        self.insert(Sample::now(size));
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.ring.lock().unwrap().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size in bytes of the retained samples, saturated at `u64::MAX`.
    pub fn size(&self) -> u64 {
        let total = self.ring.lock().unwrap().total_size;
        u64::try_from(total).unwrap_or(u64::MAX)
    }

    /// Estimate throughput over the span between the oldest and the newest retained sample.
    ///
    /// Returns the zero [`Rate`] if the window is empty or if all retained samples were observed
    /// at the same instant, e.g., when only one sample is retained.
    pub fn rate(&self) -> Rate {
        let (len, total_size, elapsed) = {
            let ring = self.ring.lock().unwrap();

            let (Some(oldest), Some(newest)) = (ring.oldest(), ring.newest()) else {
                return Rate::default();
            };

            (
                ring.len,
                ring.total_size,
                newest.observed_at().saturating_since(oldest.observed_at()),
            )
        };

        Rate::over(len, total_size, elapsed)
    }

    /// Return a copy of the retained samples, oldest first.
    pub fn samples(&self) -> Vec<Sample<I>> {
        let ring = self.ring.lock().unwrap();
        (0..ring.len).filter_map(|nth| ring.slots[ring.slot_index(nth)]).collect()
    }
}

impl<I> Default for RateWindow<I>
where I: Instant
{
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW_CAPACITY)
    }
}

impl<I> fmt::Debug for RateWindow<I>
where I: Instant
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring.lock().unwrap();
        f.debug_struct("RateWindow")
            .field("capacity", &self.capacity)
            .field("len", &ring.len)
            .field("size", &ring.total_size)
            .finish()
    }
}
