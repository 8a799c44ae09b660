use std::fmt::Debug;
use std::ops::Add;
use std::ops::Sub;
use std::time::Duration;

/// A measurement of a monotonically non-decreasing clock.
///
/// Statistics are generic over the clock so that they can be driven by
/// `std::time::Instant` in production and by tokio's pausable clock in tests.
pub trait Instant:
    Add<Duration, Output = Self>
    + Clone
    + Copy
    + Debug
    + Eq
    + Ord
    + PartialEq
    + PartialOrd
    + Send
    + Sub<Duration, Output = Self>
    + Sub<Self, Output = Duration>
    + Sync
    + Unpin
    + 'static
{
    /// Return the current instant.
    fn now() -> Self;

    /// Return the time elapsed from `earlier` to `self`, or zero if `earlier` is later.
    fn saturating_since(&self, earlier: Self) -> Duration {
        if *self > earlier {
            *self - earlier
        } else {
            Duration::ZERO
        }
    }
}

pub type TokioInstant = tokio::time::Instant;

impl Instant for tokio::time::Instant {
    #[inline]
    fn now() -> Self {
        tokio::time::Instant::now()
    }
}

impl Instant for std::time::Instant {
    #[inline]
    fn now() -> Self {
        Self::now()
    }
}
