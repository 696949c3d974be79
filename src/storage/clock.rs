//! The discrete cycle counter.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cycle(pub u64);

impl Cycle {
    /// The cycle after this one.
    #[inline]
    pub const fn next(self) -> Cycle {
        Cycle(self.0 + 1)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A monotonically increasing cycle counter.
///
/// `advance` is the only mutation. Storage components never hold a clock;
/// they are handed `now()` on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    now: Cycle,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: Cycle(0) }
    }

    #[inline]
    pub fn now(&self) -> Cycle {
        self.now
    }

    /// Move to the next cycle.
    #[inline]
    pub fn advance(&mut self) {
        self.now = self.now.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_by_one() {
        let mut clock = Clock::new();
        assert_eq!(clock.now(), Cycle(0));
        clock.advance();
        clock.advance();
        assert_eq!(clock.now(), Cycle(2));
        assert!(Cycle(1) < clock.now());
    }
}
