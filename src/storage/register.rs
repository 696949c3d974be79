//! Latches, registers and the program counter.

use crate::logic::{Bit, Bits, Word};
use crate::logic::arith::inc16;
use crate::logic::gates::mux16;
use crate::storage::{Cycle, Dff};

/// A loadable one-bit storage element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latch {
    dff: Dff,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn apply(&mut self, now: Cycle, load: Bit, value: Bit) -> Bit {
        self.dff.apply(now, load, value)
    }

    #[inline]
    pub fn read(&self, now: Cycle) -> Bit {
        self.dff.read(now)
    }

    #[inline]
    pub fn preset(&mut self, now: Cycle, value: Bit) {
        self.dff.preset(now, value);
    }
}

/// Sixteen latches sharing one load signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    latches: [Latch; 16],
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive every bit for one cycle. Returns the word current before the edge.
    pub fn apply(&mut self, now: Cycle, load: Bit, input: Word) -> Word {
        let mut out = [Bit::O; 16];
        for (i, latch) in self.latches.iter_mut().enumerate() {
            out[i] = latch.apply(now, load, input.get(i));
        }
        Bits::from_bits(out)
    }

    /// The word current at `now`, without driving the latches.
    pub fn read(&self, now: Cycle) -> Word {
        Bits::from_bits(std::array::from_fn(|i| self.latches[i].read(now)))
    }

    pub fn preset(&mut self, now: Cycle, value: Word) {
        for (i, latch) in self.latches.iter_mut().enumerate() {
            latch.preset(now, value.get(i));
        }
    }
}

/// A register with reset, load and increment inputs.
///
/// Priority is reset, then load, then increment, then hold. The inner
/// register is loaded every cycle with the value the priority chain selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramCounter {
    register: Register,
}

impl ProgramCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive the counter for one cycle. Returns the count current before the edge.
    pub fn apply(&mut self, now: Cycle, input: Word, load: Bit, inc: Bit, reset: Bit) -> Word {
        let hold = self.register.read(now);
        let incremented = inc16(hold);
        let after_inc = mux16(hold, incremented, inc);
        let after_load = mux16(after_inc, input, load);
        let value = mux16(after_load, Word::zero(), reset);
        self.register.apply(now, Bit::I, value)
    }

    pub fn read(&self, now: Cycle) -> Word {
        self.register.read(now)
    }
}
