//! Addressable memory banks.
//!
//! Banks compose recursively: `Ram8` holds eight registers, and every larger
//! bank holds eight (or, for `Ram16K`, four) copies of the bank below it.
//! The low address bits pick a word inside a child, the high bits pick the
//! child. Every child is driven on every call; only its load enable is gated.
//!
//! `FlatRam` is a map-backed stand-in behind the same [`Bank`] trait for
//! callers that need the timing contract without the gate cost.

use std::collections::HashMap;
use std::fmt;
use crate::logic::{Bit, Bits, Word};
use crate::logic::gates::{demux4way, demux8way, mux4way16, mux8way16};
use crate::storage::{Cycle, Register};

/// A word-wide store addressed by `A` bits.
pub trait Bank<const A: usize> {
    /// Number of addressable words.
    const SIZE: usize = 1 << A;

    /// Drive the bank for one cycle.
    ///
    /// Returns the word at `addr` as latched before the edge. When `load` is
    /// high, `input` becomes visible at `addr` from the next cycle on.
    fn apply(&mut self, now: Cycle, input: Word, load: Bit, addr: Bits<A>) -> Word;

    /// Inspect the word at `addr` without driving any cell.
    fn peek(&self, now: Cycle, addr: Bits<A>) -> Word;

    /// Set the contents so that `image[i]` reads back at address `i` at `now`.
    ///
    /// # Panics
    /// Panics if the image is larger than the bank.
    fn preset(&mut self, now: Cycle, image: &[Word]);
}

/// Eight registers behind a three-bit address.
#[derive(Debug, Clone, Default)]
pub struct Ram8 {
    registers: [Register; 8],
}

impl Ram8 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Bank<3> for Ram8 {
    fn apply(&mut self, now: Cycle, input: Word, load: Bit, addr: Bits<3>) -> Word {
        let loads = demux8way(load, addr);
        let mut outs = [Word::zero(); 8];
        for (i, register) in self.registers.iter_mut().enumerate() {
            outs[i] = register.apply(now, loads[i], input);
        }
        mux8way16(&outs, addr)
    }

    fn peek(&self, now: Cycle, addr: Bits<3>) -> Word {
        self.registers[addr.to_u16() as usize].read(now)
    }

    fn preset(&mut self, now: Cycle, image: &[Word]) {
        assert!(image.len() <= 8, "image of {} words does not fit Ram8", image.len());
        for (register, word) in self.registers.iter_mut().zip(image) {
            register.preset(now, *word);
        }
    }
}

macro_rules! ram_bank {
    (
        $(#[$doc:meta])*
        $name:ident: $ways:literal x $child:ident<$child_width:literal>,
        width = $width:literal,
        select = $sel_width:literal,
        $demux:ident, $mux:ident
    ) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            banks: Box<[$child; $ways]>,
        }

        impl $name {
            pub fn new() -> Self {
                Self { banks: Box::new(std::array::from_fn(|_| $child::new())) }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {{ {} x {} }}", stringify!($name), $ways, stringify!($child))
            }
        }

        impl Bank<$width> for $name {
            fn apply(&mut self, now: Cycle, input: Word, load: Bit, addr: Bits<$width>) -> Word {
                let inner: Bits<$child_width> = addr.slice(0);
                let select: Bits<$sel_width> = addr.slice($child_width);
                let loads = $demux(load, select);

                let mut outs = [Word::zero(); $ways];
                for (i, bank) in self.banks.iter_mut().enumerate() {
                    outs[i] = bank.apply(now, input, loads[i], inner);
                }
                $mux(&outs, select)
            }

            fn peek(&self, now: Cycle, addr: Bits<$width>) -> Word {
                let inner: Bits<$child_width> = addr.slice(0);
                let select: Bits<$sel_width> = addr.slice($child_width);
                self.banks[select.to_u16() as usize].peek(now, inner)
            }

            fn preset(&mut self, now: Cycle, image: &[Word]) {
                assert!(
                    image.len() <= <Self as Bank<$width>>::SIZE,
                    "image of {} words does not fit {}",
                    image.len(), stringify!($name)
                );
                let chunk = <$child as Bank<$child_width>>::SIZE;
                for (bank, part) in self.banks.iter_mut().zip(image.chunks(chunk)) {
                    bank.preset(now, part);
                }
            }
        }
    };
}

ram_bank! {
    /// 64 words: eight `Ram8`.
    Ram64: 8 x Ram8<3>, width = 6, select = 3, demux8way, mux8way16
}

ram_bank! {
    /// 512 words: eight `Ram64`.
    Ram512: 8 x Ram64<6>, width = 9, select = 3, demux8way, mux8way16
}

ram_bank! {
    /// 4096 words: eight `Ram512`.
    Ram4K: 8 x Ram512<9>, width = 12, select = 3, demux8way, mux8way16
}

ram_bank! {
    /// 16384 words: four `Ram4K`, filling a 14-bit address space.
    Ram16K: 4 x Ram4K<12>, width = 14, select = 2, demux4way, mux4way16
}

/// A map-backed bank with the same one-cycle write latency.
///
/// Like the gate-level banks, every drive replaces whatever was scheduled
/// earlier in the same cycle, so a later drive with `load` low cancels a
/// write. Contents also read low once the bank has gone more than one edge
/// without a drive. That window is tracked for the bank as a whole rather
/// than per cell, which only differs from the gate-level banks after a
/// partial `preset` into a bank that was driven in the same cycle.
#[derive(Debug, Clone, Default)]
pub struct FlatRam {
    cells: HashMap<u16, Word>,
    pending: Option<(Cycle, u16, Word)>,
    /// Last cycle at which `cells` still read back.
    live_through: Option<Cycle>,
}

impl FlatRam {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a pending write once its edge has passed, and forget
    /// everything once the bank has gone undriven for too long.
    fn settle(&mut self, now: Cycle) {
        if let Some((at, addr, word)) = self.pending {
            if at < now {
                self.cells.insert(addr, word);
                self.pending = None;
            }
        }
        if self.is_stale(now) {
            self.cells.clear();
            self.live_through = None;
        }
    }

    fn is_stale(&self, now: Cycle) -> bool {
        matches!(self.live_through, Some(t) if t < now)
    }

    fn value_at(&self, now: Cycle, addr: u16) -> Word {
        if self.is_stale(now) {
            return Word::zero();
        }
        match self.pending {
            Some((at, pending_addr, word)) if at < now && pending_addr == addr => word,
            _ => self.cells.get(&addr).copied().unwrap_or_default(),
        }
    }
}

impl<const A: usize> Bank<A> for FlatRam {
    fn apply(&mut self, now: Cycle, input: Word, load: Bit, addr: Bits<A>) -> Word {
        self.settle(now);
        let key = addr.to_u16();
        let out = self.value_at(now, key);

        self.pending = if load.is_high() { Some((now, key, input)) } else { None };
        self.live_through = Some(now.next());
        out
    }

    fn peek(&self, now: Cycle, addr: Bits<A>) -> Word {
        self.value_at(now, addr.to_u16())
    }

    fn preset(&mut self, now: Cycle, image: &[Word]) {
        assert!(
            image.len() <= <Self as Bank<A>>::SIZE,
            "image of {} words does not fit FlatRam<{}>",
            image.len(), A
        );
        self.settle(now);
        if matches!(self.pending, Some((_, addr, _)) if usize::from(addr) < image.len()) {
            self.pending = None;
        }
        for (addr, word) in image.iter().enumerate() {
            self.cells.insert(addr as u16, *word);
        }
        self.live_through = Some(self.live_through.map_or(now, |t| t.max(now)));
    }
}
