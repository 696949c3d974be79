//! Instruction stores.
//!
//! [`Rom32K`] is two gate-level [`Ram16K`] banks with the load line tied low,
//! selected by address bit 14. Programs are burned in once at construction.
//! [`FlatRom`] is a plain vector with the same read contract.

use tracing::{event, Level};
use crate::hack::HackError;
use crate::logic::{Address, Bit, Word};
use crate::logic::gates::mux16;
use crate::storage::{Bank, Clock, Ram16K};

/// Maximum program size in words.
pub const ROM_WORDS: usize = 32768;

/// A read-only, 15-bit addressed program memory.
pub trait InstructionStore {
    /// Read the instruction at `addr`.
    fn fetch(&mut self, addr: Address) -> Word;

    /// Inspect the instruction at `addr` without driving anything.
    fn peek(&self, addr: Address) -> Word;

    /// Number of words that were loaded.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Gate-level 32K instruction ROM.
#[derive(Debug, Clone)]
pub struct Rom32K {
    clock: Clock,
    banks: [Ram16K; 2],
    len: usize,
}

impl Rom32K {
    /// Burn a program image into a fresh ROM.
    pub fn from_words(program: &[Word]) -> Result<Self, HackError> {
        if program.len() > ROM_WORDS {
            return Err(HackError::TooLarge { words: program.len() });
        }

        let clock = Clock::new();
        let mut banks = [Ram16K::new(), Ram16K::new()];
        let half = <Ram16K as Bank<14>>::SIZE;
        let (low, high) = program.split_at(program.len().min(half));
        banks[0].preset(clock.now(), low);
        banks[1].preset(clock.now(), high);

        event!(Level::DEBUG, words = program.len(), "burned gate-level ROM");
        Ok(Self { clock, banks, len: program.len() })
    }
}

impl InstructionStore for Rom32K {
    fn fetch(&mut self, addr: Address) -> Word {
        let now = self.clock.now();
        let inner = addr.slice(0);
        let low = self.banks[0].apply(now, Word::zero(), Bit::O, inner);
        let high = self.banks[1].apply(now, Word::zero(), Bit::O, inner);
        self.clock.advance();
        mux16(low, high, addr.get(14))
    }

    fn peek(&self, addr: Address) -> Word {
        let bank = usize::from(addr.get(14).to_u8());
        self.banks[bank].peek(self.clock.now(), addr.slice(0))
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Vector-backed instruction store.
#[derive(Debug, Clone, Default)]
pub struct FlatRom {
    words: Vec<Word>,
}

impl FlatRom {
    pub fn from_words(program: &[Word]) -> Result<Self, HackError> {
        if program.len() > ROM_WORDS {
            return Err(HackError::TooLarge { words: program.len() });
        }
        Ok(Self { words: program.to_vec() })
    }
}

impl InstructionStore for FlatRom {
    fn fetch(&mut self, addr: Address) -> Word {
        self.peek(addr)
    }

    fn peek(&self, addr: Address) -> Word {
        self.words
            .get(addr.to_u16() as usize)
            .copied()
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}
