//! The data memory map.
//!
//! | Address       | Bit 14 | Bit 13 | Device   |
//! |---------------|--------|--------|----------|
//! | 0-16383       | 0      | -      | RAM      |
//! | 16384-24575   | 1      | 0      | Screen   |
//! | 24576-32767   | 1      | 1      | Keyboard |
//!
//! The keyboard occupies a single documented address (24576), but the
//! decoder only looks at bits 14 and 13, so every address above it reads
//! the keyboard too.

use crate::logic::{Address, Bit, Word};
use crate::logic::bit::{and, not, or};
use crate::logic::gates::{demux8way, mux16};
use crate::storage::{Bank, Cycle, Ram16K};
use crate::computer::devices::{BitmapScreen, Keyboard, Screen, SharedKeyboard};

/// First screen address.
pub const SCREEN: u16 = 0x4000;
/// The keyboard address.
pub const KBD: u16 = 0x6000;

/// A 15-bit addressed read/write store driven once or twice per cycle.
pub trait DataMemory {
    /// Drive the memory for one cycle. Returns the word at `addr` as latched
    /// before the edge; when `load` is high `input` is stored at `addr`.
    fn fetch(&mut self, now: Cycle, input: Word, load: Bit, addr: Address) -> Word;

    /// Inspect a word without driving anything.
    fn peek(&self, now: Cycle, addr: Address) -> Word;
}

/// RAM, screen and keyboard behind the Hack memory map.
#[derive(Debug, Clone)]
pub struct Memory<R = Ram16K, S = BitmapScreen, K = SharedKeyboard> {
    ram: R,
    screen: S,
    keyboard: K,
    key_sample: Option<(Cycle, Word)>,
}

impl<R: Bank<14>, S: Screen, K: Keyboard> Memory<R, S, K> {
    pub fn new(ram: R, screen: S, keyboard: K) -> Self {
        Self {
            ram,
            screen,
            keyboard,
            key_sample: None,
        }
    }

    pub fn ram(&self) -> &R {
        &self.ram
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    /// Load a power-on RAM image starting at address 0.
    pub fn preset_ram(&mut self, now: Cycle, image: &[Word]) {
        self.ram.preset(now, image);
    }

    /// The key code, read from the device at most once per cycle.
    fn sample_keyboard(&mut self, now: Cycle) -> Word {
        match self.key_sample {
            Some((at, word)) if at == now => word,
            _ => {
                let word = self.keyboard.fetch();
                self.key_sample = Some((now, word));
                word
            }
        }
    }
}

impl<R: Bank<14>, S: Screen, K: Keyboard> DataMemory for Memory<R, S, K> {
    fn fetch(&mut self, now: Cycle, input: Word, load: Bit, addr: Address) -> Word {
        let loads = demux8way(load, addr.slice(12));
        let ram_load = and(load, not(addr.get(14)));
        let screen_load = and(load, or(loads[4], loads[5]));

        let ram_out = self.ram.apply(now, input, ram_load, addr.slice(0));
        let screen_out = self.screen.fetch(now, input, screen_load, addr.slice(0));
        let key = self.sample_keyboard(now);

        mux16(ram_out, mux16(screen_out, key, addr.get(13)), addr.get(14))
    }

    fn peek(&self, now: Cycle, addr: Address) -> Word {
        match (addr.get(14).is_high(), addr.get(13).is_high()) {
            (false, _) => self.ram.peek(now, addr.slice(0)),
            (true, false) => self.screen.peek(now, addr.slice(0)),
            (true, true) => match self.key_sample {
                Some((at, word)) if at == now => word,
                _ => self.keyboard.fetch(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Clock, FlatRam};
    use Bit::{I, O};

    type FlatMemory = Memory<FlatRam, BitmapScreen, SharedKeyboard>;

    fn flat() -> FlatMemory {
        Memory::new(FlatRam::new(), BitmapScreen::new(), SharedKeyboard::new())
    }

    fn write(mem: &mut impl DataMemory, clock: &mut Clock, addr: u16, value: u16) {
        mem.fetch(clock.now(), Word::from_u16(value), I, Address::from_u16(addr));
        clock.advance();
    }

    fn read(mem: &mut impl DataMemory, clock: &Clock, addr: u16) -> u16 {
        mem.fetch(clock.now(), Word::zero(), O, Address::from_u16(addr)).to_u16()
    }

    #[test]
    fn test_ram_and_screen_are_separate() {
        let mut mem = flat();
        let mut clock = Clock::new();

        write(&mut mem, &mut clock, 5, 111);
        write(&mut mem, &mut clock, SCREEN + 5, 222);

        assert_eq!(read(&mut mem, &clock, 5), 111);
        assert_eq!(read(&mut mem, &clock, SCREEN + 5), 222);
        assert_eq!(mem.screen().words()[5], 222);
    }

    #[test]
    fn test_keyboard_region_is_read_only() {
        let mut mem = flat();
        let mut clock = Clock::new();
        let host = mem.keyboard().clone();

        write(&mut mem, &mut clock, KBD, 999);
        assert_eq!(read(&mut mem, &clock, KBD), 0);
        assert_eq!(read(&mut mem, &clock, 0), 0);
        assert!(mem.screen().words().iter().all(|w| *w == 0));

        clock.advance();
        host.press(75);
        assert_eq!(read(&mut mem, &clock, KBD), 75);
        assert_eq!(read(&mut mem, &clock, 0x7FFF), 75);
        assert_eq!(mem.peek(clock.now(), Address::from_u16(KBD)).to_u16(), 75);
    }

    #[test]
    fn test_keyboard_sampled_once_per_cycle() {
        let mut mem = flat();
        let clock = Clock::new();
        let host = mem.keyboard().clone();

        host.press(65);
        assert_eq!(read(&mut mem, &clock, KBD), 65);
        host.press(66);
        assert_eq!(read(&mut mem, &clock, KBD), 65);
    }

    #[test]
    fn test_gate_level_ram_behind_map() {
        let mut mem: Memory = Memory::new(Ram16K::new(), BitmapScreen::new(), SharedKeyboard::new());
        let mut clock = Clock::new();

        write(&mut mem, &mut clock, 16383, 0xBEEF);
        assert_eq!(read(&mut mem, &clock, 16383), 0xBEEF);
        assert_eq!(mem.peek(clock.now(), Address::from_u16(16383)).to_u16(), 0xBEEF);
    }
}
