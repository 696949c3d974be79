//! Memory-mapped peripherals: the screen and the keyboard.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use crate::logic::{Bit, Bits, Word};
use crate::storage::Cycle;

/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 512;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;
/// Words of screen memory.
pub const SCREEN_WORDS: usize = SCREEN_WIDTH * SCREEN_HEIGHT / 16;

/// A 13-bit addressed display buffer.
///
/// Honors the same timing as a memory bank: a word written in one cycle
/// reads back from the next cycle on.
pub trait Screen {
    fn fetch(&mut self, now: Cycle, input: Word, load: Bit, addr: Bits<13>) -> Word;

    /// Inspect a word without driving the screen.
    fn peek(&self, now: Cycle, addr: Bits<13>) -> Word;
}

/// A read-only key code source. Zero means no key is pressed.
pub trait Keyboard {
    fn fetch(&self) -> Word;
}

/// A plain bitmap screen, one `u16` per 16 pixels.
#[derive(Debug, Clone)]
pub struct BitmapScreen {
    words: Vec<u16>,
    pending: Option<(Cycle, usize, u16)>,
}

impl BitmapScreen {
    pub fn new() -> Self {
        Self {
            words: vec![0; SCREEN_WORDS],
            pending: None,
        }
    }

    fn settle(&mut self, now: Cycle) {
        if let Some((at, index, value)) = self.pending {
            if at < now {
                self.words[index] = value;
                self.pending = None;
            }
        }
    }

    /// Committed screen memory, row-major, 32 words per row.
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Whether the pixel at column `x`, row `y` is black.
    ///
    /// Bit 0 of each word is its leftmost pixel.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let word = self.words[y * SCREEN_WIDTH / 16 + x / 16];
        (word >> (x % 16)) & 1 == 1
    }

    /// Render as braille text, one character per 2x4 pixel cell.
    pub fn render_braille(&self) -> Vec<String> {
        // Dot bit for (dx, dy) within a braille cell.
        const DOTS: [[u32; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

        (0..SCREEN_HEIGHT / 4)
            .map(|row| {
                (0..SCREEN_WIDTH / 2)
                    .map(|col| {
                        let mut bits = 0u32;
                        for (dx, column) in DOTS.iter().enumerate() {
                            for (dy, dot) in column.iter().enumerate() {
                                if self.pixel(col * 2 + dx, row * 4 + dy) {
                                    bits |= dot;
                                }
                            }
                        }
                        char::from_u32(0x2800 + bits).unwrap_or(' ')
                    })
                    .collect()
            })
            .collect()
    }

    /// Blank the screen.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.pending = None;
    }
}

impl Default for BitmapScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for BitmapScreen {
    fn fetch(&mut self, now: Cycle, input: Word, load: Bit, addr: Bits<13>) -> Word {
        self.settle(now);
        let index = addr.to_u16() as usize;
        let out = self.peek(now, addr);

        // Every drive replaces whatever was scheduled earlier this cycle.
        self.pending = if load.is_high() { Some((now, index, input.to_u16())) } else { None };
        out
    }

    fn peek(&self, now: Cycle, addr: Bits<13>) -> Word {
        let index = addr.to_u16() as usize;
        match self.pending {
            Some((at, i, value)) if at < now && i == index => Word::from_u16(value),
            _ => Word::from_u16(self.words[index]),
        }
    }
}

/// Hack key codes for keys that are not printable ASCII.
pub mod keys {
    pub const NEWLINE: u16 = 128;
    pub const BACKSPACE: u16 = 129;
    pub const LEFT: u16 = 130;
    pub const UP: u16 = 131;
    pub const RIGHT: u16 = 132;
    pub const DOWN: u16 = 133;
    pub const HOME: u16 = 134;
    pub const END: u16 = 135;
    pub const PAGE_UP: u16 = 136;
    pub const PAGE_DOWN: u16 = 137;
    pub const INSERT: u16 = 138;
    pub const DELETE: u16 = 139;
    pub const ESCAPE: u16 = 140;

    /// Code for function key `Fn`, 1 through 12.
    pub fn function(n: u8) -> Option<u16> {
        (1..=12).contains(&n).then(|| 140 + u16::from(n))
    }

    /// Code for a character, if it is printable ASCII.
    pub fn printable(c: char) -> Option<u16> {
        (' '..='~').contains(&c).then(|| c as u16)
    }
}

/// A keyboard whose key code can be set from another thread.
///
/// Clones share the same key state.
#[derive(Debug, Clone, Default)]
pub struct SharedKeyboard {
    code: Arc<AtomicU16>,
}

impl SharedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold down the key with the given Hack code.
    pub fn press(&self, code: u16) {
        self.code.store(code, Ordering::Relaxed);
    }

    /// Release whatever key is held.
    pub fn release(&self) {
        self.code.store(0, Ordering::Relaxed);
    }

    pub fn current(&self) -> u16 {
        self.code.load(Ordering::Relaxed)
    }
}

impl Keyboard for SharedKeyboard {
    fn fetch(&self) -> Word {
        Word::from_u16(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bit::{I, O};

    #[test]
    fn test_screen_write_visible_next_cycle() {
        let mut screen = BitmapScreen::new();
        let addr = Bits::<13>::from_u16(33);
        let w = Word::from_u16(0b101);

        assert_eq!(screen.fetch(Cycle(0), w, I, addr), Word::zero());
        assert_eq!(screen.peek(Cycle(0), addr), Word::zero());
        assert_eq!(screen.fetch(Cycle(1), Word::zero(), O, addr), w);

        // Row 1, second word: pixels 16 and 18
        assert!(screen.pixel(16, 1));
        assert!(!screen.pixel(17, 1));
        assert!(screen.pixel(18, 1));
        assert!(!screen.pixel(0, 1));
        assert!(!screen.pixel(16, 0));
    }

    #[test]
    fn test_screen_first_word_of_row() {
        let mut screen = BitmapScreen::new();
        let addr = Bits::<13>::from_u16(32);
        screen.fetch(Cycle(0), Word::from_u16(0b101), I, addr);
        screen.fetch(Cycle(1), Word::zero(), O, addr);

        assert!(screen.pixel(0, 1));
        assert!(!screen.pixel(1, 1));
        assert!(screen.pixel(2, 1));
        assert!(!screen.pixel(0, 0));
    }

    #[test]
    fn test_screen_later_drive_cancels_write() {
        let mut screen = BitmapScreen::new();
        let target = Bits::<13>::from_u16(7);
        let elsewhere = Bits::<13>::from_u16(900);

        screen.fetch(Cycle(0), Word::from_u16(0xFFFF), I, target);
        screen.fetch(Cycle(0), Word::zero(), O, elsewhere);

        assert_eq!(screen.fetch(Cycle(1), Word::zero(), O, target), Word::zero());
        assert_eq!(screen.words()[7], 0);
    }

    #[test]
    fn test_braille_dimensions() {
        let mut screen = BitmapScreen::new();
        screen.fetch(Cycle(0), Word::from_u16(1), I, Bits::zero());
        screen.fetch(Cycle(1), Word::zero(), O, Bits::zero());

        let rows = screen.render_braille();
        assert_eq!(rows.len(), 64);
        assert_eq!(rows[0].chars().count(), 256);
        assert_eq!(rows[0].chars().next(), Some('\u{2801}'));
        assert_eq!(rows[1].chars().next(), Some('\u{2800}'));
    }

    #[test]
    fn test_keyboard_shared_between_clones() {
        let kb = SharedKeyboard::new();
        let host = kb.clone();
        assert!(kb.fetch().is_zero());
        host.press(keys::NEWLINE);
        assert_eq!(kb.fetch().to_u16(), 128);
        host.release();
        assert!(kb.fetch().is_zero());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(keys::function(1), Some(141));
        assert_eq!(keys::function(12), Some(152));
        assert_eq!(keys::function(13), None);
        assert_eq!(keys::printable('A'), Some(65));
        assert_eq!(keys::printable('\n'), None);
    }
}
