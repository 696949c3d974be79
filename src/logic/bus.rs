//! Fixed-width buses of signals.
//!
//! This module provides the bus sizes used by the Hack machine:
//! - `Word`: 16 bits, two's complement when read as a number
//! - `Address`: 15 bits, the instruction and data address space
//! - narrower `Bits<N>` for each level of the memory hierarchy
//!
//! Integer conversions exist for the host side of the simulation (loading
//! programs, inspecting results). The circuits themselves never use them.

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use crate::logic::Bit;

/// An ordered, fixed-width group of signals.
///
/// Index 0 is the least significant bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits<const N: usize> {
    bits: [Bit; N],
}

/// A 16-bit word. Bit 15 is the sign bit.
pub type Word = Bits<16>;

/// A 15-bit address into ROM or the memory map.
pub type Address = Bits<15>;

impl<const N: usize> Bits<N> {
    /// Number of signals on the bus.
    pub const WIDTH: usize = N;

    /// A bus with every signal low.
    #[inline]
    pub const fn zero() -> Self {
        Self { bits: [Bit::O; N] }
    }

    /// Create a bus from an array of signals (LSB first).
    #[inline]
    pub const fn from_bits(bits: [Bit; N]) -> Self {
        Self { bits }
    }

    /// Get the underlying signal array.
    #[inline]
    pub const fn bits(&self) -> &[Bit; N] {
        &self.bits
    }

    /// Get a single signal by index (0 = LSB).
    #[inline]
    pub const fn get(&self, index: usize) -> Bit {
        self.bits[index]
    }

    /// Set a single signal by index (0 = LSB).
    #[inline]
    pub fn set(&mut self, index: usize, bit: Bit) {
        self.bits[index] = bit;
    }

    /// Create from an unsigned integer.
    ///
    /// # Panics
    /// Panics if the value does not fit in `N` bits.
    pub fn from_u16(value: u16) -> Self {
        assert!(N <= 16, "Bits<{}> is wider than 16 bits", N);
        assert!(
            u32::from(value) >> N == 0,
            "Value {} out of range for Bits<{}>",
            value, N
        );

        let mut bits = [Bit::O; N];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = Bit::from_u8(((value >> i) & 1) as u8);
        }
        Self { bits }
    }

    /// Convert to an unsigned integer.
    pub fn to_u16(&self) -> u16 {
        debug_assert!(N <= 16);
        self.bits
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, bit)| acc | (u16::from(bit.to_u8()) << i))
    }

    /// Take `M` consecutive signals starting at `start`.
    ///
    /// # Panics
    /// Panics if the range runs past the end of the bus.
    pub fn slice<const M: usize>(&self, start: usize) -> Bits<M> {
        assert!(
            start + M <= N,
            "slice {}..{} out of range for Bits<{}>",
            start, start + M, N
        );
        Bits { bits: std::array::from_fn(|i| self.bits[start + i]) }
    }

    /// Widen to `M` signals, filling the new high signals with low.
    ///
    /// # Panics
    /// Panics if `M` is narrower than `N`.
    pub fn extend<const M: usize>(&self) -> Bits<M> {
        assert!(M >= N, "cannot extend Bits<{}> to Bits<{}>", N, M);
        Bits { bits: std::array::from_fn(|i| if i < N { self.bits[i] } else { Bit::O }) }
    }

    /// Check if every signal is low.
    pub fn is_zero(&self) -> bool {
        self.bits.iter().all(|b| !b.is_high())
    }

    /// Parse from a string of `0`/`1`, most significant bit first.
    ///
    /// Surrounding whitespace and a `0b` prefix are accepted.
    pub fn parse(s: &str) -> Result<Self, BusError> {
        let s = s.trim();
        Self::from_bit_str(s.strip_prefix("0b").unwrap_or(s))
    }

    /// Parse exactly `N` characters of `0`/`1`, most significant bit first.
    pub fn from_bit_str(s: &str) -> Result<Self, BusError> {
        let len = s.chars().count();
        if len != N {
            return Err(BusError::WrongWidth { expected: N, got: len });
        }

        let mut bits = [Bit::O; N];
        for (i, c) in s.chars().rev().enumerate() {
            bits[i] = match c {
                '0' => Bit::O,
                '1' => Bit::I,
                _ => return Err(BusError::InvalidChar(c)),
            };
        }

        Ok(Self { bits })
    }
}

impl Word {
    /// The word with only bit 0 high.
    pub const fn one() -> Self {
        let mut bits = [Bit::O; 16];
        bits[0] = Bit::I;
        Self { bits }
    }

    /// Create from a two's complement integer.
    pub fn from_i16(value: i16) -> Self {
        Self::from_u16(value as u16)
    }

    /// Convert to a two's complement integer.
    pub fn to_i16(&self) -> i16 {
        self.to_u16() as i16
    }
}

impl<const N: usize> Default for Bits<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> std::ops::Index<usize> for Bits<N> {
    type Output = Bit;

    fn index(&self, index: usize) -> &Bit {
        &self.bits[index]
    }
}

impl<const N: usize> TryFrom<&[Bit]> for Bits<N> {
    type Error = BusError;

    fn try_from(slice: &[Bit]) -> Result<Self, Self::Error> {
        let bits: [Bit; N] = slice
            .try_into()
            .map_err(|_| BusError::WrongWidth { expected: N, got: slice.len() })?;
        Ok(Self { bits })
    }
}

impl<const N: usize> fmt::Debug for Bits<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits<{}>(", N)?;
        for i in (0..N).rev() {
            write!(f, "{}", self.bits[i])?;
        }
        write!(f, " = {})", self.to_u16())
    }
}

impl<const N: usize> fmt::Display for Bits<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..N).rev() {
            write!(f, "{}", self.bits[i])?;
        }
        Ok(())
    }
}

impl<const N: usize> Serialize for Bits<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.to_u16())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Bits<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u16::deserialize(deserializer)?;
        if N < 16 && u32::from(value) >> N != 0 {
            return Err(serde::de::Error::custom(format!(
                "value {} does not fit in {} bits",
                value, N
            )));
        }
        Ok(Self::from_u16(value))
    }
}

/// Errors from building a bus out of untyped input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("expected {expected} bits, got {got}")]
    WrongWidth { expected: usize, got: usize },

    #[error("invalid bit character: '{0}' (expected 0 or 1)")]
    InvalidChar(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_zero() {
        let zero = Word::zero();
        assert_eq!(zero.to_u16(), 0);
        assert!(zero.is_zero());
    }

    #[test]
    fn test_word_from_i16() {
        assert_eq!(Word::from_i16(0).to_i16(), 0);
        assert_eq!(Word::from_i16(7).to_i16(), 7);
        assert_eq!(Word::from_i16(-1).to_u16(), 0xFFFF);
        assert_eq!(Word::from_i16(i16::MIN).get(15), Bit::I);
        assert_eq!(Word::from_i16(i16::MAX).get(15), Bit::O);
    }

    #[test]
    fn test_one() {
        assert_eq!(Word::one().to_u16(), 1);
    }

    #[test]
    fn test_address_roundtrip_through_word() {
        for value in 0..=0x7FFFu16 {
            let addr = Address::from_u16(value);
            let word: Word = addr.extend();
            let back: Address = word.slice(0);
            assert_eq!(back, addr);
            assert_eq!(back.to_u16(), value);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_from_u16_rejects_wide_values() {
        let _ = Bits::<3>::from_u16(8);
    }

    #[test]
    fn test_slice() {
        let word = Word::from_u16(0b1010_0000_0000_0110);
        let low: Bits<3> = word.slice(0);
        let high: Bits<3> = word.slice(13);
        assert_eq!(low.to_u16(), 0b110);
        assert_eq!(high.to_u16(), 0b101);
    }

    #[test]
    fn test_from_bit_str_is_strict() {
        assert_eq!(Bits::<4>::from_bit_str("1010").unwrap().to_u16(), 10);
        assert_eq!(Bits::<4>::from_bit_str("0b10"), Err(BusError::InvalidChar('b')));
        assert_eq!(
            Bits::<4>::from_bit_str(" 101"),
            Err(BusError::InvalidChar(' '))
        );
        assert_eq!(Bits::<4>::parse(" 0b1010 ").unwrap().to_u16(), 10);
    }

    #[test]
    fn test_parse() {
        let parsed = Word::parse("1110001100000001").unwrap();
        assert_eq!(parsed.to_u16(), 0b1110_0011_0000_0001);
        assert_eq!(format!("{}", parsed), "1110001100000001");

        assert_eq!(
            Word::parse("101"),
            Err(BusError::WrongWidth { expected: 16, got: 3 })
        );
        assert_eq!(
            Bits::<3>::parse("1x1"),
            Err(BusError::InvalidChar('x'))
        );
    }

    #[test]
    fn test_try_from_slice() {
        let bits = [Bit::I, Bit::O, Bit::I];
        let bus = Bits::<3>::try_from(&bits[..]).unwrap();
        assert_eq!(bus.to_u16(), 0b101);

        assert_eq!(
            Bits::<4>::try_from(&bits[..]),
            Err(BusError::WrongWidth { expected: 4, got: 3 })
        );
    }

    #[test]
    fn test_serde_as_integer() {
        let word = Word::from_u16(1234);
        let json = serde_json::to_string(&word).unwrap();
        assert_eq!(json, "1234");
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);

        assert!(serde_json::from_str::<Bits<3>>("9").is_err());
    }
}
