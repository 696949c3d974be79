//! Single binary signals and the gates derived from NAND.
//!
//! `nand` is the only primitive. Every other gate in this crate is built
//! from it, either directly or through gates defined earlier in this file.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A single two-valued signal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Bit {
    /// Low (0)
    #[default]
    O = 0,
    /// High (1)
    I = 1,
}

impl Bit {
    /// Both signal values in order: O, I
    pub const ALL: [Bit; 2] = [Bit::O, Bit::I];

    /// Create a signal from a host boolean.
    #[inline]
    pub const fn from_bool(value: bool) -> Self {
        if value { Bit::I } else { Bit::O }
    }

    /// Convert to a host boolean.
    #[inline]
    pub const fn to_bool(self) -> bool {
        matches!(self, Bit::I)
    }

    /// Create a signal from 0 or 1.
    ///
    /// # Panics
    /// Panics if value is not 0 or 1.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Bit::O,
            1 => Bit::I,
            _ => panic!("Invalid bit value: {} (must be 0 or 1)", value),
        }
    }

    /// Convert to 0 or 1.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns true if the signal is high.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Bit::I)
    }
}

impl fmt::Debug for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::O => write!(f, "O"),
            Bit::I => write!(f, "I"),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::O => write!(f, "0"),
            Bit::I => write!(f, "1"),
        }
    }
}

impl std::ops::Not for Bit {
    type Output = Self;

    fn not(self) -> Self::Output {
        not(self)
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        Bit::from_bool(value)
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit.to_bool()
    }
}

/// The primitive gate: low only when both inputs are high.
#[inline]
pub fn nand(a: Bit, b: Bit) -> Bit {
    match (a, b) {
        (Bit::I, Bit::I) => Bit::O,
        _ => Bit::I,
    }
}

#[inline]
pub fn not(a: Bit) -> Bit {
    nand(a, a)
}

#[inline]
pub fn and(a: Bit, b: Bit) -> Bit {
    not(nand(a, b))
}

#[inline]
pub fn or(a: Bit, b: Bit) -> Bit {
    nand(not(a), not(b))
}

#[inline]
pub fn xor(a: Bit, b: Bit) -> Bit {
    or(and(not(a), b), and(a, not(b)))
}

/// Selects `a` when `sel` is low and `b` when `sel` is high.
#[inline]
pub fn mux(a: Bit, b: Bit, sel: Bit) -> Bit {
    nand(nand(a, not(sel)), nand(b, sel))
}

/// Routes `input` to output 0 when `sel` is low and to output 1 when `sel`
/// is high. The unselected output is always low.
#[inline]
pub fn demux(input: Bit, sel: Bit) -> [Bit; 2] {
    [and(input, not(sel)), and(input, sel)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bit::{I, O};

    #[test]
    fn test_nand_truth_table() {
        assert_eq!(nand(O, O), I);
        assert_eq!(nand(O, I), I);
        assert_eq!(nand(I, O), I);
        assert_eq!(nand(I, I), O);
    }

    #[test]
    fn test_not_truth_table() {
        assert_eq!(not(O), I);
        assert_eq!(not(I), O);
        assert_eq!(!I, O);
    }

    #[test]
    fn test_binary_gates_match_host_logic() {
        for a in Bit::ALL {
            for b in Bit::ALL {
                let (x, y) = (a.to_bool(), b.to_bool());
                assert_eq!(and(a, b).to_bool(), x && y, "and({:?}, {:?})", a, b);
                assert_eq!(or(a, b).to_bool(), x || y, "or({:?}, {:?})", a, b);
                assert_eq!(xor(a, b).to_bool(), x != y, "xor({:?}, {:?})", a, b);
            }
        }
    }

    #[test]
    fn test_mux_truth_table() {
        for a in Bit::ALL {
            for b in Bit::ALL {
                assert_eq!(mux(a, b, O), a);
                assert_eq!(mux(a, b, I), b);
            }
        }
    }

    #[test]
    fn test_demux_truth_table() {
        assert_eq!(demux(O, O), [O, O]);
        assert_eq!(demux(O, I), [O, O]);
        assert_eq!(demux(I, O), [I, O]);
        assert_eq!(demux(I, I), [O, I]);
    }

    #[test]
    fn test_u8_roundtrip() {
        for b in Bit::ALL {
            assert_eq!(Bit::from_u8(b.to_u8()), b);
        }
    }
}
