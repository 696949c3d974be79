//! Adders and the arithmetic-logic unit.
//!
//! Provides half and full adders, a 16-bit ripple-carry adder with the
//! carry out discarded, an incrementer, and the six-control-bit ALU.

use serde::{Serialize, Deserialize};
use crate::logic::{Bit, Bits, Word};
use crate::logic::bit::{and, not, or, xor};
use crate::logic::gates::{and16, mux16, not16, or16way};

/// Add two bits, returning (sum, carry).
#[inline]
pub fn half_adder(a: Bit, b: Bit) -> (Bit, Bit) {
    (xor(a, b), and(a, b))
}

/// Add three bits, returning (sum, carry).
#[inline]
pub fn full_adder(a: Bit, b: Bit, c: Bit) -> (Bit, Bit) {
    let sum = xor(xor(a, b), c);
    let carry = or(or(and(a, b), and(a, c)), and(b, c));
    (sum, carry)
}

/// Add two words. Overflow wraps.
pub fn add16(a: Word, b: Word) -> Word {
    let mut result = [Bit::O; 16];
    let (sum, mut carry) = half_adder(a.get(0), b.get(0));
    result[0] = sum;

    for i in 1..16 {
        let (sum, next) = full_adder(a.get(i), b.get(i), carry);
        result[i] = sum;
        carry = next;
    }

    Bits::from_bits(result)
}

#[inline]
pub fn inc16(a: Word) -> Word {
    add16(a, Word::one())
}

/// The six ALU control signals, in instruction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AluControl {
    /// Zero the x input.
    pub zx: Bit,
    /// Negate the x input.
    pub nx: Bit,
    /// Zero the y input.
    pub zy: Bit,
    /// Negate the y input.
    pub ny: Bit,
    /// Low: x & y. High: x + y.
    pub f: Bit,
    /// Negate the output.
    pub no: Bit,
}

impl AluControl {
    /// Build from the six-bit `comp` field, `zx` in bit 5 down to `no` in bit 0.
    pub fn from_bits(comp: Bits<6>) -> Self {
        Self {
            zx: comp.get(5),
            nx: comp.get(4),
            zy: comp.get(3),
            ny: comp.get(2),
            f: comp.get(1),
            no: comp.get(0),
        }
    }

    /// Pack back into a six-bit field.
    pub fn to_bits(self) -> Bits<6> {
        Bits::from_bits([self.no, self.f, self.ny, self.zy, self.nx, self.zx])
    }
}

/// Compute `out` from x and y under `ctl`, returning (out, zr, ng).
pub fn alu(x: Word, y: Word, ctl: AluControl) -> (Word, Bit, Bit) {
    let x = mux16(x, Word::zero(), ctl.zx);
    let x = mux16(x, not16(x), ctl.nx);
    let y = mux16(y, Word::zero(), ctl.zy);
    let y = mux16(y, not16(y), ctl.ny);

    let out = mux16(and16(x, y), add16(x, y), ctl.f);
    let out = mux16(out, not16(out), ctl.no);

    let zr = not(or16way(out));
    let ng = out.get(15);
    (out, zr, ng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bit::{I, O};

    fn ctl(bits: u16) -> AluControl {
        AluControl::from_bits(Bits::from_u16(bits))
    }

    #[test]
    fn test_half_adder() {
        assert_eq!(half_adder(O, O), (O, O));
        assert_eq!(half_adder(O, I), (I, O));
        assert_eq!(half_adder(I, O), (I, O));
        assert_eq!(half_adder(I, I), (O, I));
    }

    #[test]
    fn test_full_adder_exhaustive() {
        for a in Bit::ALL {
            for b in Bit::ALL {
                for c in Bit::ALL {
                    let total = a.to_u8() + b.to_u8() + c.to_u8();
                    let (sum, carry) = full_adder(a, b, c);
                    assert_eq!(sum.to_u8(), total & 1);
                    assert_eq!(carry.to_u8(), total >> 1);
                }
            }
        }
    }

    #[test]
    fn test_add16_overflow_wraps() {
        let all_high = Word::from_u16(0xFFFF);
        assert!(add16(all_high, Word::one()).is_zero());
        assert_eq!(inc16(Word::from_i16(i16::MAX)).to_i16(), i16::MIN);
    }

    #[test]
    fn test_alu_comp_table() {
        let x = Word::from_i16(17);
        let y = Word::from_i16(5);
        let cases: [(u16, i16); 18] = [
            (0b101010, 0),
            (0b111111, 1),
            (0b111010, -1),
            (0b001100, 17),
            (0b110000, 5),
            (0b001101, !17),
            (0b110001, !5),
            (0b001111, -17),
            (0b110011, -5),
            (0b011111, 18),
            (0b110111, 6),
            (0b001110, 16),
            (0b110010, 4),
            (0b000010, 22),
            (0b010011, 12),
            (0b000111, -12),
            (0b000000, 17 & 5),
            (0b010101, 17 | 5),
        ];

        for (comp, expected) in cases {
            let (out, _, _) = alu(x, y, ctl(comp));
            assert_eq!(out.to_i16(), expected, "comp {:06b}", comp);
        }
    }

    #[test]
    fn test_alu_flags() {
        let (out, zr, ng) = alu(Word::from_i16(3), Word::from_i16(3), ctl(0b010011));
        assert!(out.is_zero());
        assert_eq!((zr, ng), (I, O));

        let (_, zr, ng) = alu(Word::from_i16(2), Word::from_i16(3), ctl(0b010011));
        assert_eq!((zr, ng), (O, I));
    }

    #[test]
    fn test_control_bits_roundtrip() {
        for comp in 0..64u16 {
            assert_eq!(ctl(comp).to_bits().to_u16(), comp);
        }
    }
}
