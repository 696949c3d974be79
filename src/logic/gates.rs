//! Word-wide and wide-select gates.
//!
//! Each gate here applies the single-signal gates from [`crate::logic::bit`]
//! per bit position or per selector bit. Selection never branches on the
//! meaning of an input; it is a tree of `mux`/`demux` stages.

use crate::logic::{Bit, Bits, Word};
use crate::logic::bit::{and, demux, mux, not, or};

#[inline]
fn map1(a: Word, f: impl Fn(Bit) -> Bit) -> Word {
    Bits::from_bits(std::array::from_fn(|i| f(a.get(i))))
}

#[inline]
fn map2(a: Word, b: Word, f: impl Fn(Bit, Bit) -> Bit) -> Word {
    Bits::from_bits(std::array::from_fn(|i| f(a.get(i), b.get(i))))
}

// ==================== Element-wise ====================

#[inline]
pub fn not16(a: Word) -> Word {
    map1(a, not)
}

#[inline]
pub fn and16(a: Word, b: Word) -> Word {
    map2(a, b, and)
}

#[inline]
pub fn or16(a: Word, b: Word) -> Word {
    map2(a, b, or)
}

/// Selects `a` when `sel` is low and `b` when `sel` is high, bit by bit.
#[inline]
pub fn mux16(a: Word, b: Word, sel: Bit) -> Word {
    map2(a, b, |x, y| mux(x, y, sel))
}

// ==================== Fan-in ====================

/// High if any of the eight inputs is high.
pub fn or8way(input: Bits<8>) -> Bit {
    let b = input.bits();
    or(
        or(or(b[0], b[1]), or(b[2], b[3])),
        or(or(b[4], b[5]), or(b[6], b[7])),
    )
}

/// High if any bit of the word is high.
pub fn or16way(input: Word) -> Bit {
    or(or8way(input.slice(0)), or8way(input.slice(8)))
}

// ==================== Wide select ====================

/// Four-way word selector. `sel` bit 0 picks within each pair, bit 1 picks the pair.
pub fn mux4way16(inputs: &[Word; 4], sel: Bits<2>) -> Word {
    let low = mux16(inputs[0], inputs[1], sel.get(0));
    let high = mux16(inputs[2], inputs[3], sel.get(0));
    mux16(low, high, sel.get(1))
}

/// Eight-way word selector over a 3-bit selector.
pub fn mux8way16(inputs: &[Word; 8], sel: Bits<3>) -> Word {
    let inner: Bits<2> = sel.slice(0);
    let low = mux4way16(&[inputs[0], inputs[1], inputs[2], inputs[3]], inner);
    let high = mux4way16(&[inputs[4], inputs[5], inputs[6], inputs[7]], inner);
    mux16(low, high, sel.get(2))
}

/// Routes `input` to output `sel`; every other output is low.
pub fn demux4way(input: Bit, sel: Bits<2>) -> [Bit; 4] {
    let [low, high] = demux(input, sel.get(1));
    let [o0, o1] = demux(low, sel.get(0));
    let [o2, o3] = demux(high, sel.get(0));
    [o0, o1, o2, o3]
}

/// Routes `input` to output `sel`; every other output is low.
pub fn demux8way(input: Bit, sel: Bits<3>) -> [Bit; 8] {
    let [low, high] = demux(input, sel.get(2));
    let inner: Bits<2> = sel.slice(0);
    let [o0, o1, o2, o3] = demux4way(low, inner);
    let [o4, o5, o6, o7] = demux4way(high, inner);
    [o0, o1, o2, o3, o4, o5, o6, o7]
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn word_gates_match_host_bitwise(a in any::<u16>(), b in any::<u16>()) {
            let (x, y) = (Word::from_u16(a), Word::from_u16(b));
            prop_assert_eq!(not16(x).to_u16(), !a);
            prop_assert_eq!(and16(x, y).to_u16(), a & b);
            prop_assert_eq!(or16(x, y).to_u16(), a | b);
        }

        #[test]
        fn or16way_is_nonzero_test(a in any::<u16>()) {
            prop_assert_eq!(or16way(Word::from_u16(a)).to_bool(), a != 0);
        }
    }
}
