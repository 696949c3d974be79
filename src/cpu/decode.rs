//! Instruction decoding for the Hack machine language.
//!
//! Every 16-bit word is a valid instruction:
//! - Bit 15 low: address instruction, bits 14-0 are loaded into A
//! - Bit 15 high: compute instruction, `111a cccc ccdd djjj`
//!
//! [`decode`] splits a word into the control signals the CPU circuit
//! consumes. [`Instruction`] is the host-side view used by loaders,
//! the disassembler and tests.

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::logic::{AluControl, Bit, Bits, Word};

/// Control signals extracted from an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    /// Instruction type: low for address, high for compute.
    pub i: Bit,
    /// ALU y operand source: low for A, high for M.
    pub a: Bit,
    pub alu: AluControl,
    pub dest_a: Bit,
    pub dest_d: Bit,
    pub dest_m: Bit,
    /// Jump condition code, `j1` in bit 2.
    pub jump: Bits<3>,
}

/// Split an instruction word into its fields. Pure wiring, no gates.
pub fn decode(instruction: Word) -> Decoded {
    Decoded {
        i: instruction.get(15),
        a: instruction.get(12),
        alu: AluControl::from_bits(instruction.slice(6)),
        dest_a: instruction.get(5),
        dest_d: instruction.get(4),
        dest_m: instruction.get(3),
        jump: instruction.slice(0),
    }
}

/// Jump conditions, indexed by the three `j` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jump {
    Never,
    Gt,
    Eq,
    Ge,
    Lt,
    Ne,
    Le,
    Always,
}

impl Jump {
    pub const ALL: [Jump; 8] = [
        Jump::Never, Jump::Gt, Jump::Eq, Jump::Ge,
        Jump::Lt, Jump::Ne, Jump::Le, Jump::Always,
    ];

    pub fn from_bits(bits: Bits<3>) -> Self {
        Self::ALL[bits.to_u16() as usize]
    }

    pub fn to_bits(self) -> Bits<3> {
        Bits::from_u16(self as u16)
    }

    /// Assembly mnemonic, empty for `Never`.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Jump::Never => "",
            Jump::Gt => "JGT",
            Jump::Eq => "JEQ",
            Jump::Ge => "JGE",
            Jump::Lt => "JLT",
            Jump::Ne => "JNE",
            Jump::Le => "JLE",
            Jump::Always => "JMP",
        }
    }
}

/// Destination flags of a compute instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    /// Assembly mnemonic (`AMD` order), empty when nothing is stored.
    pub fn mnemonic(self) -> String {
        let mut s = String::new();
        if self.a { s.push('A'); }
        if self.m { s.push('M'); }
        if self.d { s.push('D'); }
        s
    }
}

/// A Hack instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// `@value`: load a 15-bit constant into A.
    Address(u16),

    /// `dest=comp;jump`
    Compute {
        /// Read M instead of A as the ALU y operand.
        a: bool,
        /// The six ALU control bits, `zx` in bit 5.
        comp: u8,
        dest: Dest,
        jump: Jump,
    },
}

impl Instruction {
    /// Interpret a word. Bits 14 and 13 of compute instructions are ignored.
    pub fn decode(word: Word) -> Self {
        let d = decode(word);
        if !d.i.is_high() {
            return Instruction::Address(word.to_u16() & 0x7FFF);
        }
        Instruction::Compute {
            a: d.a.is_high(),
            comp: d.alu.to_bits().to_u16() as u8,
            dest: Dest {
                a: d.dest_a.is_high(),
                d: d.dest_d.is_high(),
                m: d.dest_m.is_high(),
            },
            jump: Jump::from_bits(d.jump),
        }
    }

    /// Encode as a word. Compute instructions carry the conventional `111` prefix.
    ///
    /// # Panics
    /// Panics if an address exceeds 15 bits or `comp` exceeds 6 bits.
    pub fn encode(&self) -> Word {
        match *self {
            Instruction::Address(value) => {
                assert!(value <= 0x7FFF, "address {} exceeds 15 bits", value);
                Word::from_u16(value)
            }
            Instruction::Compute { a, comp, dest, jump } => {
                assert!(comp < 64, "comp field {:#b} exceeds 6 bits", comp);
                let word = 0b111 << 13
                    | u16::from(a) << 12
                    | u16::from(comp) << 6
                    | u16::from(dest.a) << 5
                    | u16::from(dest.d) << 4
                    | u16::from(dest.m) << 3
                    | jump.to_bits().to_u16();
                Word::from_u16(word)
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::hack::disassemble_instruction(self.encode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bit::{I, O};

    #[test]
    fn test_decode_address_instruction() {
        let d = decode(Word::from_u16(0x1234));
        assert_eq!(d.i, O);
        assert_eq!(Instruction::decode(Word::from_u16(0x1234)), Instruction::Address(0x1234));
    }

    #[test]
    fn test_decode_fields() {
        // D;JGT
        let d = decode(Word::parse("1110001100000001").unwrap());
        assert_eq!(d.i, I);
        assert_eq!(d.a, O);
        assert_eq!(d.alu.to_bits().to_u16(), 0b001100);
        assert_eq!((d.dest_a, d.dest_d, d.dest_m), (O, O, O));
        assert_eq!(Jump::from_bits(d.jump), Jump::Gt);

        // MD=M+1
        let d = decode(Word::parse("1111110111011000").unwrap());
        assert_eq!(d.a, I);
        assert_eq!((d.dest_a, d.dest_d, d.dest_m), (O, I, I));
        assert_eq!(Jump::from_bits(d.jump), Jump::Never);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let cases = [
            Instruction::Address(0),
            Instruction::Address(0x7FFF),
            Instruction::Compute {
                a: true,
                comp: 0b110000,
                dest: Dest { a: false, d: true, m: false },
                jump: Jump::Never,
            },
            Instruction::Compute {
                a: false,
                comp: 0b101010,
                dest: Dest::default(),
                jump: Jump::Always,
            },
        ];

        for instr in cases {
            assert_eq!(Instruction::decode(instr.encode()), instr);
        }
    }

    #[test]
    fn test_dest_mnemonic() {
        let amd = Dest { a: true, d: true, m: true };
        assert_eq!(amd.mnemonic(), "AMD");
        assert_eq!(Dest { a: false, d: true, m: true }.mnemonic(), "MD");
        assert_eq!(Dest::default().mnemonic(), "");
    }

    #[test]
    fn test_jump_bits() {
        for jump in Jump::ALL {
            assert_eq!(Jump::from_bits(jump.to_bits()), jump);
        }
    }
}
