//! The CPU circuit.
//!
//! One call to [`Cpu::step`] is one clock cycle: decode, drive the ALU,
//! drive A, D and PC, then advance the register file's clock and sample the
//! post-edge address and program counter.

use serde::{Serialize, Deserialize};
use crate::logic::{alu, Address, Bit, Bits, Word};
use crate::logic::bit::{and, not, or};
use crate::logic::gates::{demux8way, mux16};
use crate::cpu::decode::decode;
use crate::cpu::registers::{RegisterValues, Registers};

/// Signals the CPU drives towards memory and the instruction store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CpuOutput {
    /// Value to store in data memory.
    pub out_m: Word,
    /// High when `out_m` should be stored.
    pub write_m: Bit,
    /// Data memory address for the next access.
    pub address_m: Address,
    /// Address of the next instruction.
    pub pc: Address,
}

/// Evaluate the jump condition `jump` against the ALU flags.
///
/// `jump` is one-hot decoded and each line is gated by its condition:
/// never, >0, =0, >=0, <0, !=0, <=0, always.
pub fn jump_predicate(zr: Bit, ng: Bit, jump: Bits<3>) -> Bit {
    let lines = demux8way(Bit::I, jump);
    let pos = and(not(zr), not(ng));
    let conditions = [
        Bit::O,
        pos,
        zr,
        not(ng),
        ng,
        not(zr),
        or(zr, ng),
        Bit::I,
    ];

    let gated: [Bit; 8] = std::array::from_fn(|i| and(lines[i], conditions[i]));
    crate::logic::gates::or8way(Bits::from_bits(gated))
}

/// The Hack CPU.
#[derive(Debug, Clone, Default)]
pub struct Cpu {
    regs: Registers,
}

impl Cpu {
    /// Create a CPU with all registers low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one instruction.
    ///
    /// `in_m` is the data memory word at the previous `address_m`.
    pub fn step(&mut self, in_m: Word, instruction: Word, reset: Bit) -> CpuOutput {
        let now = self.regs.now();
        let d = decode(instruction);

        let d_value = self.regs.d.apply(now, Bit::O, instruction);
        let a_value = self.regs.a.apply(now, Bit::O, instruction);
        let y = mux16(a_value, in_m, d.a);
        let (out, zr, ng) = alu(d_value, y, d.alu);

        let load_a = or(not(d.i), and(d.i, d.dest_a));
        self.regs.a.apply(now, load_a, mux16(instruction, out, d.i));
        self.regs.d.apply(now, and(d.i, d.dest_d), out);
        let write_m = and(d.i, d.dest_m);

        let jump = jump_predicate(zr, ng, d.jump);
        self.regs.pc.apply(
            now,
            a_value,
            and(d.i, jump),
            or(not(d.i), not(jump)),
            reset,
        );

        self.regs.tick();

        CpuOutput {
            out_m: out,
            write_m,
            address_m: self.regs.a().slice(0),
            pc: self.regs.pc().slice(0),
        }
    }

    /// Access the register file.
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Current A, D and PC.
    pub fn values(&self) -> RegisterValues {
        self.regs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::{Dest, Instruction, Jump};
    use Bit::{I, O};

    fn word(bits: &str) -> Word {
        Word::parse(bits).unwrap()
    }

    fn compute(a: bool, comp: u8, dest: Dest, jump: Jump) -> Word {
        Instruction::Compute { a, comp, dest, jump }.encode()
    }

    const D_ONLY: Dest = Dest { a: false, d: true, m: false };
    const M_ONLY: Dest = Dest { a: false, d: false, m: true };
    const NONE: Dest = Dest { a: false, d: false, m: false };

    #[test]
    fn test_jump_table_exhaustive() {
        // (zr, ng) for a positive, zero and negative output
        let flags = [(O, O), (I, O), (O, I)];
        let expected: [[bool; 3]; 8] = [
            [false, false, false],
            [true, false, false],
            [false, true, false],
            [true, true, false],
            [false, false, true],
            [true, false, true],
            [false, true, true],
            [true, true, true],
        ];

        for code in 0..8u16 {
            for (k, (zr, ng)) in flags.iter().enumerate() {
                let taken = jump_predicate(*zr, *ng, Bits::from_u16(code));
                assert_eq!(taken.to_bool(), expected[code as usize][k], "jump {:03b} case {}", code, k);
            }
        }
    }

    #[test]
    fn test_address_instruction_loads_a() {
        let mut cpu = Cpu::new();
        let out = cpu.step(Word::zero(), Word::from_u16(1234), O);
        assert_eq!(out.address_m.to_u16(), 1234);
        assert_eq!(out.write_m, O);
        assert_eq!(out.pc.to_u16(), 1);
        assert_eq!(cpu.values().a.to_u16(), 1234);
    }

    #[test]
    fn test_compute_into_d_and_memory() {
        let mut cpu = Cpu::new();
        cpu.step(Word::zero(), Word::from_u16(7), O);

        // D=A
        let out = cpu.step(Word::zero(), compute(false, 0b110000, D_ONLY, Jump::Never), O);
        assert_eq!(out.write_m, O);
        assert_eq!(cpu.values().d.to_u16(), 7);

        // M=D+1
        let out = cpu.step(Word::zero(), compute(false, 0b011111, M_ONLY, Jump::Never), O);
        assert_eq!(out.write_m, I);
        assert_eq!(out.out_m.to_u16(), 8);
        assert_eq!(out.address_m.to_u16(), 7);
        assert_eq!(out.pc.to_u16(), 3);
    }

    #[test]
    fn test_reads_in_m_when_a_bit_set() {
        let mut cpu = Cpu::new();
        // D=M
        cpu.step(Word::from_i16(-9), word("1111110000010000"), O);
        assert_eq!(cpu.values().d.to_i16(), -9);
    }

    #[test]
    fn test_jump_taken_and_not_taken() {
        let mut cpu = Cpu::new();
        cpu.step(Word::zero(), Word::from_u16(20), O);

        // 0;JMP
        let out = cpu.step(Word::zero(), compute(false, 0b101010, NONE, Jump::Always), O);
        assert_eq!(out.pc.to_u16(), 20);

        // D;JNE with D = 0 falls through
        let out = cpu.step(Word::zero(), compute(false, 0b001100, NONE, Jump::Ne), O);
        assert_eq!(out.pc.to_u16(), 21);
    }

    #[test]
    fn test_reset() {
        let mut cpu = Cpu::new();
        for _ in 0..5 {
            cpu.step(Word::zero(), Word::from_u16(3), O);
        }
        assert_eq!(cpu.values().pc.to_u16(), 5);
        let out = cpu.step(Word::zero(), Word::from_u16(3), I);
        assert_eq!(out.pc.to_u16(), 0);
    }
}
