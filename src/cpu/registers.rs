//! The CPU register file.
//!
//! A and D are plain registers, PC is a program counter. The file keeps its
//! own clock, separate from the one pacing data memory, and only the CPU
//! advances it, once per instruction.

use serde::{Serialize, Deserialize};
use crate::logic::Word;
use crate::storage::{Clock, Cycle, ProgramCounter, Register};

/// The Hack register file.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    clock: Clock,

    /// A: address register, also a general data register.
    pub(crate) a: Register,

    /// D: data register.
    pub(crate) d: Register,

    /// PC: address of the next instruction.
    pub(crate) pc: ProgramCounter,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The register file's current cycle.
    #[inline]
    pub fn now(&self) -> Cycle {
        self.clock.now()
    }

    pub(crate) fn tick(&mut self) {
        self.clock.advance();
    }

    pub fn a(&self) -> Word {
        self.a.read(self.now())
    }

    pub fn d(&self) -> Word {
        self.d.read(self.now())
    }

    pub fn pc(&self) -> Word {
        self.pc.read(self.now())
    }

    /// Current register values.
    pub fn values(&self) -> RegisterValues {
        RegisterValues {
            a: self.a(),
            d: self.d(),
            pc: self.pc(),
        }
    }
}

/// Register contents at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterValues {
    pub a: Word,
    pub d: Word,
    pub pc: Word,
}

impl std::fmt::Display for RegisterValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={:<6} D={:<6} PC={}",
            self.a.to_i16(), self.d.to_i16(), self.pc.to_u16()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_state() {
        let regs = Registers::new();
        assert_eq!(regs.now(), Cycle(0));
        assert_eq!(regs.values(), RegisterValues::default());
    }

    #[test]
    fn test_tick_advances_private_clock() {
        let mut regs = Registers::new();
        regs.tick();
        regs.tick();
        assert_eq!(regs.now(), Cycle(2));
    }
}
