//! The fetch-execute loop.

use std::ops::Range;
use serde::{Serialize, Deserialize};
use tracing::{event, Level};
use crate::cpu::{Cpu, CpuOutput, RegisterValues};
use crate::hack::HackError;
use crate::logic::{Address, Bit, Word};
use crate::storage::{Bank, Clock, Cycle, FlatRam, Ram16K};
use crate::computer::devices::{BitmapScreen, Keyboard, Screen, SharedKeyboard};
use crate::computer::memory::{DataMemory, Memory};
use crate::computer::rom::{FlatRom, InstructionStore, Rom32K};

/// The complete machine: CPU, data memory and instruction store.
///
/// `step` is the only way to advance time. It ticks the CPU's register
/// clock and the data memory clock exactly once each, so the two never
/// drift apart.
#[derive(Debug, Clone)]
pub struct Computer<M, P> {
    cpu: Cpu,
    memory: M,
    rom: P,
    clock: Clock,

    pc: Address,
    address_m: Address,
    in_m: Word,
    steps: u64,
}

/// Gate-level RAM and ROM.
pub type HackComputer = Computer<Memory<Ram16K, BitmapScreen, SharedKeyboard>, Rom32K>;

/// Map-backed RAM and a vector ROM around the same CPU.
pub type FlatComputer = Computer<Memory<FlatRam, BitmapScreen, SharedKeyboard>, FlatRom>;

impl<M: DataMemory, P: InstructionStore> Computer<M, P> {
    /// Wire up a computer. `clock` paces `memory` from now on.
    pub fn new(cpu: Cpu, memory: M, rom: P, clock: Clock) -> Self {
        let mut computer = Self {
            cpu,
            memory,
            rom,
            clock,
            pc: Address::zero(),
            address_m: Address::zero(),
            in_m: Word::zero(),
            steps: 0,
        };
        computer.pc = computer.cpu.registers().pc().slice(0);
        computer.address_m = computer.cpu.registers().a().slice(0);
        computer.in_m = computer.memory.peek(computer.clock.now(), computer.address_m);
        computer
    }

    /// Execute one instruction.
    pub fn step(&mut self, reset: Bit) -> CpuOutput {
        let instruction = self.rom.fetch(self.pc);
        let out = self.cpu.step(self.in_m, instruction, reset);

        event!(
            Level::TRACE,
            pc = self.pc.to_u16(),
            instruction = %instruction,
            address_m = out.address_m.to_u16(),
            write_m = out.write_m.to_bool(),
            "step"
        );

        self.memory.fetch(self.clock.now(), out.out_m, out.write_m, out.address_m);
        self.clock.advance();
        self.in_m = self.memory.fetch(self.clock.now(), self.in_m, Bit::O, out.address_m);

        self.pc = out.pc;
        self.address_m = out.address_m;
        self.steps += 1;
        out
    }

    /// Execute `steps` instructions with reset low.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step(Bit::O);
        }
    }

    /// Run one cycle with reset high, sending the program counter back to 0.
    pub fn reset(&mut self) -> CpuOutput {
        self.step(Bit::I)
    }

    /// Inspect a data memory word.
    pub fn peek(&self, addr: u16) -> Word {
        self.memory.peek(self.clock.now(), Address::from_u16(addr & 0x7FFF))
    }

    /// Address of the next instruction.
    pub fn pc(&self) -> u16 {
        self.pc.to_u16()
    }

    /// The data memory address the CPU is looking at.
    pub fn address_m(&self) -> u16 {
        self.address_m.to_u16()
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn now(&self) -> Cycle {
        self.clock.now()
    }

    pub fn registers(&self) -> RegisterValues {
        self.cpu.values()
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn rom(&self) -> &P {
        &self.rom
    }

    /// Capture the visible machine state, including RAM words in `ram`.
    pub fn snapshot(&self, ram: Range<u16>) -> Snapshot {
        Snapshot {
            steps: self.steps,
            cycle: self.clock.now(),
            registers: self.registers(),
            pc: self.pc,
            address_m: self.address_m,
            ram: ram
                .map(|address| MemoryCell { address, value: self.peek(address).to_i16() })
                .collect(),
        }
    }
}

impl<R: Bank<14>, S: Screen, K: Keyboard, P: InstructionStore> Computer<Memory<R, S, K>, P> {
    /// Load a power-on RAM image starting at address 0. Call before the first step.
    pub fn preload_ram(&mut self, image: &[Word]) {
        let now = self.clock.now();
        self.memory.preset_ram(now, image);
        self.in_m = self.memory.peek(now, self.address_m);
        event!(Level::DEBUG, words = image.len(), "preloaded RAM");
    }
}

impl HackComputer {
    /// A gate-level computer with `program` burned into ROM.
    pub fn with_program(program: &[Word]) -> Result<Self, HackError> {
        let rom = Rom32K::from_words(program)?;
        let memory = Memory::new(Ram16K::new(), BitmapScreen::new(), SharedKeyboard::new());
        Ok(Computer::new(Cpu::new(), memory, rom, Clock::new()))
    }
}

impl FlatComputer {
    /// A map-backed computer with `program` in ROM.
    pub fn with_program(program: &[Word]) -> Result<Self, HackError> {
        let rom = FlatRom::from_words(program)?;
        let memory = Memory::new(FlatRam::new(), BitmapScreen::new(), SharedKeyboard::new());
        Ok(Computer::new(Cpu::new(), memory, rom, Clock::new()))
    }
}

/// One RAM word in a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCell {
    pub address: u16,
    pub value: i16,
}

/// Serializable machine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub steps: u64,
    pub cycle: Cycle,
    pub registers: RegisterValues,
    pub pc: Address,
    pub address_m: Address,
    pub ram: Vec<MemoryCell>,
}
