//! # Hack Emulator
//!
//! A gate-level simulation of the 16-bit Hack computer.
//!
//! Everything is built up from a single NAND gate: word-wide gates, adders
//! and the ALU, clocked cells and registers, RAM banks up to 16K words, the
//! CPU and finally the fetch-execute loop with a memory-mapped screen and
//! keyboard. Time only moves when [`Computer::step`] advances the clocks.

pub mod logic;
pub mod storage;
pub mod cpu;
pub mod computer;
pub mod hack;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use logic::{Address, Bit, Bits, BusError, Word};
pub use storage::{Bank, Clock, Cycle};
pub use cpu::{Cpu, CpuOutput, Instruction};
pub use computer::{Computer, FlatComputer, HackComputer, Snapshot};
pub use hack::{disassemble, load_program, parse_hack, save_hack, HackError};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
