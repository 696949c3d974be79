//! The Hack CPU.
//!
//! This module implements the CPU circuit:
//! - A, D and PC registers on a private clock
//! - Instruction decoding into control signals
//! - ALU operand selection, destination loads and the jump table

pub mod registers;
pub mod decode;
pub mod execute;

pub use registers::{RegisterValues, Registers};
pub use decode::{decode, Decoded, Dest, Instruction, Jump};
pub use execute::{jump_predicate, Cpu, CpuOutput};
