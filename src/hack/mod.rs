//! Hack program files and disassembly.
//!
//! This module provides:
//! - Loading and saving `.hack` text and big-endian binary images
//! - A disassembler (words → Hack assembly mnemonics)

pub mod hackfile;
pub mod disasm;

pub use hackfile::{load_hack, load_program, parse_binary, parse_hack, save_hack, HackError};
pub use disasm::{disassemble, disassemble_instruction};
