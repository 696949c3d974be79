//! Combinational logic built from a single NAND gate.
//!
//! This module provides the signal types and every stateless circuit:
//! - [`Bit`] - A single two-valued signal
//! - [`Bits`] - A fixed-width bus, with [`Word`] and [`Address`] aliases
//! - [`gates`] - Word-wide and wide-select gates
//! - [`arith`] - Adders and the ALU

pub mod bit;
mod bus;
pub mod gates;
pub mod arith;

pub use bit::Bit;
pub use bus::{Address, Bits, BusError, Word};
pub use arith::{alu, AluControl};
