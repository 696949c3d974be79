//! Clocked storage.
//!
//! Nothing in here owns a clock. Every stateful call takes the current
//! [`Cycle`] explicitly, so all components driven with the same cycle agree
//! on when the edge happens.
//!
//! - [`Dff`] - The bistable cell
//! - [`Latch`], [`Register`], [`ProgramCounter`] - Built from cells
//! - [`Bank`] - Addressable memory, from [`Ram8`] up to [`Ram16K`]

mod clock;
mod dff;
mod register;
pub mod ram;

pub use clock::{Clock, Cycle};
pub use dff::Dff;
pub use register::{Latch, ProgramCounter, Register};
pub use ram::{Bank, FlatRam, Ram16K, Ram4K, Ram512, Ram64, Ram8};
