//! The Hack computer: memory map, instruction store, devices and the
//! fetch-execute loop that ties them to the CPU.

pub mod devices;
pub mod memory;
pub mod rom;
pub mod machine;

pub use devices::{keys, BitmapScreen, Keyboard, Screen, SharedKeyboard};
pub use memory::{DataMemory, Memory, KBD, SCREEN};
pub use rom::{FlatRom, InstructionStore, Rom32K, ROM_WORDS};
pub use machine::{Computer, FlatComputer, HackComputer, MemoryCell, Snapshot};
