//! TUI debugger for the Hack computer.
//!
//! Provides an interactive terminal-based debugger with:
//! - Register and addressM display
//! - RAM view and a braille rendering of the screen
//! - Step/run/breakpoint controls
//! - Key forwarding to the Hack keyboard while running

mod app;
mod ui;

pub use app::{hack_key, run_debugger, Builder, DebugComputer, DebuggerApp};
