//! WebAssembly bindings for the Hack computer.
//!
//! Wraps a [`FlatComputer`]; gate-level memory is too slow to drive from a
//! browser frame loop.

use wasm_bindgen::prelude::*;
use crate::computer::{FlatComputer, InstructionStore};
use crate::hack::{disassemble_instruction, parse_hack};
use crate::logic::{Address, Word};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly computer wrapper.
#[wasm_bindgen]
pub struct WasmComputer {
    computer: FlatComputer,
    program: Vec<Word>,
}

#[wasm_bindgen]
impl WasmComputer {
    /// Create a computer with an empty ROM.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmComputer, JsError> {
        let computer = FlatComputer::with_program(&[])
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { computer, program: Vec::new() })
    }

    /// Load a program from `.hack` text. Returns the number of words.
    #[wasm_bindgen]
    pub fn load_hack(&mut self, source: &str) -> Result<usize, JsError> {
        let program = parse_hack(source).map_err(|e| JsError::new(&e.to_string()))?;
        self.computer = FlatComputer::with_program(&program)
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.program = program;
        Ok(self.program.len())
    }

    /// Step one instruction. Returns its disassembly.
    #[wasm_bindgen]
    pub fn step(&mut self) -> String {
        let pc = Address::from_u16(self.computer.pc());
        let instruction = self.computer.rom().peek(pc);
        self.computer.step(crate::logic::Bit::O);
        disassemble_instruction(instruction)
    }

    /// Run `steps` instructions. Returns the total step count.
    #[wasm_bindgen]
    pub fn run(&mut self, steps: u32) -> u64 {
        self.computer.run(u64::from(steps));
        self.computer.steps()
    }

    /// Restart the loaded program on a fresh machine.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.computer = FlatComputer::with_program(&self.program)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn steps(&self) -> u64 {
        self.computer.steps()
    }

    #[wasm_bindgen]
    pub fn pc(&self) -> u16 {
        self.computer.pc()
    }

    #[wasm_bindgen]
    pub fn a(&self) -> i16 {
        self.computer.registers().a.to_i16()
    }

    #[wasm_bindgen]
    pub fn d(&self) -> i16 {
        self.computer.registers().d.to_i16()
    }

    /// Read a data memory word.
    #[wasm_bindgen]
    pub fn memory_at(&self, addr: u16) -> i16 {
        self.computer.peek(addr).to_i16()
    }

    /// Hold down a key by Hack key code. 0 releases.
    #[wasm_bindgen]
    pub fn set_key(&self, code: u16) {
        let keyboard = self.computer.memory().keyboard();
        if code == 0 {
            keyboard.release();
        } else {
            keyboard.press(code);
        }
    }

    /// The 8192 screen words, 32 per row, bit 0 leftmost.
    #[wasm_bindgen]
    pub fn screen(&self) -> js_sys::Uint16Array {
        js_sys::Uint16Array::from(self.computer.memory().screen().words())
    }

    /// Machine state as JSON.
    #[wasm_bindgen]
    pub fn snapshot_json(&self, ram_start: u16, ram_count: u16) -> Result<String, JsError> {
        let end = ram_start.saturating_add(ram_count).min(0x8000);
        serde_json::to_string(&self.computer.snapshot(ram_start..end))
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

/// Disassemble a single instruction word.
#[wasm_bindgen]
pub fn wasm_disassemble(word: u16) -> String {
    disassemble_instruction(Word::from_u16(word))
}
