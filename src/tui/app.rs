//! Debugger application state and logic.

use std::collections::HashSet;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::computer::{keys, BitmapScreen, Computer, InstructionStore, Memory, SharedKeyboard};
use crate::hack::{disassemble_instruction, HackError};
use crate::logic::{Address, Bit, Word};
use crate::storage::Bank;

/// A computer whose screen and keyboard the debugger can reach.
pub type DebugComputer<R, P> = Computer<Memory<R, BitmapScreen, SharedKeyboard>, P>;

/// Builds a fresh computer for a program; used on start and on reset.
pub type Builder<R, P> = fn(&[Word]) -> Result<DebugComputer<R, P>, HackError>;

/// Ticks a forwarded key stays pressed. Terminals report presses, not releases.
const KEY_HOLD_TICKS: u32 = 6;

/// Debugger application state.
pub struct DebuggerApp<R, P> {
    /// The computer being debugged.
    pub computer: DebugComputer<R, P>,
    build: Builder<R, P>,
    /// Original program, kept for reset.
    pub program: Vec<Word>,
    /// Breakpoints by instruction address.
    pub breakpoints: HashSet<u16>,
    /// Is the debugger running continuously?
    pub running: bool,
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// First RAM address in the memory view.
    pub mem_scroll: usize,
    /// Show the screen instead of RAM in the right pane.
    pub show_screen: bool,
    /// Instructions executed per UI tick while running.
    pub steps_per_tick: u32,
    key_hold: u32,
}

impl<R: Bank<14>, P: InstructionStore> DebuggerApp<R, P> {
    /// Create a new debugger with a loaded program.
    pub fn new(program: Vec<Word>, build: Builder<R, P>, steps_per_tick: u32) -> Result<Self, HackError> {
        let computer = build(&program)?;
        Ok(Self {
            computer,
            build,
            program,
            breakpoints: HashSet::new(),
            running: false,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
            mem_scroll: 0,
            show_screen: false,
            steps_per_tick: steps_per_tick.max(1),
            key_hold: 0,
        })
    }

    /// Step one instruction.
    pub fn step(&mut self) {
        let pc = self.computer.pc();
        let instruction = self.computer.rom().peek(Address::from_u16(pc));
        self.computer.step(Bit::O);
        self.status = format!("PC={:05}: {}", pc, disassemble_instruction(instruction));
    }

    /// Start continuous execution.
    pub fn run(&mut self) {
        // Leave a breakpoint we are sitting on.
        if self.breakpoints.contains(&self.computer.pc()) {
            self.step();
        }
        self.running = true;
        self.status = "Running... Ctrl-P pauses, keys go to the keyboard.".into();
    }

    pub fn pause(&mut self) {
        self.running = false;
        self.release_key();
        self.status = format!("Paused after {} steps.", self.computer.steps());
    }

    /// Run one batch of continuous execution.
    pub fn tick(&mut self) {
        if self.key_hold > 0 {
            self.key_hold -= 1;
            if self.key_hold == 0 {
                self.release_key();
            }
        }

        if !self.running {
            return;
        }

        for _ in 0..self.steps_per_tick {
            let pc = self.computer.pc();
            if self.breakpoints.contains(&pc) {
                self.running = false;
                self.status = format!("Breakpoint at PC={}", pc);
                return;
            }
            self.computer.step(Bit::O);
        }
    }

    /// Toggle breakpoint at the current PC.
    pub fn toggle_breakpoint(&mut self) {
        let pc = self.computer.pc();
        if self.breakpoints.remove(&pc) {
            self.status = format!("Removed breakpoint at PC={}", pc);
        } else {
            self.breakpoints.insert(pc);
            self.status = format!("Set breakpoint at PC={}", pc);
        }
    }

    /// Rebuild the computer from the original program.
    pub fn reset(&mut self) {
        match (self.build)(&self.program) {
            Ok(computer) => {
                self.computer = computer;
                self.status = "Reset. Ready.".into();
            }
            Err(e) => self.status = format!("Reset failed: {}", e),
        }
        self.running = false;
    }

    /// Hold a key down on the Hack keyboard for a few ticks.
    pub fn forward_key(&mut self, key: &KeyEvent) {
        if let Some(code) = hack_key(key) {
            self.computer.memory().keyboard().press(code);
            self.key_hold = KEY_HOLD_TICKS;
        }
    }

    fn release_key(&mut self) {
        self.key_hold = 0;
        self.computer.memory().keyboard().release();
    }

    /// Disassembly around the current PC: (address, text, is_current).
    pub fn get_disassembly(&self, lines: usize) -> Vec<(u16, String, bool)> {
        let pc = self.computer.pc() as usize;
        let end = self.computer.rom().len().max(pc + 1);
        let start = pc.saturating_sub(lines / 2);

        (start..(start + lines).min(end))
            .map(|addr| {
                let addr = addr as u16;
                let word = self.computer.rom().peek(Address::from_u16(addr));
                (addr, disassemble_instruction(word), addr as usize == pc)
            })
            .collect()
    }
}

/// Hack key code for a terminal key event.
pub fn hack_key(key: &KeyEvent) -> Option<u16> {
    match key.code {
        KeyCode::Char(c) => keys::printable(c),
        KeyCode::Enter => Some(keys::NEWLINE),
        KeyCode::Backspace => Some(keys::BACKSPACE),
        KeyCode::Left => Some(keys::LEFT),
        KeyCode::Up => Some(keys::UP),
        KeyCode::Right => Some(keys::RIGHT),
        KeyCode::Down => Some(keys::DOWN),
        KeyCode::Home => Some(keys::HOME),
        KeyCode::End => Some(keys::END),
        KeyCode::PageUp => Some(keys::PAGE_UP),
        KeyCode::PageDown => Some(keys::PAGE_DOWN),
        KeyCode::Insert => Some(keys::INSERT),
        KeyCode::Delete => Some(keys::DELETE),
        KeyCode::Esc => Some(keys::ESCAPE),
        KeyCode::F(n) => keys::function(n),
        _ => None,
    }
}

/// Run the debugger with a program.
pub fn run_debugger<R: Bank<14>, P: InstructionStore>(
    program: Vec<Word>,
    build: Builder<R, P>,
    steps_per_tick: u32,
) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    let mut app = DebuggerApp::new(program, build, steps_per_tick)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        let wait = if app.running { 16 } else { 50 };
        if event::poll(Duration::from_millis(wait))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                    if app.running {
                        match key.code {
                            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => app.should_quit = true,
                            KeyCode::Char('p') if ctrl => app.pause(),
                            _ => app.forward_key(&key),
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Char('c') if ctrl => app.should_quit = true,
                            KeyCode::Char('s') => app.step(),
                            KeyCode::Char('r') => app.run(),
                            KeyCode::Char('b') => app.toggle_breakpoint(),
                            KeyCode::Char('x') => app.reset(),
                            KeyCode::Char('v') => app.show_screen = !app.show_screen,
                            KeyCode::Up => app.mem_scroll = app.mem_scroll.saturating_sub(1),
                            KeyCode::Down => app.mem_scroll = (app.mem_scroll + 1).min(0x7FFF),
                            KeyCode::PageUp => app.mem_scroll = app.mem_scroll.saturating_sub(16),
                            KeyCode::PageDown => app.mem_scroll = (app.mem_scroll + 16).min(0x7FFF),
                            _ => {}
                        }
                    }
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
