//! Hack Emulator - CLI Entry Point
//!
//! Commands:
//! - `hack-emu run <program>` - Run a `.hack` or binary program
//! - `hack-emu debug <program>` - Interactive debugger
//! - `hack-emu disasm <program>` - Disassemble to Hack assembly
//! - `hack-emu test` - Built-in self-test

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "hack-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "A gate-level simulation of the 16-bit Hack computer")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program for a bounded number of instructions
    Run {
        /// Path to the .hack or binary file to execute
        program: String,
        /// Maximum number of instructions to run
        #[arg(short, long, default_value = "10000")]
        max_cycles: u64,
        /// Use map-backed RAM and ROM instead of the gate-level banks
        #[arg(long)]
        flat: bool,
        /// Preload a RAM word before running, as ADDR=VALUE (repeatable)
        #[arg(long, value_parser = parse_ram_assignment)]
        ram: Vec<(u16, i16)>,
        /// RAM words to print afterwards, as START:COUNT
        #[arg(long, value_parser = parse_dump_range, default_value = "0:16")]
        dump: (u16, u16),
        /// Print every executed instruction
        #[arg(short, long)]
        trace: bool,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive debugger
    #[cfg(feature = "tui")]
    Debug {
        /// Path to the .hack or binary file to debug
        program: String,
        /// Use map-backed RAM and ROM instead of the gate-level banks
        #[arg(long)]
        flat: bool,
    },
    /// Disassemble a program to Hack assembly
    Disasm {
        /// Path to the .hack or binary file
        program: String,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Run { program, max_cycles, flat, ram, dump, trace, json }) => {
            let options = RunOptions { max_cycles, ram, dump, trace, json };
            run_program(&program, flat, &options);
        }
        #[cfg(feature = "tui")]
        Some(Commands::Debug { program, flat }) => {
            debug_program(&program, flat);
        }
        Some(Commands::Disasm { program }) => {
            disassemble_file(&program);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Hack Emulator v0.1.0");
            println!("A 16-bit computer built from NAND gates");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_gates();
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn parse_ram_assignment(s: &str) -> Result<(u16, i16), String> {
    let (addr, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VALUE, got '{}'", s))?;
    let addr: u16 = addr.trim().parse().map_err(|e| format!("bad address '{}': {}", addr, e))?;
    if addr >= hack::computer::SCREEN {
        return Err(format!("address {} is outside RAM (0-16383)", addr));
    }
    let value: i16 = value.trim().parse().map_err(|e| format!("bad value '{}': {}", value, e))?;
    Ok((addr, value))
}

fn parse_dump_range(s: &str) -> Result<(u16, u16), String> {
    let (start, count) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:COUNT, got '{}'", s))?;
    let start: u16 = start.trim().parse().map_err(|e| format!("bad start '{}': {}", start, e))?;
    let count: u16 = count.trim().parse().map_err(|e| format!("bad count '{}': {}", count, e))?;
    Ok((start, count))
}

fn load_or_exit(path: &str) -> Vec<hack::Word> {
    match hack::load_program(path) {
        Ok(words) if words.is_empty() => {
            eprintln!("❌ No instructions in {}", path);
            std::process::exit(1);
        }
        Ok(words) => words,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

struct RunOptions {
    max_cycles: u64,
    ram: Vec<(u16, i16)>,
    dump: (u16, u16),
    trace: bool,
    json: bool,
}

fn run_program(path: &str, flat: bool, options: &RunOptions) {
    use hack::{FlatComputer, HackComputer};

    let program = load_or_exit(path);
    if !options.json {
        println!("🔧 Running: {} ({} words, {} memory)", path, program.len(),
            if flat { "flat" } else { "gate-level" });
    }

    let result = if flat {
        FlatComputer::with_program(&program).map(|mut c| execute(&mut c, options))
    } else {
        HackComputer::with_program(&program).map(|mut c| execute(&mut c, options))
    };

    if let Err(e) = result {
        eprintln!("❌ Failed to load program: {}", e);
        std::process::exit(1);
    }
}

/// Whether `pc` sits on the `@pc; 0;JMP` idiom Hack programs end with.
fn is_halt_loop<P: hack::computer::InstructionStore>(rom: &P, pc: u16) -> bool {
    use hack::cpu::{Instruction, Jump};
    use hack::Address;

    if pc >= 0x7FFF {
        return false;
    }
    let here = Instruction::decode(rom.peek(Address::from_u16(pc)));
    let next = Instruction::decode(rom.peek(Address::from_u16(pc + 1)));
    matches!(
        (here, next),
        (Instruction::Address(target), Instruction::Compute { jump: Jump::Always, .. }) if target == pc
    )
}

fn execute<R, P>(
    computer: &mut hack::Computer<hack::computer::Memory<R, hack::computer::BitmapScreen, hack::computer::SharedKeyboard>, P>,
    options: &RunOptions,
) where
    R: hack::Bank<14>,
    P: hack::computer::InstructionStore,
{
    use hack::hack::disassemble_instruction;
    use hack::{Address, Bit, Word};

    if let Some(top) = options.ram.iter().map(|(addr, _)| *addr).max() {
        let mut image = vec![Word::zero(); usize::from(top) + 1];
        for (addr, value) in &options.ram {
            image[usize::from(*addr)] = Word::from_i16(*value);
        }
        computer.preload_ram(&image);
    }

    if options.trace && !options.json {
        println!();
        println!("━━━ Execution ━━━");
    }

    let mut halted = false;
    while computer.steps() < options.max_cycles {
        let pc = computer.pc();
        if is_halt_loop(computer.rom(), pc) {
            halted = true;
            break;
        }

        computer.step(Bit::O);
        if options.trace && !options.json {
            let word = computer.rom().peek(Address::from_u16(pc));
            println!("{:05}: {:<16} {}", pc, disassemble_instruction(word), computer.registers());
        }
    }

    let (start, count) = options.dump;
    let end = start.saturating_add(count).min(0x8000);
    let snapshot = computer.snapshot(start..end);

    if options.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Steps: {}", snapshot.steps);
    println!("Registers: {}", snapshot.registers);
    println!("addressM: {}", snapshot.address_m.to_u16());
    if !snapshot.ram.is_empty() {
        println!();
        for cell in &snapshot.ram {
            println!("RAM[{:05}] = {}", cell.address, cell.value);
        }
    }

    if halted {
        println!();
        println!("✓ Reached the end-of-program loop at PC={}", computer.pc());
    } else if computer.steps() >= options.max_cycles {
        println!();
        println!("⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.", options.max_cycles);
    }
}

#[cfg(feature = "tui")]
fn debug_program(path: &str, flat: bool) {
    use hack::{FlatComputer, HackComputer};
    use hack::tui::run_debugger;

    println!("🔍 Loading: {}", path);
    let program = load_or_exit(path);
    println!("🚀 Launching debugger...");

    let result = if flat {
        run_debugger(program, FlatComputer::with_program, 2000)
    } else {
        run_debugger(program, HackComputer::with_program, 1)
    };

    if let Err(e) = result {
        eprintln!("❌ Debugger error: {}", e);
        std::process::exit(1);
    }
}

fn disassemble_file(path: &str) {
    println!("📖 Disassembling: {}", path);
    println!();

    let program = load_or_exit(path);
    print!("{}", hack::disassemble(&program));
}

fn demo_gates() {
    use hack::{Bit, Word};
    use hack::logic::bit::{and, nand, or, xor};
    use hack::logic::arith::add16;
    use hack::logic::{alu, AluControl, Bits};

    println!("━━━ NAND and friends ━━━");
    println!();
    println!("  a b | nand and or xor");
    for a in Bit::ALL {
        for b in Bit::ALL {
            println!("  {} {} |  {}    {}   {}   {}", a, b, nand(a, b), and(a, b), or(a, b), xor(a, b));
        }
    }
    println!();

    println!("Ripple-carry adder:");
    let x = Word::from_i16(12345);
    let y = Word::from_i16(-6789);
    println!("  {} + {} = {}", x.to_i16(), y.to_i16(), add16(x, y).to_i16());
    let max = Word::from_i16(i16::MAX);
    println!("  {} + 1 = {} (wraps)", max.to_i16(), add16(max, Word::one()).to_i16());
    println!();

    println!("ALU (x=17, y=5):");
    for (name, comp) in [("x-y", 0b010011u16), ("y-x", 0b000111), ("x&y", 0b000000), ("!x", 0b001101)] {
        let (out, zr, ng) = alu(Word::from_i16(17), Word::from_i16(5), AluControl::from_bits(Bits::from_u16(comp)));
        println!("  {:<4} = {:>4}  zr={} ng={}", name, out.to_i16(), zr, ng);
    }
    println!();

    println!("✓ Gates working!");
}

fn run_self_test() {
    use hack::{Bit, Clock, HackComputer, Word};
    use hack::logic::arith::{add16, inc16};
    use hack::logic::bit::{nand, not};
    use hack::storage::{Dff, ProgramCounter};

    println!("━━━ Hack Emulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut check = |name: &str, ok: bool| {
        if ok {
            println!("{}... ✓", name);
            passed += 1;
        } else {
            println!("{}... ✗", name);
            failed += 1;
        }
    };

    check(
        "NAND truth table",
        nand(Bit::O, Bit::O) == Bit::I
            && nand(Bit::O, Bit::I) == Bit::I
            && nand(Bit::I, Bit::O) == Bit::I
            && nand(Bit::I, Bit::I) == Bit::O,
    );
    check("NOT from NAND", not(Bit::O) == Bit::I && not(Bit::I) == Bit::O);

    check(
        "Adder wraps on overflow",
        add16(Word::from_u16(0xFFFF), Word::one()).is_zero()
            && inc16(Word::from_i16(-2)).to_i16() == -1,
    );

    let mut dff = Dff::new();
    let mut clock = Clock::new();
    dff.write(clock.now(), Bit::I);
    let stable = dff.read(clock.now()) == Bit::O;
    clock.advance();
    check("Flip-flop latches on the edge", stable && dff.read(clock.now()) == Bit::I);

    let mut pc = ProgramCounter::new();
    let mut clock = Clock::new();
    pc.apply(clock.now(), Word::one(), Bit::I, Bit::O, Bit::O);
    clock.advance();
    let loaded = pc.read(clock.now()).to_u16() == 1;
    pc.apply(clock.now(), Word::zero(), Bit::O, Bit::I, Bit::O);
    clock.advance();
    let incremented = pc.read(clock.now()).to_u16() == 2;
    pc.apply(clock.now(), Word::zero(), Bit::O, Bit::O, Bit::I);
    clock.advance();
    check("Program counter load/inc/reset", loaded && incremented && pc.read(clock.now()).is_zero());

    // Stores max(RAM[0], RAM[1]) in RAM[2].
    let max_program: Vec<Word> = [
        "0000000000000000", "1111110000010000", "0000000000000001", "1111010011010000",
        "0000000000001010", "1110001100000001", "0000000000000001", "1111110000010000",
        "0000000000001100", "1110101010000111", "0000000000000000", "1111110000010000",
        "0000000000000010", "1110001100001000", "0000000000001110", "1110101010000111",
    ]
    .iter()
    .filter_map(|line| Word::parse(line).ok())
    .collect();

    for (a, b, expected) in [(7i16, 1i16, 7i16), (7, 8, 8)] {
        let ok = match HackComputer::with_program(&max_program) {
            Ok(mut computer) => {
                computer.preload_ram(&[Word::from_i16(a), Word::from_i16(b)]);
                computer.run(20);
                computer.peek(2).to_i16() == expected
            }
            Err(_) => false,
        };
        check(&format!("Gate-level computer: max({}, {}) = {}", a, b, expected), ok);
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
