use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use chip8::display::{DummyDisplay, MonoTermDisplay};
use chip8::input::{DummyInput, TermInput};
use chip8::run::{RunConfig, Runner, StopReason, DEFAULT_INSTRUCTIONS_PER_SECOND};
use chip8::{Chip8Interpreter, Quirks};

/// instructions a headless run executes when --steps isn't given
const DEFAULT_HEADLESS_STEPS: u64 = 5;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter for the terminal", long_about = None)]
struct Args {
    #[arg(help = "Path to the ROM file to run")]
    rom: PathBuf,

    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND, help = "Instructions per second")]
    ips: u32,

    #[arg(long, help = "Stop after this many instructions")]
    steps: Option<u64>,

    #[arg(long, help = "Run without a terminal UI, logging each instruction (RUST_LOG=debug)")]
    headless: bool,

    #[arg(long, help = "Seed for the random number generator")]
    seed: Option<u64>,

    #[arg(long, help = "Sprites wrap around the screen edges instead of clipping")]
    wrap: bool,

    #[arg(long, help = "Use the CHIP-48 behaviour for shifts, load/store and jump with offset")]
    chip48: bool,

    #[arg(long, help = "8xy6/8xyE shift Vx in place instead of copying Vy")]
    shift_vx: bool,

    #[arg(long, help = "Fx55/Fx65 leave I unchanged")]
    no_index_increment: bool,

    #[arg(long, help = "Bnnn jumps to nnn + Vx instead of nnn + V0")]
    jump_vx: bool,
}

impl Args {
    fn quirks(&self) -> Quirks {
        let mut quirks = if self.chip48 {
            Quirks::chip48()
        } else {
            Quirks::default()
        };
        quirks.draw_wrap |= self.wrap;
        quirks.shift_uses_vy &= !self.shift_vx;
        quirks.load_store_increments_i &= !self.no_index_increment;
        quirks.jump_uses_vx |= self.jump_vx;
        quirks
    }
}

fn main() -> Result<()> {
    // logs go to stderr; redirect it when running the terminal UI
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let quirks = args.quirks();
    let mut interpreter = match args.seed {
        Some(seed) => Chip8Interpreter::with_seed(quirks, seed),
        None => Chip8Interpreter::new(quirks),
    };

    // load a program
    let mut f = File::open(&args.rom)
        .with_context(|| format!("couldn't open {}", args.rom.display()))?;
    interpreter
        .load_program_from(&mut f)
        .with_context(|| format!("couldn't load {}", args.rom.display()))?;

    if args.headless {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let config = RunConfig {
            instructions_per_second: args.ips,
            ..RunConfig::headless(args.steps.unwrap_or(DEFAULT_HEADLESS_STEPS))
        };
        let mut runner = Runner::new(interpreter, &mut display, &mut input, config);
        runner.run()?;
        let machine = runner.interpreter();
        println!(
            "pc={:#05x} i={:#05x} v={:02x?} dt={} st={}",
            machine.pc(),
            machine.index(),
            machine.registers(),
            machine.delay_timer(),
            machine.sound_timer()
        );
        return Ok(());
    }

    let mut input = TermInput::new()?;
    let mut display = MonoTermDisplay::new()?;
    let config = RunConfig {
        instructions_per_second: args.ips,
        max_steps: args.steps,
        ..RunConfig::default()
    };
    let mut runner = Runner::new(interpreter, &mut display, &mut input, config);
    let result = runner.run();
    let steps = runner.steps();
    drop(runner);
    drop(display);
    drop(input);

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..4 {
        println!();
    }
    match result? {
        StopReason::Quit => println!("quit after {} instructions", steps),
        StopReason::StepLimit => println!("stopped after {} instructions", steps),
    }
    Ok(())
}
