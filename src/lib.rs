//! A CHIP-8 interpreter.
//!
//! ## Design
//!
//! * the machine is one owned value, `Chip8Interpreter`; a driver calls
//!   `.step()` to run exactly one instruction
//! * every failure (stack over/underflow, stray memory access, unknown
//!   instruction) is a `MachineError` handed back to the driver; nothing in
//!   the core panics or exits
//! * dialect forks are `Quirks`, defaulting to the original COSMAC VIP
//! * the core knows nothing about time: the driver paces instructions and
//!   counts the timers down at 60Hz
//! * display and input are traits, so the terminal front-end can be swapped
//!   for a dummy in tests or a headless run
//!
//! Model
//!
//! main
//!  |-- display, input, quirks, run config
//!  |-- interpreter(quirks)
//!  |    |-- memory (font at 0x050, program at 0x200)
//!  |    |-- registers, stack, timers, keypad
//!  |    `-- framebuffer
//!  `-- runner(interpreter, display, input)
//!       |-- poll input; enter toggles run/pause, esc quits
//!       |-- feed held keys into the keypad
//!       |-- interpreter.step() x (instructions per second / 60)
//!       |-- interpreter.tick_timers()
//!       |-- redraw if the framebuffer changed
//!       `-- sleep out the rest of the 60th of a second
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod quirks;
pub mod run;

pub use error::MachineError;
pub use interpreter::Chip8Interpreter;
pub use quirks::Quirks;
