/// # interpreter
///
/// The CHIP-8 virtual machine as seen by a program:
///  - V0..VF  16 8-bit data registers; VF doubles as carry/borrow/collision flag
///  - I       16-bit index register, pointer into memory
///  - PC      16-bit program counter, starts at 0x200
///  - stack   16 return addresses, with a stack pointer
///  - DT, ST  delay and sound timers, counted down at 60Hz by whoever drives us
///  - 4K of memory with the font at 0x050, and a 64x32 monochrome display
///
/// A driver calls `step()` repeatedly; each call runs exactly one
/// fetch/decode/execute cycle to completion. If a step fails it leaves the
/// machine as it was before the step, PC still pointing at the instruction
/// that failed.
use crate::error::{MachineError, Result};
use crate::framebuffer::{FrameBuffer, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH};
use crate::keypad::Keypad;
use crate::memory::{self, Chip8MemoryMap, MemoryMap, CHIP8_PROGRAM_ADDR};
use crate::opcode::Opcode;
use crate::quirks::Quirks;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// nested subroutine calls the stack can hold
pub const CHIP8_STACK_DEPTH: usize = 16;

/// highest address an I-relative access can reach
const CHIP8_MAX_ADDR: u16 = 0x0fff;

const VF: usize = 0xf;

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    frame: FrameBuffer,
    keypad: Keypad,
    quirks: Quirks,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; CHIP8_STACK_DEPTH],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    rng: StdRng,
    redraw: bool,
}

impl Chip8Interpreter {
    pub fn new(quirks: Quirks) -> Self {
        Self::with_rng(quirks, StdRng::from_entropy())
    }

    /// same program, same seed, same random numbers
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Self::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(quirks: Quirks, rng: StdRng) -> Self {
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            frame: FrameBuffer::new(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT, quirks.draw_wrap),
            keypad: Keypad::new(),
            quirks,
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: [0; CHIP8_STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            rng,
            redraw: true,
        }
    }

    /// load a chip8 program at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)
    }

    /// load a chip8 program from a file or any other reader
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<()> {
        self.memory.load_program_from(reader)
    }

    /// run one fetch/decode/execute cycle
    pub fn step(&mut self) -> Result<()> {
        let address = self.pc;
        let opcode = Opcode::from(self.memory.get_word(address)?);
        trace!("fetched {:04x} at {:#05x}", opcode.raw, address);
        self.pc = address.wrapping_add(2);
        debug!("{:#05x}: {}", address, opcode);

        let res = self.execute(opcode, address);
        if res.is_err() {
            self.pc = address;
        }
        res
    }

    fn execute(&mut self, op: Opcode, address: u16) -> Result<()> {
        let (x, y) = (op.x, op.y);
        let unsupported = MachineError::UnsupportedInstruction {
            opcode: op.raw,
            address,
        };

        match op.op {
            0x0 => match op.nnn {
                0x0E0 => {
                    self.frame.clear();
                    self.redraw = true;
                }
                0x0EE => self.return_from_subroutine(address)?,
                _ => return Err(unsupported),
            },
            0x1 => self.pc = op.nnn,
            0x2 => self.call_subroutine(op.nnn, address)?,
            0x3 => self.skip_if(self.v[x] == op.nn),
            0x4 => self.skip_if(self.v[x] != op.nn),
            0x5 if op.n == 0 => self.skip_if(self.v[x] == self.v[y]),
            0x6 => self.v[x] = op.nn,
            0x7 => self.v[x] = self.v[x].wrapping_add(op.nn),
            0x8 => self.alu(op).ok_or(unsupported)?,
            0x9 if op.n == 0 => self.skip_if(self.v[x] != self.v[y]),
            0xA => self.i = op.nnn,
            0xB => {
                let offset = if self.quirks.jump_uses_vx {
                    self.v[x]
                } else {
                    self.v[0]
                };
                self.pc = op.nnn + offset as u16;
            }
            0xC => self.v[x] = self.rng.gen::<u8>() & op.nn,
            0xD => self.draw(x, y, op.n)?,
            0xE => match op.nn {
                0x9E => self.skip_if(self.keypad.is_down(self.v[x])),
                0xA1 => self.skip_if(!self.keypad.is_down(self.v[x])),
                _ => return Err(unsupported),
            },
            0xF => match op.nn {
                0x07 => self.v[x] = self.delay_timer,
                // a key already held when the wait starts satisfies it; there is
                // no press-then-release edge as on the VIP
                0x0A => match self.keypad.first_down() {
                    Some(key) => self.v[x] = key,
                    // no key yet; run this instruction again next step
                    None => self.pc = address,
                },
                0x15 => self.delay_timer = self.v[x],
                0x18 => self.sound_timer = self.v[x],
                0x1E => {
                    self.i = self.i.wrapping_add(self.v[x] as u16);
                    // VF is only ever raised here, never cleared
                    if self.quirks.index_overflow_sets_vf && self.i > CHIP8_MAX_ADDR {
                        self.v[VF] = 1;
                    }
                }
                0x29 => self.i = memory::glyph_addr(self.v[x]),
                0x33 => {
                    let vx = self.v[x];
                    self.memory
                        .write(&[vx / 100, vx / 10 % 10, vx % 10], self.i)?;
                }
                0x55 => {
                    self.memory.write(&self.v[..=x], self.i)?;
                    self.advance_index(x);
                }
                0x65 => {
                    let src = self.memory.get_ro_slice(self.i, x + 1)?;
                    self.v[..=x].copy_from_slice(src);
                    self.advance_index(x);
                }
                _ => return Err(unsupported),
            },
            _ => return Err(unsupported),
        }
        Ok(())
    }

    /// the 8xyN register-to-register class; None for an N it doesn't define
    fn alu(&mut self, op: Opcode) -> Option<()> {
        let (x, y) = (op.x, op.y);
        let (vx, vy) = (self.v[x], self.v[y]);
        let shift_src = if self.quirks.shift_uses_vy { vy } else { vx };

        // flag first, then the result, so 8Fxy leaves the result in VF
        let (flag, result) = match op.n {
            0x0 => (None, vy),
            0x1 => (None, vx | vy),
            0x2 => (None, vx & vy),
            0x3 => (None, vx ^ vy),
            0x4 => {
                let (sum, carry) = vx.overflowing_add(vy);
                (Some(carry as u8), sum)
            }
            0x5 => (Some((vx >= vy) as u8), vx.wrapping_sub(vy)),
            0x6 => (Some(shift_src & 0x01), shift_src >> 1),
            0x7 => (Some((vy >= vx) as u8), vy.wrapping_sub(vx)),
            0xE => (Some(shift_src >> 7), shift_src << 1),
            _ => return None,
        };
        if let Some(flag) = flag {
            self.v[VF] = flag;
        }
        self.v[x] = result;
        Some(())
    }

    fn draw(&mut self, x: usize, y: usize, height: u8) -> Result<()> {
        let rows = self.memory.get_ro_slice(self.i, height as usize)?;
        let collision = self.frame.draw_sprite(self.v[x], self.v[y], rows);
        self.v[VF] = collision as u8;
        self.redraw = true;
        Ok(())
    }

    fn call_subroutine(&mut self, addr: u16, address: u16) -> Result<()> {
        if self.sp == CHIP8_STACK_DEPTH {
            return Err(MachineError::StackOverflow { pc: address });
        }
        self.sp += 1;
        self.stack[self.sp - 1] = self.pc;
        self.pc = addr;
        Ok(())
    }

    fn return_from_subroutine(&mut self, address: u16) -> Result<()> {
        if self.sp == 0 {
            return Err(MachineError::StackUnderflow { pc: address });
        }
        self.pc = self.stack[self.sp - 1];
        self.stack[self.sp - 1] = 0;
        self.sp -= 1;
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn advance_index(&mut self, x: usize) {
        if self.quirks.load_store_increments_i {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }

    /// count both timers down by one; call at 60Hz
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    pub fn key_down(&mut self, key: u8) -> Result<()> {
        self.keypad.key_down(key)
    }

    pub fn key_up(&mut self, key: u8) -> Result<()> {
        self.keypad.key_up(key)
    }

    pub fn release_all_keys(&mut self) {
        self.keypad.release_all();
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.frame
    }

    /// true once after anything touched the display
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn stack_depth(&self) -> usize {
        self.sp
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new(Quirks::default())
    }
}
