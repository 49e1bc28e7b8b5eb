use crate::error::{MachineError, Result};
use log::info;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the machine's address space. Every access is bounds-checked;
/// nothing wraps around the end of memory.
pub trait MemoryMap {
    /// total addressable bytes
    fn size(&self) -> usize;

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]>;

    /// write a chunk of bytes; either all of it lands or none of it does
    fn write(&mut self, data: &[u8], addr: u16) -> Result<()> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    fn read_byte(&self, addr: u16) -> Result<u8> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<()> {
        self.get_rw_slice(addr, 1)?[0] = value;
        Ok(())
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> Result<u16> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest program image that fits between the load address and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the hex digit glyphs live, and how many bytes each one takes
pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map (4K configuration):
///   0x0000-0x004f  unused
///   0x0050-0x009f  font
///   0x00a0-0x01ff  unused
///   0x0200-0x0fff  program
pub struct Chip8MemoryMap {
    bytes: Box<[u8; CHIP8_RAM_SIZE_BYTES]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]> {
        let range = checked_range(addr, len, self.bytes.len())?;
        Ok(&mut self.bytes[range])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let range = checked_range(addr, len, self.bytes.len())?;
        Ok(&self.bytes[range])
    }
}

/// the requested address is what gets reported, even when only its tail is out of range
fn checked_range(addr: u16, len: usize, size: usize) -> Result<std::ops::Range<usize>> {
    let start = addr as usize;
    let end = start + len;
    if end > size {
        return Err(MachineError::MemoryOutOfBounds { address: start });
    }
    Ok(start..end)
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; CHIP8_RAM_SIZE_BYTES]);
        let font_start = CHIP8_FONT_ADDR as usize;
        bytes[font_start..font_start + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8MemoryMap { bytes }
    }

    /// load a CHIP-8 program at 0x200; refuses images that don't fit before
    /// touching memory
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(MachineError::ProgramTooLarge {
                size: program.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(program, CHIP8_PROGRAM_ADDR)?;
        info!("loaded {} byte program at {:#05x}", program.len(), CHIP8_PROGRAM_ADDR);
        Ok(())
    }

    /// load a program of unknown length from a reader (e.g. a ROM file)
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<()> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_program(&buf)
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

/// address of the glyph for a hex digit; only the low nibble counts
pub fn glyph_addr(digit: u8) -> u16 {
    CHIP8_FONT_ADDR + (digit & 0x0f) as u16 * CHIP8_FONT_GLYPH_BYTES
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
