use crate::error::{MachineError, Result};

/// number of keys on the COSMAC VIP hex keypad
pub const CHIP8_KEY_COUNT: usize = 16;

/// Up/down state of the 16 hex keys, as last reported by the driver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    down: [bool; CHIP8_KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: u8) -> Result<()> {
        *self.slot(key)? = true;
        Ok(())
    }

    pub fn key_up(&mut self, key: u8) -> Result<()> {
        *self.slot(key)? = false;
        Ok(())
    }

    pub fn release_all(&mut self) {
        self.down = [false; CHIP8_KEY_COUNT];
    }

    /// programs hand us whatever is in a register; only the low nibble names a key
    pub fn is_down(&self, key: u8) -> bool {
        self.down[(key & 0x0f) as usize]
    }

    /// lowest numbered key currently held, if any
    pub fn first_down(&self) -> Option<u8> {
        self.down.iter().position(|d| *d).map(|k| k as u8)
    }

    fn slot(&mut self, key: u8) -> Result<&mut bool> {
        self.down
            .get_mut(key as usize)
            .ok_or(MachineError::InvalidKey { key })
    }
}
