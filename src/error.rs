use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter from completing a step or a load,
/// plus the i/o failures of the terminal driving it.
///
/// None of these abort the process; the driver decides whether to halt,
/// reset or report.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("stack overflow: CALL at {pc:#05x} with all 16 stack slots in use")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: RET at {pc:#05x} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at {address:#06x}")]
    MemoryOutOfBounds { address: usize },

    #[error("program is {size} bytes, but only {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("unsupported instruction {opcode:#06x} at {address:#05x}")]
    UnsupportedInstruction { opcode: u16, address: u16 },

    #[error("{key:#04x} is not a key on the hex keypad")]
    InvalidKey { key: u8 },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MachineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_show_addresses_in_hex() {
        let e = MachineError::MemoryOutOfBounds { address: 0x1000 };
        assert_eq!(e.to_string(), "memory access out of bounds at 0x1000");

        let e = MachineError::UnsupportedInstruction {
            opcode: 0x5121,
            address: 0x202,
        };
        assert_eq!(e.to_string(), "unsupported instruction 0x5121 at 0x202");
    }

    #[test]
    fn test_io_error_converts() {
        let e: MachineError = io::Error::new(io::ErrorKind::NotFound, "nope").into();
        assert!(matches!(e, MachineError::Io(_)));
    }
}
