/// # Opcodes
///
/// CHIP-8 instructions are 16 bits, big-endian. Fields are positional:
/// - `[o___]` `op`, the instruction class
/// - `[_x__]` `x`, the first register operand (or the range V0..=Vx)
/// - `[__y_]` `y`, the second register operand
/// - `[___n]` `n`, a 4-bit immediate / sub-operation
/// - `[__nn]` `nn`, an 8-bit immediate / sub-operation
/// - `[_nnn]` `nnn`, a 12-bit address
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub raw: u16,
    pub op: u8,
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Opcode {
            raw,
            op: ((raw & 0xF000) >> 12) as u8,
            x: ((raw & 0x0F00) >> 8) as usize,
            y: ((raw & 0x00F0) >> 4) as usize,
            n: (raw & 0x000F) as u8,
            nn: (raw & 0x00FF) as u8,
            nnn: raw & 0x0FFF,
        }
    }
}

impl Opcode {
    /// assembler-style name of the instruction, used for tracing
    pub fn mnemonic(&self) -> String {
        let (x, y, n, nn, nnn) = (self.x, self.y, self.n, self.nn, self.nnn);
        match (self.op, n, nn) {
            (0x0, _, 0xE0) if nnn == 0x0E0 => "CLS".to_string(),
            (0x0, _, 0xEE) if nnn == 0x0EE => "RET".to_string(),
            (0x1, _, _) => format!("JP {:#05x}", nnn),
            (0x2, _, _) => format!("CALL {:#05x}", nnn),
            (0x3, _, _) => format!("SE V{:X}, {:#04x}", x, nn),
            (0x4, _, _) => format!("SNE V{:X}, {:#04x}", x, nn),
            (0x5, 0x0, _) => format!("SE V{:X}, V{:X}", x, y),
            (0x6, _, _) => format!("LD V{:X}, {:#04x}", x, nn),
            (0x7, _, _) => format!("ADD V{:X}, {:#04x}", x, nn),
            (0x8, 0x0, _) => format!("LD V{:X}, V{:X}", x, y),
            (0x8, 0x1, _) => format!("OR V{:X}, V{:X}", x, y),
            (0x8, 0x2, _) => format!("AND V{:X}, V{:X}", x, y),
            (0x8, 0x3, _) => format!("XOR V{:X}, V{:X}", x, y),
            (0x8, 0x4, _) => format!("ADD V{:X}, V{:X}", x, y),
            (0x8, 0x5, _) => format!("SUB V{:X}, V{:X}", x, y),
            (0x8, 0x6, _) => format!("SHR V{:X}, V{:X}", x, y),
            (0x8, 0x7, _) => format!("SUBN V{:X}, V{:X}", x, y),
            (0x8, 0xE, _) => format!("SHL V{:X}, V{:X}", x, y),
            (0x9, 0x0, _) => format!("SNE V{:X}, V{:X}", x, y),
            (0xA, _, _) => format!("LD I, {:#05x}", nnn),
            (0xB, _, _) => format!("JP V0, {:#05x}", nnn),
            (0xC, _, _) => format!("RND V{:X}, {:#04x}", x, nn),
            (0xD, _, _) => format!("DRW V{:X}, V{:X}, {}", x, y, n),
            (0xE, _, 0x9E) => format!("SKP V{:X}", x),
            (0xE, _, 0xA1) => format!("SKNP V{:X}", x),
            (0xF, _, 0x07) => format!("LD V{:X}, DT", x),
            (0xF, _, 0x0A) => format!("LD V{:X}, K", x),
            (0xF, _, 0x15) => format!("LD DT, V{:X}", x),
            (0xF, _, 0x18) => format!("LD ST, V{:X}", x),
            (0xF, _, 0x1E) => format!("ADD I, V{:X}", x),
            (0xF, _, 0x29) => format!("LD F, V{:X}", x),
            (0xF, _, 0x33) => format!("LD B, V{:X}", x),
            (0xF, _, 0x55) => format!("LD [I], V{:X}", x),
            (0xF, _, 0x65) => format!("LD V{:X}, [I]", x),
            _ => format!("??? {:04x}", self.raw),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x} {}", self.raw, self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let op = Opcode::from(0xABCD);
        assert_eq!(op.op, 0xA);
        assert_eq!(op.x, 0xB);
        assert_eq!(op.y, 0xC);
        assert_eq!(op.n, 0xD);
        assert_eq!(op.nn, 0xCD);
        assert_eq!(op.nnn, 0xBCD);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Opcode::from(0x00E0).mnemonic(), "CLS");
        assert_eq!(Opcode::from(0x00EE).mnemonic(), "RET");
        assert_eq!(Opcode::from(0x1200).mnemonic(), "JP 0x200");
        assert_eq!(Opcode::from(0x8AB4).mnemonic(), "ADD VA, VB");
        assert_eq!(Opcode::from(0xD125).mnemonic(), "DRW V1, V2, 5");
        assert_eq!(Opcode::from(0xF355).mnemonic(), "LD [I], V3");
    }

    #[test]
    fn test_unknown_encodings() {
        // 0nnn machine code calls and gaps in the 5/8/9 classes aren't instructions
        assert_eq!(Opcode::from(0x0123).mnemonic(), "??? 0123");
        assert_eq!(Opcode::from(0x5121).mnemonic(), "??? 5121");
        assert_eq!(Opcode::from(0x8128).mnemonic(), "??? 8128");
    }

    #[test]
    fn test_display_has_raw_word() {
        assert_eq!(Opcode::from(0x6a42).to_string(), "6a42 LD VA, 0x42");
    }
}
