/// Points where CHIP-8 dialects disagree. `Quirks::default()` is the
/// original COSMAC VIP interpreter; `Quirks::chip48()` flips the forks the
/// CHIP-48 / SUPER-CHIP interpreters changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6 / 8xyE shift Vy into Vx (VIP) rather than shifting Vx in place
    pub shift_uses_vy: bool,
    /// Fx55 / Fx65 leave I pointing past the last register transferred
    pub load_store_increments_i: bool,
    /// Bnnn jumps to nnn + Vx, x being the top nibble of nnn, instead of nnn + V0
    pub jump_uses_vx: bool,
    /// Fx1E reports I running past 0xFFF in VF
    pub index_overflow_sets_vf: bool,
    /// sprites running off an edge reappear on the opposite edge
    pub draw_wrap: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_uses_vy: true,
            load_store_increments_i: true,
            jump_uses_vx: false,
            index_overflow_sets_vf: true,
            draw_wrap: false,
        }
    }
}

impl Quirks {
    pub fn chip48() -> Self {
        Quirks {
            shift_uses_vy: false,
            load_store_increments_i: false,
            jump_uses_vx: true,
            ..Quirks::default()
        }
    }
}
