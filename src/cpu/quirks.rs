//! Controls the [Quirks] behavior of the CPU on a granular level.

use super::Mode;

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is the behavior most modern programs (and test roms) expect.
/// `true` is Cosmac-VIP-like behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quirks {
    /// Cosmac VIP: Shift ops in `8xy`(`6`, `E`) source from vY instead of vX
    pub shift_vy: bool,
    /// Cosmac VIP: DMA instructions `Fx55`/`Fx65` leave I at I + x + 1
    pub dma_inc: bool,
    /// Cosmac VIP: Binary ops in `8xy`(`1`, `2`, `3`) set vF to 0
    pub vf_reset: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        Quirks {
            shift_vy: value,
            dma_inc: value,
            vf_reset: value,
        }
    }
}

impl From<Mode> for Quirks {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Chip8 => false.into(),
            Mode::Cosmac => true.into(),
        }
    }
}
