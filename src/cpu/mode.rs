//! Selects the quirk preset of the [super::CPU]

use crate::error::Error;
use std::{fmt::Display, str::FromStr};

/// Selects which family of interpreters to imitate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Modern Chip-8 behavior
    #[default]
    Chip8,
    /// The original Cosmac VIP interpreter
    Cosmac,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chip8" | "chip-8" => Ok(Mode::Chip8),
            "cosmac" | "vip" | "cosmac-vip" => Ok(Mode::Cosmac),
            _ => Err(Error::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Chip8 => write!(f, "Chip-8"),
            Mode::Cosmac => write!(f, "Cosmac VIP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Mode::Chip8, "CHIP-8".parse::<Mode>().unwrap());
        assert_eq!(Mode::Cosmac, "vip".parse::<Mode>().unwrap());
        assert!(matches!(
            "xo-chip".parse::<Mode>(),
            Err(Error::InvalidMode { .. })
        ));
    }
}
