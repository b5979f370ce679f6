// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Splits a 16-bit instruction word into its operand fields
//!
//! Every word decodes, even the ones that aren't instructions.
//! Deciding what a word *means* is [Insn](super::instruction::Insn)'s job.

use std::fmt::{Display, Formatter, LowerHex, UpperHex};

/// A raw, big-endian instruction word
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Builds an opcode from two bytes, high byte first
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let op = Opcode::from_be_bytes([0xd1, 0x25]);
    /// assert_eq!(0xd125, op.word());
    /// ```
    #[inline]
    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
    /// Gets the whole word
    #[inline]
    pub fn word(self) -> u16 {
        self.0
    }
    /// Top nibble, which selects the instruction family
    #[inline]
    pub fn family(self) -> u8 {
        (self.0 >> 12 & 0xf) as u8
    }
    /// Low 12 bits: the address operand
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// assert_eq!(0x345, Opcode(0x2345).nnn());
    /// ```
    #[inline]
    pub fn nnn(self) -> u16 {
        self.0 & 0x0fff
    }
    /// Low nibble: sprite height, or the sub-operation of an ALU op
    #[inline]
    pub fn n(self) -> u8 {
        (self.0 & 0xf) as u8
    }
    /// Bits 8..12: the first register index
    #[inline]
    pub fn x(self) -> usize {
        (self.0 >> 8 & 0xf) as usize
    }
    /// Bits 4..8: the second register index
    #[inline]
    pub fn y(self) -> usize {
        (self.0 >> 4 & 0xf) as usize
    }
    /// Low byte: the immediate operand
    #[inline]
    pub fn kk(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl From<u16> for Opcode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Opcode> for u16 {
    fn from(value: Opcode) -> Self {
        value.0
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl LowerHex for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(&self.0, f)
    }
}

impl UpperHex for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        UpperHex::fmt(&self.0, f)
    }
}
