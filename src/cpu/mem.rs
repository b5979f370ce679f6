// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing.
//! Every address is taken modulo [MEMORY_SIZE], so reads and writes through I
//! can never fall off the end of memory.

use crate::error::{Error, Result};
use std::{
    fmt::{Debug, Formatter},
    ops::Range,
};

/// Total addressable memory, in bytes
pub const MEMORY_SIZE: usize = 0x1000;
/// Where programs are loaded, and where execution begins
pub const PROGRAM_START: u16 = 0x200;
/// Where the hex font is loaded
pub const FONT_START: u16 = 0x000;
/// Bytes per font glyph
pub const GLYPH_SIZE: u16 = 5;

/// The hex font, 16 glyphs of 4x5 pixels
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
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

#[inline(always)]
fn wrap(addr: impl Into<usize>) -> usize {
    addr.into() % MEMORY_SIZE
}

/// 4 KiB of byte-addressed memory, with the font preloaded
#[derive(Clone, PartialEq, Eq)]
pub struct Mem {
    memory: Box<[u8; MEMORY_SIZE]>,
}

impl Default for Mem {
    /// Zeroed memory with the font loaded at [FONT_START]
    fn default() -> Self {
        let mut mem = Mem {
            memory: Box::new([0; MEMORY_SIZE]),
        };
        mem.load(FONT_START, &FONT);
        mem
    }
}

impl Mem {
    /// Constructs a new mem, with the font loaded
    /// # Examples
    /// ```rust
    ///# use pipit::*;
    ///     let mem = Mem::new();
    ///     assert_eq!(0xF0, mem.read(0x000u16));
    /// ```
    pub fn new() -> Self {
        Mem::default()
    }

    /// Gets the length of the backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Memory is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Loads a program into memory at [PROGRAM_START]
    ///
    /// Returns [Error::ProgramTooLarge] if the program would run off the end of memory.
    /// Memory is left untouched on error.
    /// # Examples
    /// ```rust
    ///# use pipit::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new();
    ///     mem.load_program(&[0x00, 0xe0])?;
    ///     assert_eq!(0x00e0, mem.read_word(0x200u16));
    ///     assert!(mem.load_program(&[0; 0xe01]).is_err());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load_program(&mut self, program: &[u8]) -> Result<&mut Self> {
        let max = MEMORY_SIZE - PROGRAM_START as usize;
        if program.len() > max {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                max,
            });
        }
        self.clear(PROGRAM_START as usize..MEMORY_SIZE);
        self.load(PROGRAM_START, program);
        Ok(self)
    }

    /// Copies `data` into memory at `addr`, wrapping at the end of memory
    pub fn load(&mut self, addr: u16, data: &[u8]) -> &mut Self {
        for (offset, &byte) in data.iter().enumerate() {
            self.write(addr as usize + offset, byte);
        }
        self
    }

    /// Fills a range of memory with zeroes
    pub fn clear(&mut self, range: Range<usize>) -> &mut Self {
        if let Some(slice) = self.memory.get_mut(range) {
            slice.fill(0);
        }
        self
    }

    /// Reads the byte at `addr`
    #[inline(always)]
    pub fn read(&self, addr: impl Into<usize>) -> u8 {
        self.memory[wrap(addr)]
    }

    /// Writes `data` to the byte at `addr`
    #[inline(always)]
    pub fn write(&mut self, addr: impl Into<usize>, data: u8) {
        self.memory[wrap(addr)] = data;
    }

    /// Reads a big-endian word at `addr`
    #[inline(always)]
    pub fn read_word(&self, addr: impl Into<usize>) -> u16 {
        let addr = addr.into();
        u16::from_be_bytes([self.read(addr), self.read(addr + 1)])
    }

    /// Writes a big-endian word at `addr`
    pub fn write_word(&mut self, addr: impl Into<usize>, data: u16) {
        let addr = addr.into();
        let [hi, lo] = data.to_be_bytes();
        self.write(addr, hi);
        self.write(addr + 1, lo);
    }

    /// Copies `len` bytes starting at `addr` into `buf`, wrapping at the end of memory
    pub fn read_into(&self, addr: impl Into<usize>, buf: &mut [u8]) {
        let addr = addr.into();
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self.read(addr + offset);
        }
    }

    /// Gets a slice of memory, if it's entirely in range
    pub fn get(&self, range: Range<usize>) -> Option<&[u8]> {
        self.memory.get(range)
    }
}

impl Debug for Mem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem")
            .field("len", &self.len())
            .field("font", &&self.memory[..FONT.len()])
            .finish_non_exhaustive()
    }
}
