// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture.
//!
//! The [CPU] owns memory, registers, the stack and the timers. Everything it
//! touches outside of itself (the screen, the keypad, and the random source)
//! lives behind the [Peripheral] trait, which the host lends it every tick.
//!
//! # Examples
//! ```rust
//! use pipit::*;
//! # fn main() -> Result<()> {
//! let mut ch8 = Chip8 {
//!     cpu: CPU::new(&[
//!         0x60, 0x05, // mov    #05, v0
//!         0xf0, 0x29, // font   v0, I
//!         0xd1, 0x15, // draw   #5, v1, v1
//!         0x12, 0x06, // jmp    $206
//!     ], vec![], Flags::default())?,
//!     io: Headless::new(),
//! };
//! ch8.frame(10)?;
//! // The glyph for 5 is on screen
//! assert!(ch8.io.screen.get(0, 0));
//! assert_eq!(0x206, ch8.cpu.pc());
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]

pub mod cpu;
pub mod error;
pub mod io;
pub mod screen;

pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::Mem,
    mode::Mode,
    opcode::Opcode,
    quirks::Quirks,
    CPU,
};
pub use error::{Error, Result};
pub use io::{Headless, Keypad, Peripheral};
pub use screen::Screen;

/// Holds the state of a Chip-8, along with the peripheral it's wired to
#[derive(Clone, Debug, Default)]
pub struct Chip8<P = Headless> {
    /// Contains the registers, timers, and memory
    pub cpu: CPU,
    /// Contains the screen, keys, and random source
    pub io: P,
}

impl<P: Peripheral> Chip8<P> {
    /// Wires a [CPU] to a [Peripheral]
    pub fn new(cpu: CPU, io: P) -> Self {
        Self { cpu, io }
    }

    /// Executes a single instruction. See [CPU::tick]
    pub fn tick(&mut self) -> Result<()> {
        self.cpu.tick(&mut self.io)?;
        Ok(())
    }

    /// Runs one frame of `steps` instructions. See [CPU::multistep]
    pub fn frame(&mut self, steps: usize) -> Result<()> {
        self.cpu.multistep(&mut self.io, steps)?;
        Ok(())
    }
}

/// Common imports for pipit
pub mod prelude {
    pub use super::{
        Chip8, Dis, Disassembler, Error, Flags, Headless, Insn, Keypad, Mem, Mode, Opcode,
        Peripheral, Quirks, Result, Screen, CPU,
    };
}
