// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Pipit

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Pipit.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents a breakpoint being hit
    #[error("breakpoint hit: {addr:03x} ({next:04x})")]
    BreakpointHit {
        /// The address of the breakpoint
        addr: u16,
        /// The instruction after the breakpoint
        next: u16,
    },
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} at {addr:03x} not recognized")]
    UnimplementedInstruction {
        /// The address of the offending word
        addr: u16,
        /// The offending word
        word: u16,
    },
    /// A subroutine call was made with every stack slot in use
    #[error("stack overflow: call at {addr:03x} exceeds 16 levels")]
    StackOverflow {
        /// The address of the offending call
        addr: u16,
    },
    /// A return was made with nothing on the stack
    #[error("stack underflow: return at {addr:03x} with empty stack")]
    StackUnderflow {
        /// The address of the offending return
        addr: u16,
    },
    /// The program does not fit in program memory
    #[error("program is {len} bytes, but only {max} bytes fit in memory")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Space available from the program start to the end of memory
        max: usize,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into mode, but it did not match.
    #[error("no suitable conversion of \"{mode}\" into Mode")]
    InvalidMode {
        /// The string which failed to become a mode
        mode: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}
