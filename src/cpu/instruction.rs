// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains the definition of a Chip-8 [Insn]

pub mod disassembler;

use super::opcode::Opcode;
use std::fmt::Display;

#[allow(non_camel_case_types, missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// One decoded instruction of the base Chip-8 instruction set
pub enum Insn {
    /// | 00e0 | Clear screen memory to 0s
    cls,
    /// | 00ee | Return from subroutine
    ret,
    /// | 1aaa | Jumps to an absolute address
    jmp { a: u16 },
    /// | 2aaa | Pushes pc onto the stack, then jumps to a
    call { a: u16 },
    /// | 3xbb | Skips next instruction if register X == b
    seb { x: usize, b: u8 },
    /// | 4xbb | Skips next instruction if register X != b
    sneb { x: usize, b: u8 },
    /// | 5xy0 | Skip next instruction if vX == vY
    se { x: usize, y: usize },
    /// | 6xbb | Loads immediate byte b into register vX
    movb { x: usize, b: u8 },
    /// | 7xbb | Adds immediate byte b to register vX
    addb { x: usize, b: u8 },
    /// | 8xy0 | Loads the value of y into x
    mov { x: usize, y: usize },
    /// | 8xy1 | Performs bitwise or of vX and vY, and stores the result in vX
    or { x: usize, y: usize },
    /// | 8xy2 | Performs bitwise and of vX and vY, and stores the result in vX
    and { x: usize, y: usize },
    /// | 8xy3 | Performs bitwise xor of vX and vY, and stores the result in vX
    xor { x: usize, y: usize },
    /// | 8xy4 | Performs addition of vX and vY, and stores the result in vX
    add { x: usize, y: usize },
    /// | 8xy5 | Performs subtraction of vX and vY, and stores the result in vX
    sub { x: usize, y: usize },
    /// | 8xy6 | Performs bitwise right shift of vX (or vY)
    shr { x: usize, y: usize },
    /// | 8xy7 | Performs subtraction of vY and vX, and stores the result in vX
    bsub { x: usize, y: usize },
    /// | 8xyE | Performs bitwise left shift of vX (or vY)
    shl { x: usize, y: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    sne { x: usize, y: usize },
    /// | Aaaa | Load address #a into register I
    movI { a: u16 },
    /// | Baaa | Jump to &adr + v0
    jmpr { a: u16 },
    /// | Cxbb | Stores a random number & the provided byte into vX
    rand { x: usize, b: u8 },
    /// | Dxyn | Draws n-byte sprite to the screen at coordinates (vX, vY)
    draw { x: usize, y: usize, n: u8 },
    /// | eX9e | Skip next instruction if key == vX
    sek { x: usize },
    /// | eXa1 | Skip next instruction if key != vX
    snek { x: usize },
    /// | fX07 | Set vX to value in delay timer
    getdt { x: usize },
    /// | fX0a | Wait for input, store key in vX
    waitk { x: usize },
    /// | fX15 | Set delay timer to the value in vX
    setdt { x: usize },
    /// | fX18 | Set sound timer to the value in vX
    movst { x: usize },
    /// | fX1e | Add vX to I
    addI { x: usize },
    /// | fX29 | Load sprite for character x into I
    font { x: usize },
    /// | fX33 | BCD convert X into I[0..3]
    bcd { x: usize },
    /// | fX55 | DMA Stor from registers 0..=X to I
    dmao { x: usize },
    /// | fX65 | DMA Load from I to registers 0..=X
    dmai { x: usize },
}

impl Insn {
    /// Decodes an [Opcode] into an [Insn]
    ///
    /// Dispatches on the top nibble, then on the low byte or nibble for
    /// the `0`, `5`, `8`, `9`, `E` and `F` families.
    /// Returns [None] if the word is not part of the instruction set.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// assert_eq!(Some(Insn::draw { x: 1, y: 2, n: 5 }), Insn::decode(Opcode(0xd125)));
    /// assert_eq!(None, Insn::decode(Opcode(0x800f)));
    /// ```
    #[rustfmt::skip]
    pub fn decode(op: Opcode) -> Option<Self> {
        let (a, x, y, n, b) = (op.nnn(), op.x(), op.y(), op.n(), op.kk());
        Some(match op.family() {
            0x0 => match op.word() {
                0x00e0 => Insn::cls,
                0x00ee => Insn::ret,
                _ => return None,
            },
            0x1 => Insn::jmp { a },
            0x2 => Insn::call { a },
            0x3 => Insn::seb { x, b },
            0x4 => Insn::sneb { x, b },
            0x5 if n == 0 => Insn::se { x, y },
            0x6 => Insn::movb { x, b },
            0x7 => Insn::addb { x, b },
            0x8 => match n {
                0x0 => Insn::mov  { x, y },
                0x1 => Insn::or   { x, y },
                0x2 => Insn::and  { x, y },
                0x3 => Insn::xor  { x, y },
                0x4 => Insn::add  { x, y },
                0x5 => Insn::sub  { x, y },
                0x6 => Insn::shr  { x, y },
                0x7 => Insn::bsub { x, y },
                0xe => Insn::shl  { x, y },
                _ => return None,
            },
            0x9 if n == 0 => Insn::sne { x, y },
            0xa => Insn::movI { a },
            0xb => Insn::jmpr { a },
            0xc => Insn::rand { x, b },
            0xd => Insn::draw { x, y, n },
            0xe => match b {
                0x9e => Insn::sek  { x },
                0xa1 => Insn::snek { x },
                _ => return None,
            },
            0xf => match b {
                0x07 => Insn::getdt { x },
                0x0a => Insn::waitk { x },
                0x15 => Insn::setdt { x },
                0x18 => Insn::movst { x },
                0x1e => Insn::addI  { x },
                0x29 => Insn::font  { x },
                0x33 => Insn::bcd   { x },
                0x55 => Insn::dmao  { x },
                0x65 => Insn::dmai  { x },
                _ => return None,
            },
            _ => return None,
        })
    }
}

impl TryFrom<Opcode> for Insn {
    type Error = Opcode;
    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        Insn::decode(value).ok_or(value)
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::cls               => write!(f, "cls    "),
            Insn::ret               => write!(f, "ret    "),
            Insn::jmp { a }         => write!(f, "jmp    {a:03x}"),
            Insn::call { a }        => write!(f, "call   {a:03x}"),
            Insn::seb { x, b }      => write!(f, "se     #{b:02x}, v{x:X}"),
            Insn::sneb { x, b }     => write!(f, "sne    #{b:02x}, v{x:X}"),
            Insn::se { x, y }       => write!(f, "se     v{y:X}, v{x:X}"),
            Insn::movb { x, b }     => write!(f, "mov    #{b:02x}, v{x:X}"),
            Insn::addb { x, b }     => write!(f, "add    #{b:02x}, v{x:X}"),
            Insn::mov { x, y }      => write!(f, "mov    v{y:X}, v{x:X}"),
            Insn::or { x, y }       => write!(f, "or     v{y:X}, v{x:X}"),
            Insn::and { x, y }      => write!(f, "and    v{y:X}, v{x:X}"),
            Insn::xor { x, y }      => write!(f, "xor    v{y:X}, v{x:X}"),
            Insn::add { x, y }      => write!(f, "add    v{y:X}, v{x:X}"),
            Insn::sub { x, y }      => write!(f, "sub    v{y:X}, v{x:X}"),
            Insn::shr { x, y }      => write!(f, "shr    v{y:X}, v{x:X}"),
            Insn::bsub { x, y }     => write!(f, "bsub   v{y:X}, v{x:X}"),
            Insn::shl { x, y }      => write!(f, "shl    v{y:X}, v{x:X}"),
            Insn::sne { x, y }      => write!(f, "sne    v{y:X}, v{x:X}"),
            Insn::movI { a }        => write!(f, "mov    ${a:03x}, I"),
            Insn::jmpr { a }        => write!(f, "jmp    ${a:03x}+v0"),
            Insn::rand { x, b }     => write!(f, "rand   #{b:02x}, v{x:X}"),
            Insn::draw { x, y, n }  => write!(f, "draw   #{n:x}, v{x:X}, v{y:X}"),
            Insn::sek { x }         => write!(f, "sek    v{x:X}"),
            Insn::snek { x }        => write!(f, "snek   v{x:X}"),
            Insn::getdt { x }       => write!(f, "mov    DT, v{x:X}"),
            Insn::waitk { x }       => write!(f, "waitk  v{x:X}"),
            Insn::setdt { x }       => write!(f, "mov    v{x:X}, DT"),
            Insn::movst { x }       => write!(f, "mov    v{x:X}, ST"),
            Insn::addI { x }        => write!(f, "add    v{x:X}, I"),
            Insn::font { x }        => write!(f, "font   v{x:X}, I"),
            Insn::bcd { x }         => write!(f, "bcd    v{x:X}, &I"),
            Insn::dmao { x }        => write!(f, "dmao   v{x:X}"),
            Insn::dmai { x }        => write!(f, "dmai   v{x:X}"),
        }
    }
}
