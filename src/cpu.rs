// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod mode;
pub mod opcode;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, PROGRAM_START},
    mode::Mode,
    opcode::Opcode,
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    io::Peripheral,
};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Number of return addresses the stack can hold
pub const STACK_SIZE: usize = 16;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], debug, pause, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    stack: [Adr; STACK_SIZE],
    sp: u8,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // Execution data
    cycle: usize,
    breakpoints: Vec<Adr>,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU with `rom` loaded, taking all configurable parameters
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// # fn main() -> Result<()> {
    /// let cpu = CPU::new(
    ///     &[0x00, 0xe0], // program
    ///     vec![],        // breakpoints
    ///     Flags::default(),
    /// )?;
    /// assert_eq!(0x200, cpu.pc());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(rom: &[u8], breakpoints: Vec<Adr>, flags: Flags) -> Result<Self> {
        let mut cpu = CPU {
            breakpoints,
            flags,
            ..Default::default()
        };
        cpu.load_program_bytes(rom)?;
        Ok(cpu)
    }

    /// Loads a program from a file into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space
    ///
    /// Returns [Error::ProgramTooLarge] if `rom` doesn't fit between
    /// the program start and the end of memory.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert!(cpu.load_program_bytes(&[0; 0xe00]).is_ok());
    /// assert!(cpu.load_program_bytes(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_program(rom)?;
        Ok(self)
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the number of return addresses on the stack
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Gets the occupied part of the stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp as usize]
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Whether the sound timer is running, i.e. whether a host should beep
    pub fn is_beeping(&self) -> bool {
        self.sound > 0
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the CPU's memory, mutably
    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Gets the number of cycles the CPU has executed
    ///
    /// If cpu.flags.monotonic is set, the cycle count will be
    /// updated even when the CPU is paused
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Replaces the quirk set with a [Mode]'s preset
    pub fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.flags.quirks = Quirks::from(mode);
        self
    }

    /// Soft resets the CPU, releasing keypause and
    /// reinitializing the program counter to 0x200
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.flags.keypause = true;
    /// cpu.soft_reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(false, cpu.flags.keypause);
    /// ```
    pub fn soft_reset(&mut self) {
        self.pc = PROGRAM_START;
        self.flags.keypause = false;
    }

    /// Resets the emulator.
    ///
    /// Touches the [Flags] (keypause, dirty), stack, pc, registers,
    /// timers, and cycle count.
    ///
    /// Does not touch [Quirks], breakpoints, or memory.
    pub fn reset(&mut self) {
        self.flags = Flags {
            keypause: false,
            dirty: false,
            ..self.flags.clone()
        };
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.pc = PROGRAM_START;
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        self.cycle = 0;
    }

    /// Set a breakpoint
    pub fn set_break(&mut self, point: Adr) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point)
        }
        self
    }

    /// Unset a breakpoint
    pub fn unset_break(&mut self, point: Adr) -> &mut Self {
        self.breakpoints.retain(|&bp| bp != point);
        self
    }

    /// Gets a slice of breakpoints
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert!(cpu.breakpoints().is_empty());
    /// cpu.set_break(0x202);
    /// assert_eq!(cpu.breakpoints(), &[0x202]);
    /// ```
    pub fn breakpoints(&self) -> &[Adr] {
        self.breakpoints.as_slice()
    }

    /// Decrements the delay and sound timers toward zero
    ///
    /// Should be called 60 times a second, regardless of how
    /// many instructions are executed in between.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.tick_timers();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::UnimplementedInstruction]
    /// if the instruction is unimplemented. A drawing made by the stepped
    /// instruction is presented even when it lands on a breakpoint.
    ///
    /// NOTE: does not synchronize with delay timers
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::new(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ], vec![], Flags::default())?;
    /// let mut io = Headless::new();
    /// cpu.singlestep(&mut io)?;
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// # Ok(())
    /// # }
    /// ```
    pub fn singlestep<P: Peripheral + ?Sized>(&mut self, io: &mut P) -> Result<&mut Self> {
        let paused = std::mem::replace(&mut self.flags.pause, false);
        let result = self.tick(io).map(|_| ());
        // a breakpoint may have paused us in the meantime
        self.flags.pause |= paused;
        if let Err(e) = result {
            if let Error::BreakpointHit { .. } = e {
                self.present(io)?;
            }
            return Err(e);
        }
        self.present(io)?;
        Ok(self)
    }

    /// Runs `steps` instructions, then ticks the timers once and
    /// presents the screen if anything was drawn.
    ///
    /// This is one frame's worth of work for a host running at 60Hz.
    /// The timers hold still while the CPU is paused.
    ///
    /// A [Error::BreakpointHit] ends the instruction loop early, but the frame
    /// still finishes: the timers tick (unless the CPU was already paused when
    /// the frame began) and the screen is presented before the breakpoint is
    /// returned. Any other error is returned at once, without ticking the
    /// timers or presenting.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::new(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ], vec![], Flags::default())?;
    /// let mut io = Headless::new();
    /// cpu.multistep(&mut io, 0x20)?;
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// assert_eq!(1, io.frames());
    /// # Ok(())
    /// # }
    /// ```
    pub fn multistep<P: Peripheral + ?Sized>(
        &mut self,
        io: &mut P,
        steps: usize,
    ) -> Result<&mut Self> {
        let running = !self.flags.is_paused();
        let mut hit = None;
        for _ in 0..steps {
            match self.tick(io) {
                Ok(_) => (),
                Err(e @ Error::BreakpointHit { .. }) => {
                    hit = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        if running {
            self.tick_timers();
        }
        self.present(io)?;
        match hit {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// Executes a single instruction
    ///
    /// Returns [Error::BreakpointHit] if a breakpoint was hit after the instruction executed.
    /// This result contains information about the breakpoint, but can be safely ignored.
    ///
    /// Returns [Error::UnimplementedInstruction] if the instruction at `pc` is unimplemented,
    /// and [Error::StackOverflow] or [Error::StackUnderflow] if a call or return
    /// would leave the stack. In every error case, `pc` still points at the
    /// offending instruction.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::new(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ], vec![], Flags::default())?;
    /// cpu.tick(&mut Headless::new())?;
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// # Ok(())
    /// # }
    /// ```
    /// Returns [Error::UnimplementedInstruction] if the instruction is not implemented.
    /// ```rust
    /// # use pipit::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::new(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ], vec![], Flags::default())?;
    /// cpu.tick(&mut Headless::new())
    ///     .expect_err("Should return Error::UnimplementedInstruction { 0xffff }");
    /// assert_eq!(0x200, cpu.pc());
    /// # Ok(())
    /// # }
    /// ```
    pub fn tick<P: Peripheral + ?Sized>(&mut self, io: &mut P) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.is_paused() {
            // always tick in test mode
            if self.flags.monotonic {
                self.cycle += 1;
            }
            return Ok(self);
        }
        self.cycle += 1;
        let addr = self.pc;
        let opcode = self.fetch();

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                addr,
                self.disassembler.once(opcode.word())
            );
        }

        // decode opcode
        let insn = Insn::decode(opcode).ok_or(Error::UnimplementedInstruction {
            addr,
            word: opcode.word(),
        })?;
        self.pc = self.pc.wrapping_add(2) & 0xfff;
        if let Err(e) = self.execute(io, insn) {
            self.pc = addr;
            return Err(e);
        }

        // process breakpoints
        if !self.breakpoints.is_empty() && self.breakpoints.contains(&self.pc) {
            self.flags.pause = true;
            return Err(Error::BreakpointHit {
                addr: self.pc,
                next: self.mem.read_word(self.pc),
            });
        }
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

// private helpers
impl CPU {
    /// Reads the big-endian word at pc
    #[inline(always)]
    fn fetch(&self) -> Opcode {
        Opcode(self.mem.read_word(self.pc))
    }

    /// Hands the screen to the host, if it changed
    fn present<P: Peripheral + ?Sized>(&mut self, io: &mut P) -> Result<()> {
        if std::mem::take(&mut self.flags.dirty) {
            io.present()?;
        }
        Ok(())
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("mem", &self.mem)
            .field("stack", &self.stack())
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("cycle", &self.cycle)
            .field("breakpoints", &self.breakpoints)
            .field("disassembler", &self.disassembler)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use pipit::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            stack: [0; STACK_SIZE],
            sp: 0,
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            cycle: 0,
            breakpoints: vec![],
            disassembler: Dis::default(),
        }
    }
}
