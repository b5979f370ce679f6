// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Pipit: A chip-8 interpreter in Rust
//! Hello, world!

mod ui;

use gumdrop::*;
use owo_colors::OwoColorize;
use pipit::{error::Error::BreakpointHit, error::Result, *};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let state = State::new(options)?;
    for result in state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    Ok(())
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value.trim_start_matches("0x"), 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Pipit.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10")]
    pub speed: usize,

    #[options(help = "Run in (Chip8, Cosmac) mode.")]
    pub mode: Option<Mode>,

    #[options(
        short = "z",
        help = "Toggle setting vF to 0 after a bitwise operation."
    )]
    pub vfreset: bool,

    #[options(
        short = "c",
        help = "Toggle Cosmac VIP style DMA instructions, which leave I past the end."
    )]
    pub memory: bool,

    #[options(
        short = "v",
        help = "Toggle Cosmac VIP style bit-shifts, which shift vY into vX."
    )]
    pub shift: bool,

    #[options(
        long = "break",
        help = "Set breakpoints for the emulator to stop at.",
        parse(try_from_str = "parse_hex"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,

    #[options(help = "Seed the random number generator.", meta = "SEED")]
    pub seed: Option<u64>,

    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}

#[derive(Debug)]
struct State {
    pub speed: usize,
    pub rate: u64,
    pub cpu: CPU,
    pub ui: UI,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut cpu = CPU::new(
            &std::fs::read(&options.file)?,
            options.breakpoints,
            Flags {
                quirks: options.mode.unwrap_or_default().into(),
                debug: options.debug,
                pause: options.pause,
                ..Default::default()
            },
        )?;
        // Flip the state of the quirks
        cpu.flags.quirks.vf_reset ^= options.vfreset;
        cpu.flags.quirks.dma_inc ^= options.memory;
        cpu.flags.quirks.shift_vy ^= options.shift;
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate.max(1),
            cpu,
            ui: UIBuilder::new(&options.file).seed(options.seed).build()?,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.cpu)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&self.cpu)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        if !self.cpu.flags.pause {
            self.cpu.multistep(&mut self.ui, self.speed)?;
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame: input, then `speed` instructions, then output
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        // Allow breakpoint hit messages
        match self.tick_cpu() {
            Err(BreakpointHit { addr, next }) => {
                eprintln!("Breakpoint hit: {:3x} ({:4x})", addr, next);
            }
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
