// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs a ROM without a window, then prints the screen to the terminal
use gumdrop::*;
use owo_colors::OwoColorize;
use pipit::{error::Result, *};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to run", free, required)]
    pub file: PathBuf,
    #[options(help = "Number of frames to run for.", default = "60")]
    pub frames: usize,
    #[options(help = "Set the instructions-per-frame rate.", default = "10")]
    pub speed: usize,
    #[options(help = "Run in (Chip8, Cosmac) mode.")]
    pub mode: Option<Mode>,
    #[options(help = "Seed the random number generator.", meta = "SEED")]
    pub seed: Option<u64>,
    #[options(help = "Print the CPU state after the run.")]
    pub dump: bool,
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let cpu = CPU::new(
        &std::fs::read(&options.file)?,
        vec![],
        Flags {
            quirks: options.mode.unwrap_or_default().into(),
            ..Default::default()
        },
    )?;
    let io = options.seed.map_or_else(Headless::new, Headless::seeded);
    let mut ch8 = Chip8::new(cpu, io);

    for frame in 0..options.frames {
        if let Err(e) = ch8.frame(options.speed) {
            eprintln!("{}", format_args!("frame {frame}: {e}").bold().red());
            break;
        }
        // Nobody is around to press a key
        if ch8.cpu.flags.keypause {
            eprintln!("{}", format_args!("frame {frame}: waiting for a key").yellow());
            break;
        }
    }
    ch8.io.screen.print_screen();
    if options.dump {
        ch8.cpu.dump();
    }
    Ok(())
}
