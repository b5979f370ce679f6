// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints a listing of a Chip-8 ROM, one instruction per line
use gumdrop::*;
use owo_colors::OwoColorize;
use pipit::{error::Result, *};
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(
        help = "Load address (usually 200)",
        default = "200",
        parse(try_from_str = "parse_hex")
    )]
    pub loadaddr: u16,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
    #[options(help = "Print without colors")]
    pub plain: bool,
}

fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value.trim_start_matches("0x"), 16)
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    let disassembler = if options.plain {
        Dis::plain()
    } else {
        Dis::default()
    };
    let start = usize::from(options.loadaddr) + options.offset;
    let body = contents.get(options.offset..).unwrap_or_default();
    for (index, pair) in body.chunks(2).enumerate() {
        // An odd trailing byte is listed as the high half of a word
        let word = u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or_default()]);
        println!(
            "{:03x}: {} {:04x}",
            (start + 2 * index) % 0x1000,
            disassembler.once(word),
            word.bright_black(),
        );
    }
    Ok(())
}
