// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::Instant,
};

use minifb::*;
use pipit::{error::Result, screen, Keypad, Peripheral, Screen, CPU};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub seed: Option<u64>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    pub fn seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            keypad: Default::default(),
            screen: Screen::new(self.width, self.height),
            fb: FrameBuffer::new(self.width, self.height),
            rng: self.seed.map(StdRng::seed_from_u64),
            rom: self.rom.to_owned().unwrap_or_default(),
            presented: false,
            time: Instant::now(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: screen::WIDTH,
            height: screen::HEIGHT,
            name: Some("Pipit"),
            rom: None,
            seed: None,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001E2431,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let format = FrameBufferFormat::default();
        FrameBuffer {
            buffer: vec![format.bg; width * height],
            width,
            height,
            format,
        }
    }
    pub fn render(&mut self, window: &mut Window, screen: &Screen) -> Result<()> {
        for (px, &lit) in self.buffer.iter_mut().zip(screen.pixels()) {
            *px = if lit != 0 {
                self.format.fg
            } else {
                self.format.bg
            };
        }
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}

/// A window, a keyboard, and a random source, wired up as a [Peripheral]
#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    keypad: Keypad,
    screen: Screen,
    fb: FrameBuffer,
    rng: Option<StdRng>,
    rom: PathBuf,
    presented: bool,
    time: Instant,
}

impl Peripheral for UI {
    fn random_byte(&mut self) -> u8 {
        match &mut self.rng {
            Some(rng) => rng.gen(),
            None => rand::random(),
        }
    }

    fn key_state(&mut self) -> u16 {
        self.keypad.mask()
    }

    fn clear(&mut self) {
        self.screen.clear()
    }

    fn blit(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        self.screen.blit(sprite, x, y)
    }

    fn present(&mut self) -> Result<()> {
        self.screen.take_dirty();
        self.presented = true;
        self.fb.render(&mut self.window, &self.screen)
    }
}

impl UI {
    /// Finishes a frame. Returns false when the window has been closed.
    pub fn frame(&mut self, cpu: &CPU) -> Result<bool> {
        if cpu.flags.pause {
            self.window.set_title("Pipit ⏸")
        } else {
            self.window.set_title(&format!(
                "Pipit ▶ {:02.02}{}",
                (1.0 / self.time.elapsed().as_secs_f64()),
                if cpu.is_beeping() { " ♪" } else { "" },
            ));
        }
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // Nothing was drawn, but the window still needs its events pumped
        if !std::mem::take(&mut self.presented) {
            self.window.update();
        }
        Ok(true)
    }

    /// Handles keypresses. Returns false when the user asked to quit.
    pub fn keys(&mut self, cpu: &mut CPU) -> Result<bool> {
        let keys = self.window.get_keys();
        let released: Vec<Key> = self
            .keyboard
            .iter()
            .filter(|key| !keys.contains(key))
            .copied()
            .collect();
        let pressed: Vec<Key> = keys
            .iter()
            .filter(|key| !self.keyboard.contains(key))
            .copied()
            .collect();
        for key in released {
            if let Some(key) = identify_key(key) {
                self.keypad.release(key)?;
            }
        }
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                F1 | Comma => cpu.dump(),
                F2 | Period => self.screen.print_screen(),
                F3 => debug_dump_screen(cpu, &self.screen, &self.rom)?,
                F4 | Slash => {
                    eprintln!("Debug {}.", {
                        cpu.flags.debug();
                        if cpu.flags.debug {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    })
                }
                F5 | Backslash => eprintln!("{}.", {
                    cpu.flags.pause();
                    if cpu.flags.pause {
                        "Paused"
                    } else {
                        "Unpaused"
                    }
                }),
                F6 | Enter => {
                    eprintln!("Step");
                    cpu.singlestep(self)?;
                }
                F7 => {
                    eprintln!("Set breakpoint {:03x}.", cpu.pc());
                    cpu.set_break(cpu.pc());
                }
                F8 => {
                    eprintln!("Unset breakpoint {:03x}.", cpu.pc());
                    cpu.unset_break(cpu.pc());
                }
                F9 | Delete => {
                    eprintln!("Soft reset state.cpu {:03x}", cpu.pc());
                    cpu.soft_reset();
                    self.clear();
                }
                F12 => {
                    eprintln!("Reset state.cpu");
                    cpu.reset();
                    self.clear();
                }
                Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        self.keypad.press(key)?;
                    }
                }
            }
        }
        self.keyboard = keys;
        Ok(true)
    }
}

/// Maps the left side of a QWERTY keyboard onto the hex keypad
///
/// ```text
/// 1 2 3 4     1 2 3 C
/// Q W E R  →  4 5 6 D
/// A S D F     7 8 9 E
/// Z X C V     A 0 B F
/// ```
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

/// Writes the screen to `<rom name>.<cycle>.bin`, one byte per pixel
pub fn debug_dump_screen(cpu: &CPU, screen: &Screen, rom: &Path) -> Result<()> {
    let path = PathBuf::from(format!(
        "{}.{}.bin",
        rom.file_stem()
            .unwrap_or(OsStr::new("unknown"))
            .to_string_lossy(),
        cpu.cycle()
    ));
    std::fs::write(&path, screen.pixels())?;
    eprintln!("Saved to {}", &path.display());
    Ok(())
}
