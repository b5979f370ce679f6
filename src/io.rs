// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The surface between the CPU and the outside world
//!
//! The CPU never owns its peripherals. The host picks a [Peripheral] at
//! construction time, and lends it to the CPU on every [tick](crate::CPU::tick).

use crate::{
    error::{Error, Result},
    screen::Screen,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Everything the CPU needs from its host
///
/// Reads must never block: the only instruction which waits (`Fx0A`) does so
/// by re-running itself on the next tick.
pub trait Peripheral {
    /// Gets a uniformly distributed random byte
    fn random_byte(&mut self) -> u8;
    /// Gets the currently held keys, one bit per key `0x0..=0xF`
    fn key_state(&mut self) -> u16;
    /// Clears the framebuffer
    fn clear(&mut self);
    /// XORs a sprite onto the framebuffer, returning true on collision
    fn blit(&mut self, sprite: &[u8], x: u8, y: u8) -> bool;
    /// Shows the framebuffer to the user
    fn present(&mut self) -> Result<()>;
}

/// Held-key bookkeeping shared by every [Peripheral] in this crate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Keypad {
    keys: u16,
}

impl Keypad {
    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut keypad = Keypad::default();
    ///
    /// // press key `7`
    /// let did_press = keypad.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = keypad.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let bit = Self::bit(key)?;
        let changed = self.keys & bit == 0;
        self.keys |= bit;
        Ok(changed)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut keypad = Keypad::default();
    /// keypad.press(0x7).unwrap();
    /// assert!(keypad.release(0x7).unwrap());
    /// // try releasing `7` again
    /// assert!(!keypad.release(0x7).unwrap());
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let bit = Self::bit(key)?;
        let changed = self.keys & bit != 0;
        self.keys &= !bit;
        Ok(changed)
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.keys = 0;
    }

    /// Replaces the whole key mask at once
    pub fn set(&mut self, keys: u16) {
        self.keys = keys;
    }

    /// Whether `key` is held
    pub fn is_pressed(&self, key: usize) -> bool {
        Self::bit(key).map_or(false, |bit| self.keys & bit != 0)
    }

    /// The held keys, one bit per key
    pub fn mask(&self) -> u16 {
        self.keys
    }

    fn bit(key: usize) -> Result<u16> {
        match key {
            0..=0xf => Ok(1 << key),
            _ => Err(Error::InvalidKey { key }),
        }
    }
}

/// Where random bytes come from
#[derive(Clone, Debug, Default)]
enum Entropy {
    /// [rand::random], reseeded by the OS
    #[default]
    Thread,
    /// A deterministic generator, for reproducible runs
    Seeded(StdRng),
}

/// A [Peripheral] with no window and no keyboard
///
/// The framebuffer, keys and random source are all in memory,
/// so tests and tools can poke at them directly.
#[derive(Clone, Debug, Default)]
pub struct Headless {
    /// The framebuffer
    pub screen: Screen,
    /// The held keys
    pub keypad: Keypad,
    entropy: Entropy,
    frames: usize,
}

impl Headless {
    /// A headless peripheral backed by the thread RNG
    pub fn new() -> Self {
        Self::default()
    }

    /// A headless peripheral whose random bytes are reproducible
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let (mut a, mut b) = (Headless::seeded(8), Headless::seeded(8));
    /// assert_eq!(a.random_byte(), b.random_byte());
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self {
            entropy: Entropy::Seeded(StdRng::seed_from_u64(seed)),
            ..Default::default()
        }
    }

    /// How many times [Peripheral::present] has been called
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Peripheral for Headless {
    fn random_byte(&mut self) -> u8 {
        match &mut self.entropy {
            Entropy::Thread => rand::random(),
            Entropy::Seeded(rng) => rng.gen(),
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
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release() {
        let mut keypad = Keypad::default();
        assert!(keypad.press(0xf).unwrap());
        assert!(keypad.press(0x0).unwrap());
        assert_eq!(keypad.mask(), 0x8001);
        assert!(keypad.is_pressed(0xf));
        assert!(keypad.release(0xf).unwrap());
        assert_eq!(keypad.mask(), 0x0001);
        keypad.release_all();
        assert_eq!(keypad.mask(), 0);
    }

    #[test]
    fn invalid_key() {
        let mut keypad = Keypad::default();
        assert!(matches!(
            keypad.press(0x10),
            Err(Error::InvalidKey { key: 0x10 })
        ));
        assert!(matches!(
            keypad.release(0x10),
            Err(Error::InvalidKey { key: 0x10 })
        ));
        assert!(!keypad.is_pressed(0x10));
    }

    #[test]
    fn headless_keys() {
        let mut io = Headless::new();
        io.keypad.press(0xa).unwrap();
        assert_eq!(io.key_state(), 1 << 0xa);
    }

    #[test]
    fn seeded_is_reproducible() {
        let (mut a, mut b) = (Headless::seeded(0xc8), Headless::seeded(0xc8));
        for _ in 0..64 {
            assert_eq!(a.random_byte(), b.random_byte());
        }
    }

    #[test]
    fn present_counts_frames() {
        let mut io = Headless::new();
        io.blit(&[0x80], 0, 0);
        assert!(io.screen.is_dirty());
        io.present().unwrap();
        io.present().unwrap();
        assert_eq!(io.frames(), 2);
        assert!(!io.screen.is_dirty());
    }
}
