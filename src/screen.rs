// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! One byte per pixel, `0` or `1`, row-major.
//! Sprites wrap around both edges of the screen.

use std::fmt::{Debug, Display, Formatter};

/// Screen width, in pixels
pub const WIDTH: usize = 64;
/// Screen height, in pixels
pub const HEIGHT: usize = 32;

/// A monochrome framebuffer
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Screen {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new(WIDTH, HEIGHT)
    }
}

impl Screen {
    /// Creates a blank screen of the given dimensions
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero, since coordinates wrap
    /// modulo the screen size.
    pub fn new(width: usize, height: usize) -> Screen {
        assert!(
            width > 0 && height > 0,
            "screen must be at least 1x1, got {width}x{height}"
        );
        Screen {
            pixels: vec![0; width * height],
            width,
            height,
            dirty: false,
        }
    }

    /// Screen width, in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Screen height, in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Gets the pixel at (x, y), wrapping both coordinates
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[self.index(x, y)] != 0
    }

    /// Whether the screen has changed since [Screen::take_dirty] was last called
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reports whether the screen has changed, and clears the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Clears every pixel
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.dirty = true;
    }

    /// XORs an 8-pixel-wide sprite onto the screen at (x, y)
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Returns true if any lit pixel was turned off.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut screen = Screen::default();
    /// assert!(!screen.blit(&[0xff], 0, 0));
    /// // drawing the same sprite again erases it, and collides
    /// assert!(screen.blit(&[0xff], 0, 0));
    /// assert!(screen.pixels().iter().all(|&px| px == 0));
    /// ```
    pub fn blit(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let mut collision = false;
        for (row, &line) in sprite.iter().enumerate() {
            for col in 0..8 {
                if line & (0x80 >> col) == 0 {
                    continue;
                }
                let index = self.index(x as usize + col, y as usize + row);
                collision |= self.pixels[index] != 0;
                self.pixels[index] ^= 1;
            }
        }
        self.dirty = true;
        collision
    }

    /// Prints the screen at 1bpp using braille characters
    #[cfg(feature = "drawille")]
    pub fn print_screen(&self) {
        use drawille::Canvas;
        let mut canvas = Canvas::new(self.width as u32, self.height as u32);
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, &px)| px != 0)
            .for_each(|(index, _)| {
                canvas.set((index % self.width) as u32, (index / self.width) as u32)
            });
        println!("{}", canvas.frame());
    }

    /// Prints the screen at 1bpp using box characters
    #[cfg(not(feature = "drawille"))]
    pub fn print_screen(&self) {
        println!("{self}");
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.chunks(self.width) {
            for &px in row {
                write!(f, "{}", if px != 0 { '█' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lit", &self.pixels.iter().filter(|&&px| px != 0).count())
            .field("dirty", &self.dirty)
            .finish()
    }
}
