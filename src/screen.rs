// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! The screen is a 64x32 grid of 1-bit pixels, packed 8 to a byte, most significant bit leftmost.
//! The interpreter is its only writer. A presentation layer pulls finished frames with
//! [Screen::frame], which only yields when something was drawn since the last pull.

use crate::traits::Grab;
use std::slice::SliceIndex;

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;
/// Size of the packed screen buffer, in bytes
pub const SIZE: usize = WIDTH * HEIGHT / 8;

/// The Chip-8's monochrome display buffer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    bytes: [u8; SIZE],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            bytes: [0; SIZE],
            dirty: false,
        }
    }
}

impl Grab<u8> for Screen {
    fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.bytes.get(index)
    }

    fn grab_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.dirty = true;
        self.bytes.get_mut(index)
    }
}

impl Screen {
    /// Constructs a blank screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the packed screen buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Clears every pixel, and marks the screen dirty
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut screen = Screen::default();
    /// screen.toggle(3, 4);
    /// screen.clear();
    /// assert!(screen.as_slice().iter().all(|&byte| byte == 0));
    /// ```
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.dirty = true;
    }

    /// Gets the pixel at (x, y), wrapping coordinates around the edges
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x, y);
        self.bytes[byte] & mask != 0
    }

    /// Flips the pixel at (x, y), wrapping coordinates around the edges.
    ///
    /// Returns true if the pixel was turned off (a collision)
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x, y);
        let was_set = self.bytes[byte] & mask != 0;
        self.bytes[byte] ^= mask;
        self.dirty = true;
        was_set
    }

    /// XORs an 8-pixel-wide sprite onto the screen with its top-left corner at (x, y).
    ///
    /// Every pixel wraps independently. Returns true if any pixel went from set to unset.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut screen = Screen::default();
    /// assert!(!screen.draw_sprite(62, 0, &[0xf0]));
    /// // the sprite wrapped around to the left edge
    /// assert!(screen.pixel(0, 0) && screen.pixel(1, 0) && !screen.pixel(2, 0));
    /// assert!(screen.draw_sprite(62, 0, &[0xf0]));
    /// ```
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, &line) in sprite.iter().enumerate() {
            for col in (0..8).filter(|col| line & (0x80 >> col) != 0) {
                collision |= self.toggle(x as usize + col, y as usize + row);
            }
        }
        self.dirty = true;
        collision
    }

    /// Reports whether the screen changed since the last [Screen::frame]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Publishes a copy of the screen if it changed since the last call, and clears the dirty flag.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut screen = Screen::default();
    /// assert_eq!(None, screen.frame());
    /// screen.toggle(0, 0);
    /// assert_eq!(Some(0x80), screen.frame().map(|frame| frame[0]));
    /// assert_eq!(None, screen.frame());
    /// ```
    pub fn frame(&mut self) -> Option<[u8; SIZE]> {
        if std::mem::take(&mut self.dirty) {
            Some(self.bytes)
        } else {
            None
        }
    }

    /// Prints the screen at 1bpp using box characters
    pub fn print_screen(&self) {
        // draw with the drawille library, if available
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            (0..HEIGHT)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| self.pixel(x, y))
                .for_each(|(x, y)| canvas.set(x as u32, y as u32));
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        for (index, line) in self.bytes.chunks(WIDTH / 8).enumerate() {
            print!("{:02}|", index);
            for byte in line {
                print!(
                    "{}",
                    format!("{byte:08b}").replace('0', " ").replace('1', "█")
                );
            }
            println!("|");
        }
    }

    /// Finds the byte index and bit mask of the pixel at (x, y)
    #[inline(always)]
    fn locate(x: usize, y: usize) -> (usize, u8) {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        (y * WIDTH / 8 + x / 8, 0x80 >> (x % 8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_collides() {
        let mut screen = Screen::default();
        assert!(!screen.toggle(10, 10));
        assert!(screen.pixel(10, 10));
        assert!(screen.toggle(10, 10));
        assert!(!screen.pixel(10, 10));
    }

    #[test]
    fn coordinates_wrap() {
        let mut screen = Screen::default();
        screen.toggle(WIDTH + 1, HEIGHT + 2);
        assert!(screen.pixel(1, 2));
        assert_eq!(screen.as_slice()[2 * WIDTH / 8], 0x40);
    }

    #[test]
    fn sprite_wraps_vertically() {
        let mut screen = Screen::default();
        screen.draw_sprite(0, 31, &[0x80, 0x80]);
        assert!(screen.pixel(0, 31));
        assert!(screen.pixel(0, 0));
    }

    #[test]
    fn redraw_erases() {
        let mut screen = Screen::default();
        let sprite = [0xf0, 0x90, 0x90, 0x90, 0xf0];
        assert!(!screen.draw_sprite(5, 7, &sprite));
        assert!(screen.draw_sprite(5, 7, &sprite));
        assert_eq!(screen, {
            let mut blank = Screen::default();
            blank.dirty = true;
            blank
        });
    }

    #[test]
    fn empty_sprite_publishes() {
        let mut screen = Screen::default();
        assert!(!screen.draw_sprite(0, 0, &[]));
        assert!(screen.frame().is_some());
    }

    #[test]
    fn print_screen() {
        let mut screen = Screen::default();
        screen.draw_sprite(0, 0, &[0xaa, 0x55]);
        screen.print_screen();
    }
}
