// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 interpreter as if it were a real CPU architecture.
//!
//! [Decoded::classify] is the one opcode decoder, shared by the [CPU] and the
//! [disassemble]r, so the two can never disagree about what a word means.
//!
//! # Examples
//! ```rust
//! use pipit::*;
//! let mut ch8 = Chip8::new();
//! ch8.load_rom(&[
//!     0x6a, 0x12, // mov #12, vA
//!     0x7a, 0x05, // add #05, vA
//! ])?;
//! ch8.step()?;
//! ch8.step()?;
//! assert_eq!(0x17, ch8.cpu.v()[0xa]);
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]

pub mod cpu;
pub mod error;
pub mod screen;
pub mod traits;

// Common imports for pipit
pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{disassemble, render_line, Dis, Disassembler},
        Decoded, Insn,
    },
    mem::{Mem, Region, Region::*, FONT},
    quirks::Quirks,
    Tick, CPU,
};
pub use error::{Error, Result};
pub use screen::Screen;
pub use traits::{FallibleAutoCast, Grab};

/// Holds the state of a Chip-8: the [CPU] (with its memory), and the [Screen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chip8 {
    /// Contains the registers, timers, keys, and memory of the Chip-8
    pub cpu: CPU,
    /// Contains the display buffer
    pub screen: Screen,
}

impl Chip8 {
    /// Constructs a freshly reset Chip-8, with the font loaded and no program
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the machine, clears the screen, and loads `rom` at 0x200
    ///
    /// If the ROM can't be loaded, the machine is left as it was.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let mut cpu = self.cpu.clone();
        cpu.reset();
        cpu.load_program_bytes(rom)?;
        self.cpu = cpu;
        self.screen.clear();
        Ok(self)
    }

    /// Runs exactly one fetch-decode-execute cycle. See [CPU::tick]
    pub fn step(&mut self) -> Result<Tick> {
        self.cpu.tick(&mut self.screen)
    }
}
