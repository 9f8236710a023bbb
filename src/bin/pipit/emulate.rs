// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Drives the [Chip8] at a fixed frame rate, with a window attached

use crate::{error::Result, ui::*, Arguments};
use pipit::*;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct State {
    pub speed: usize,
    pub rate: u64,
    pub ch8: Chip8,
    pub ui: UI,
    pub ft: Instant,
}

impl State {
    pub fn new(options: &Arguments) -> Result<Self> {
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate.max(1),
            ch8: Chip8 {
                cpu: CPU::new(&options.file, options.flags())?,
                screen: Screen::default(),
            },
            ui: UIBuilder::new(64, 32, &options.file).build()?,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.ch8)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.ch8)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        run_frame(&mut self.ch8, self.speed)
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

/// Runs up to `speed` instructions, then ticks the timers once.
///
/// A zeroed word is the end of the program, and pauses the [Chip8].
pub fn run_frame(ch8: &mut Chip8, speed: usize) -> Result<()> {
    for _ in 0..speed {
        match ch8.step()? {
            Tick::Ran(_) => (),
            Tick::Unimplemented { word: 0 } => {
                eprintln!("End of program at {:03x}. Paused.", ch8.cpu.pc());
                ch8.cpu.flags.pause = true;
                break;
            }
            Tick::Unimplemented { word } => {
                return Err(Error::UnimplementedInstruction { word }.into())
            }
            Tick::Paused => break,
        }
    }
    // the timers run at the frame rate, whatever the cpu is doing
    ch8.cpu.tick_timers();
    Ok(())
}

impl Iterator for State {
    type Item = Result<()>;

    /// Runs one frame. Ends when the window closes
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        if let Err(e) = self.tick_cpu() {
            return Some(Err(e));
        }
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_program_pauses() {
        let mut ch8 = Chip8::new();
        ch8.load_rom(&[0x60, 0x01, 0xf0, 0x15]).unwrap();
        run_frame(&mut ch8, 10).unwrap();
        assert!(ch8.cpu.flags.pause);
        assert_eq!(0x204, ch8.cpu.pc());
        // v0 went into the delay timer, which ticked once
        assert_eq!(0, ch8.cpu.delay());
        // later frames stay paused
        run_frame(&mut ch8, 10).unwrap();
        assert_eq!(0x204, ch8.cpu.pc());
    }

    #[test]
    fn unknown_word_is_an_error() {
        let mut ch8 = Chip8::new();
        ch8.load_rom(&[0xff, 0xff]).unwrap();
        assert!(matches!(
            run_frame(&mut ch8, 10),
            Err(crate::error::Error::Pipit(
                Error::UnimplementedInstruction { word: 0xffff }
            ))
        ));
    }
}
