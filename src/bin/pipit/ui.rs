// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use crate::error::Result;
use minifb::*;
use pipit::{
    screen::{HEIGHT, SIZE, WIDTH},
    Chip8,
};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width,
            height,
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
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
            fb: Default::default(),
            rom: self.rom.to_owned().unwrap_or_default(),
            time: Instant::now(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: WIDTH,
            height: HEIGHT,
            name: Some("Pipit"),
            rom: None,
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
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new() -> Self {
        let format = FrameBufferFormat::default();
        FrameBuffer {
            buffer: vec![format.bg; WIDTH * HEIGHT],
            format,
        }
    }
    /// Unpacks a published frame, one u32 per pixel
    pub fn render(&mut self, frame: &[u8; SIZE]) {
        for (idx, byte) in frame.iter().enumerate() {
            for bit in 0..8 {
                self.buffer[8 * idx + bit] = if byte & (0x80 >> bit) != 0 {
                    self.format.fg
                } else {
                    self.format.bg
                }
            }
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    rom: PathBuf,
    time: Instant,
}

impl UI {
    pub fn frame(&mut self, ch8: &mut Chip8) -> Result<bool> {
        if ch8.cpu.flags.pause {
            self.window.set_title("Pipit ⏸")
        } else {
            self.window.set_title(&format!(
                "Pipit  ▶ {:02.02}{}",
                (1.0 / self.time.elapsed().as_secs_f64()),
                if ch8.cpu.sound_active() { " ♪" } else { "" }
            ));
        }
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // only redraw when something was drawn
        match ch8.screen.frame() {
            Some(frame) => {
                self.fb.render(&frame);
                self.window
                    .update_with_buffer(&self.fb.buffer, WIDTH, HEIGHT)?;
            }
            None => self.window.update(),
        }
        Ok(true)
    }

    pub fn keys(&mut self, ch8: &mut Chip8) -> Result<bool> {
        // minifb's get_keys_pressed/released lose keys between frames; diff by hand
        let get_keys_pressed = || {
            self.window
                .get_keys()
                .into_iter()
                .filter(|key| !self.keyboard.contains(key))
        };
        let get_keys_released = || {
            self.keyboard
                .clone()
                .into_iter()
                .filter(|key| !self.window.get_keys().contains(key))
        };
        for key in get_keys_released() {
            if let Some(key) = identify_key(key) {
                ch8.cpu.release(key)?;
            }
        }
        // handle keybinds for the UI
        for key in get_keys_pressed() {
            use Key::*;
            match key {
                F1 | Comma => ch8.cpu.dump(),
                F2 | Period => ch8.screen.print_screen(),
                F3 => print!("{}", ch8.cpu.mem()),
                F4 | Slash => {
                    eprintln!("Debug {}.", {
                        ch8.cpu.flags.debug();
                        if ch8.cpu.flags.debug {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    })
                }
                F5 | Backslash => eprintln!("{}.", {
                    ch8.cpu.flags.pause();
                    if ch8.cpu.flags.pause {
                        "Paused"
                    } else {
                        "Unpaused"
                    }
                }),
                F6 | Enter => {
                    eprintln!("Step");
                    ch8.cpu.singlestep(&mut ch8.screen)?;
                }
                F9 | Delete => {
                    eprintln!("Reset at {:03x}", ch8.cpu.pc());
                    ch8.load_rom(&std::fs::read(&self.rom)?)?;
                }
                Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        ch8.cpu.press(key)?;
                    }
                }
            }
        }
        self.keyboard = self.window.get_keys();
        Ok(true)
    }
}

/// Maps the left side of a QWERTY keyboard onto the hex keypad
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_is_complete() {
        use Key::*;
        let mut keys: Vec<usize> = [Key1, Key2, Key3, Key4, Q, W, E, R, A, S, D, F, Z, X, C, V]
            .into_iter()
            .filter_map(identify_key)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..16).collect::<Vec<_>>());
        assert_eq!(None, identify_key(Escape));
    }

    #[test]
    fn render() {
        let mut fb = FrameBuffer::default();
        let mut frame = [0; SIZE];
        frame[0] = 0x81;
        fb.render(&frame);
        let format = FrameBufferFormat::default();
        assert_eq!(fb.buffer[0], format.fg);
        assert_eq!(fb.buffer[1], format.bg);
        assert_eq!(fb.buffer[7], format.fg);
    }
}
