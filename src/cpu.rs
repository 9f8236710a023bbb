// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Decoded, Insn,
    },
    mem::{Mem, Region::*, FONT},
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    screen::Screen,
    traits::{FallibleAutoCast, Grab},
};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// The maximum depth of the call stack
pub const STACK_DEPTH: usize = 16;
/// The address programs are loaded at, and execution starts from
pub const PROGRAM_START: Adr = 0x200;
/// Every address is masked to 12 bits
const ADR_MASK: Adr = 0xfff;

/// The outcome of a single [CPU::tick]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tick {
    /// The [Insn] was executed
    Ran(Insn),
    /// The word at pc is not an instruction. Nothing but the fetch happened
    Unimplemented {
        /// The offending word
        word: u16,
    },
    /// The CPU is paused, and did nothing
    Paused,
}

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], debug, pause
    pub flags: Flags,
    // memory map info
    mem: Mem,
    font: Adr,
    // memory
    stack: Vec<Adr>,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    // Execution data
    opcode: u16,
    cycle: usize,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the provided ROM loaded at 0x200
    pub fn new(rom: impl AsRef<std::path::Path>, flags: Flags) -> Result<Self> {
        let mut cpu = CPU {
            flags,
            ..Default::default()
        };
        // load the provided rom
        cpu.load_program(rom)?;
        Ok(cpu)
    }

    /// Loads a program into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into the CPU's program space, replacing whatever was there.
    ///
    /// A ROM which doesn't fit in `0x200..0x1000` is rejected with [Error::RomTooLarge],
    /// and program memory is left untouched.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// cpu.load_program_bytes(&[0; 0xe01])
    ///     .expect_err("0xe01 bytes shouldn't fit in program memory");
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let max = self
            .mem
            .get_region(Program)
            .ok_or(Error::MissingRegion { region: Program })?
            .len();
        if rom.len() > max {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max,
            });
        }
        self.mem.clear_region(Program).load_region(Program, rom)?;
        log::debug!("Loaded {} bytes of program", rom.len());
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(!std::mem::replace(keyref, true))
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        Ok(std::mem::replace(keyref, false))
    }

    /// Replaces the whole key state at once
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// Gets the current key state
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// cpu.set_v(0x10, 0).expect_err("There is no v10");
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the most recently fetched opcode.
    ///
    /// `0x0000` is conventionally treated as the end of a program by driving loops
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    /// Gets the return addresses on the call stack, oldest first
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Sets the value in the Sound Timer register
    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Reports whether the sound timer is running (the buzzer would be on)
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Sets the value in the Delay Timer register
    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Counts both timers down by one. Call this at 60Hz, independently of [CPU::tick].
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_delay(1);
    /// cpu.tick_timers();
    /// cpu.tick_timers();
    /// assert_eq!((0, 0), (cpu.delay(), cpu.sound()));
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Gets the number of cycles the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Resets the emulator, and clears program memory.
    ///
    /// Touches the [Flags] (pause, keypause), stack, pc, registers, timers,
    /// keys, program memory, and cycle count.
    ///
    /// Does not touch [Quirks], debug mode, or the font.
    pub fn reset(&mut self) {
        self.flags = Flags {
            pause: false,
            keypause: false,
            ..self.flags.clone()
        };
        self.mem.clear_region(Program);
        // clear the stack
        self.stack.truncate(0);
        // Reset the program counter
        self.pc = PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; 16];
        // Execution data
        self.opcode = 0;
        self.cycle = 0;
        log::debug!("CPU reset");
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// cpu.flags.pause = true;
    /// cpu.singlestep(&mut screen).unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert!(cpu.flags.pause);
    /// ```
    pub fn singlestep(&mut self, screen: &mut Screen) -> Result<Tick> {
        self.flags.pause = false;
        let tick = self.tick(screen);
        self.flags.pause = true;
        tick
    }

    /// Runs up to `steps` ticks, stopping early if the CPU is paused.
    ///
    /// Unlike [CPU::tick], an unimplemented instruction is escalated to
    /// [Error::UnimplementedInstruction]. Does not touch the timers.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.multistep(&mut screen, 0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn multistep(&mut self, screen: &mut Screen, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            match self.tick(screen)? {
                Tick::Ran(_) => (),
                Tick::Unimplemented { word } => {
                    return Err(Error::UnimplementedInstruction { word })
                }
                Tick::Paused => break,
            }
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Returns [Tick::Unimplemented] if the word at `pc` is not an instruction.
    /// In that case nothing but [CPU::opcode] and [CPU::cycle] change.
    ///
    /// Returns an [Error] if the instruction would break the machine: a stack
    /// underflow or overflow, or a memory access out of bounds.
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// let mut screen = Screen::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0xff, 0xff, // invalid!
    /// ]).unwrap();
    /// assert_eq!(Tick::Ran(Insn::cls), cpu.tick(&mut screen).unwrap());
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(Tick::Unimplemented { word: 0xffff }, cpu.tick(&mut screen).unwrap());
    /// assert_eq!(0x202, cpu.pc());
    /// ```
    pub fn tick(&mut self, screen: &mut Screen) -> Result<Tick> {
        // Do nothing if paused
        if self.flags.pause {
            return Ok(Tick::Paused);
        }
        self.cycle += 1;
        // fetch opcode
        let opcode: u16 = self.mem.read_fallible(self.pc)?;
        self.opcode = opcode;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(opcode)
            );
        }

        // decode opcode
        match Decoded::classify(opcode) {
            Decoded::Known(insn) => {
                log::trace!("{:03x}: {insn}", self.pc);
                self.pc = self.pc.wrapping_add(2) & ADR_MASK;
                self.execute(screen, insn)?;
                Ok(Tick::Ran(insn))
            }
            Decoded::Unknown(word) => {
                log::warn!("{:03x}: opcode {word:04x} not recognized", self.pc);
                Ok(Tick::Unimplemented { word })
            }
        }
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use pipit::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }

    /// Prints `len` bytes of memory, starting at `start`
    pub fn print_ram(&self, start: Adr, len: usize) -> Result<()> {
        let start = start as usize;
        let bytes = self
            .mem
            .grab(start..start + len)
            .ok_or(Error::InvalidAddressRange {
                range: start..start + len,
            })?;
        std::println!(
            "{:03x}: {}",
            start,
            bytes
                .iter()
                .map(|byte| format!("{byte:02x}"))
                .collect::<Vec<_>>()
                .join(" ")
        );
        Ok(())
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("font", &self.font)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("opcode", &self.opcode)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use pipit::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(Some(&FONT[..5]), cpu.mem().grab(0..5));
    /// ```
    fn default() -> Self {
        CPU {
            mem: crate::mem! {
                Charset [0x0000..0x0050] = &FONT,
                Program [0x0200..0x1000],
            },
            font: 0x000,
            stack: Vec::with_capacity(STACK_DEPTH),
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            opcode: 0,
            cycle: 0,
            flags: Flags::default(),
            disassembler: Dis::default(),
        }
    }
}
