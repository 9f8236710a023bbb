// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Pipit: A chip-8 interpreter and disassembler in Rust

mod error;
mod mode;

#[cfg(feature = "minifb")]
mod emulate;
#[cfg(feature = "minifb")]
mod ui;

use error::Result;
use gumdrop::*;
use mode::Mode;
use owo_colors::OwoColorize;
use pipit::*;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = run(&options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "MODE: disasm, debug, or emulate.", required, free)]
    pub mode: Mode,
    #[options(help = "FILE: the ROM to load.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,

    #[options(help = "Prefix each disassembled instruction with its offset.")]
    pub addr: bool,

    #[options(
        help = "Stop a debug run after this many cycles.",
        default = "1000",
        meta = "N"
    )]
    pub limit: usize,

    #[options(help = "Print a live disassembly of each instruction as it runs.")]
    pub trace: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the instructions-per-frame rate.", default = "10", meta = "N")]
    pub speed: usize,
    #[options(
        short = "r",
        help = "Set the target framerate.",
        default = "60",
        meta = "FR"
    )]
    pub frame_rate: u64,

    #[options(
        short = "v",
        help = "Use CHIP-48 style bit-shifts, which don't touch vY."
    )]
    pub shift: bool,
    #[options(
        short = "c",
        help = "Use CHIP-48 style DMA instructions, which don't touch I."
    )]
    pub memory: bool,
}

impl Arguments {
    /// Builds the CPU [Flags] the options ask for
    fn flags(&self) -> Flags {
        Flags {
            debug: self.trace,
            pause: self.pause,
            quirks: Quirks {
                shift: self.shift,
                dma_inc: self.memory,
            },
            ..Default::default()
        }
    }
}

fn run(options: &Arguments) -> Result<()> {
    match options.mode {
        Mode::Disassemble => disassemble_rom(options),
        Mode::Debug => debug(options),
        Mode::Emulate => emulate(options),
    }
}

/// Prints a listing of the whole ROM
fn disassemble_rom(options: &Arguments) -> Result<()> {
    let rom = std::fs::read(&options.file)?;
    for line in disassemble(&rom, options.addr) {
        println!("{line}");
    }
    Ok(())
}

/// Runs the ROM without a display, dumping the registers after every cycle
fn debug(options: &Arguments) -> Result<()> {
    let mut ch8 = Chip8 {
        cpu: CPU::new(&options.file, options.flags())?,
        screen: Screen::default(),
    };
    println!("Init state\nRam @ 0x200 :");
    ch8.cpu.print_ram(0x200, 10)?;
    ch8.cpu.dump();
    for cycle in 0..options.limit {
        match ch8.step()? {
            Tick::Ran(insn) => {
                println!("\nResult for cycle {cycle}");
                ch8.cpu.dump();
                println!("Executed 0x{:04X} ({insn})", ch8.cpu.opcode());
            }
            // a zeroed word is the end of the program
            Tick::Unimplemented { word: 0 } => break,
            Tick::Unimplemented { word } => {
                return Err(pipit::Error::UnimplementedInstruction { word }.into());
            }
            Tick::Paused => {
                eprintln!("{}", "Paused.".yellow());
                break;
            }
        }
    }
    Ok(())
}

#[cfg(feature = "minifb")]
fn emulate(options: &Arguments) -> Result<()> {
    for result in emulate::State::new(options)? {
        result?;
    }
    Ok(())
}

#[cfg(not(feature = "minifb"))]
fn emulate(_options: &Arguments) -> Result<()> {
    Err(error::Error::NoDisplay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments() {
        let options = Arguments::parse_args_default(&["-v", "-r", "30", "debug", "rom.ch8"])
            .expect("arguments should parse");
        assert_eq!(Mode::Debug, options.mode);
        assert_eq!(PathBuf::from("rom.ch8"), options.file);
        assert_eq!((1000, 10, 30), (options.limit, options.speed, options.frame_rate));
        assert_eq!(
            Quirks {
                shift: true,
                dma_inc: false
            },
            options.flags().quirks
        );
    }

    #[test]
    fn usage_names_positionals() {
        let usage = Arguments::usage();
        assert!(usage.contains("MODE"));
        assert!(usage.contains("FILE"));
    }

    #[test]
    fn unknown_mode() {
        Arguments::parse_args_default(&["dance", "rom.ch8"])
            .expect_err("dance is not a mode");
    }

    #[test]
    fn missing_rom() {
        let options = Arguments::parse_args_default(&["debug", "/no/such/rom.ch8"]).unwrap();
        assert!(matches!(
            run(&options),
            Err(error::Error::Pipit(pipit::Error::IoError(_)))
        ));
    }
}
