// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Selects what the front end does with a ROM

use crate::error::Error;
use std::str::FromStr;

/// What to do with the ROM
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Print a listing of the ROM
    #[default]
    Disassemble,
    /// Run headless, printing the machine state after every cycle
    Debug,
    /// Run in a window
    Emulate,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disasm" | "disassemble" | "d" => Ok(Mode::Disassemble),
            "debug" => Ok(Mode::Debug),
            "emulate" | "run" | "e" => Ok(Mode::Emulate),
            _ => Err(Error::InvalidMode { mode: s.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases() {
        for (s, mode) in [
            ("disasm", Mode::Disassemble),
            ("Disassemble", Mode::Disassemble),
            ("d", Mode::Disassemble),
            ("debug", Mode::Debug),
            ("run", Mode::Emulate),
            ("EMULATE", Mode::Emulate),
        ] {
            assert_eq!(mode, s.parse::<Mode>().unwrap(), "{s}");
        }
    }

    #[test]
    fn unknown() {
        let err = "dance".parse::<Mode>().unwrap_err();
        assert_eq!(
            "unknown mode \"dance\" (expected disasm, debug, or emulate)",
            err.to_string()
        );
    }
}
