// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A disassembler for Chip-8 opcodes
//!
//! Listings are produced with [disassemble], one line per two-byte word:
//! ```text
//! [#0x<offset> : ]<mnemonic> (0x<OPCODE>)
//! ```
use super::Decoded;
use owo_colors::{OwoColorize, Style};

/// Disassembles Chip-8 instructions
pub trait Disassembler {
    /// Disassemble a single instruction
    fn once(&self, insn: u16) -> String;
}

/// Disassembles Chip-8 instructions, printing them in the provided [owo_colors::Style]s
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Styles invalid instructions
    pub invalid: Style,
    /// Styles valid instruction
    pub normal: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            invalid: Style::new().bold().red(),
            normal: Style::new().green(),
        }
    }
}

impl Disassembler for Dis {
    fn once(&self, insn: u16) -> String {
        match Decoded::classify(insn) {
            Decoded::Known(insn) => format!("{}", insn.style(self.normal)),
            Decoded::Unknown(_) => {
                format!("{}", format_args!("inval  {insn:04x}").style(self.invalid))
            }
        }
    }
}

/// Renders a single listing line for the word at byte offset `addr`
/// # Examples
/// ```rust
/// # use pipit::*;
/// assert_eq!("cls (0x00E0)", render_line(0, 0x00e0, false));
/// assert_eq!("#0x002 : inval (0xFFFF)", render_line(2, 0xffff, true));
/// ```
pub fn render_line(addr: usize, word: u16, with_addr: bool) -> String {
    let text = Decoded::classify(word);
    if with_addr {
        format!("#0x{addr:03X} : {text} (0x{word:04X})")
    } else {
        format!("{text} (0x{word:04X})")
    }
}

/// Disassembles a whole ROM, two bytes at a time.
///
/// A trailing odd byte is ignored. Unknown words render as `inval` and do not stop the pass.
/// # Examples
/// ```rust
/// # use pipit::*;
/// let listing = disassemble(&[0x6a, 0x12, 0x7a, 0x05, 0xff], true);
/// assert_eq!(
///     listing,
///     ["#0x000 : mov    #12, vA (0x6A12)", "#0x002 : add    #05, vA (0x7A05)"]
/// );
/// ```
pub fn disassemble(rom: &[u8], with_addr: bool) -> Vec<String> {
    rom.chunks_exact(2)
        .enumerate()
        .map(|(index, word)| {
            let word = u16::from_be_bytes([word[0], word[1]]);
            render_line(2 * index, word, with_addr)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_length_rom() {
        assert_eq!(disassemble(&[0x00], false), Vec::<String>::new());
        assert_eq!(disassemble(&[0x00, 0xee, 0x12], false), ["ret (0x00EE)"]);
    }

    #[test]
    fn unknown_does_not_stop() {
        let listing = disassemble(&[0x00, 0x00, 0x81, 0x2f, 0x12, 0x00], false);
        assert_eq!(
            listing,
            ["inval (0x0000)", "inval (0x812F)", "jmp    200 (0x1200)"]
        );
    }

    #[test]
    fn addresses_are_byte_offsets() {
        let listing = disassemble(&[0; 0x20], true);
        assert_eq!(listing.len(), 0x10);
        assert!(listing[0xf].starts_with("#0x01E : "));
    }

    #[test]
    fn once_marks_invalid() {
        let dis = Dis::default();
        assert!(dis.once(0xf0ff).contains("inval  f0ff"));
        assert!(dis.once(0xd125).contains("draw   #5, v1, v2"));
    }
}
