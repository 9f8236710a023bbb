// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Pipit

use crate::cpu::mem::Region;
use std::ops::Range;
use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Pipit.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents an unimplemented operation, escalated by a driving loop
    #[error("opcode {word:04x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
    },
    /// A call was made while the stack was already full
    #[error("stack overflow: call to {addr:03x} with a full stack")]
    StackOverflow {
        /// The target of the offending call
        addr: u16,
    },
    /// A return was made with nothing on the stack
    #[error("stack underflow: return at {pc:03x} with an empty stack")]
    StackUnderflow {
        /// The address of the offending return
        pc: u16,
    },
    /// Tried to access memory at a range which does not exist
    #[error("range {range:04x?} is out of bounds")]
    InvalidAddressRange {
        /// The offending range
        range: Range<usize>,
    },
    /// The ROM does not fit in program memory
    #[error("rom is {size} bytes, but only {max} bytes of program memory exist")]
    RomTooLarge {
        /// The size of the rejected ROM
        size: usize,
        /// The size of program memory
        max: usize,
    },
    /// The region you asked for was not defined
    #[error("region {region} is not present in memory")]
    MissingRegion {
        /// The offending [Region]
        region: Region,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Error originated in [std::array::TryFromSliceError]
    #[error(transparent)]
    TryFromSliceError(#[from] std::array::TryFromSliceError),
}
