// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the Pipit front end

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the Pipit front end.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originated in the interpreter
    #[error(transparent)]
    Pipit(#[from] pipit::Error),
    /// Error originated in [std::io]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The mode argument wasn't one we know
    #[error("unknown mode \"{mode}\" (expected disasm, debug, or emulate)")]
    InvalidMode {
        /// The offending mode string
        mode: String,
    },
    /// Emulate mode needs a window, but none was compiled in
    #[cfg(not(feature = "minifb"))]
    #[error("no display available: rebuild with `--features minifb` to emulate")]
    NoDisplay,
    /// Error originated in [minifb]
    #[cfg(feature = "minifb")]
    #[error(transparent)]
    Minifb(#[from] minifb::Error),
}
