// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Traits useful for Pipit

mod auto_cast;
pub use auto_cast::{FallibleAutoCast, Grab};
