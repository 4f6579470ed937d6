//! libretro C ABI consumed by oxidized-retro
//!
//! Layouts mirror `libretro.h`. Everything here is plain data and
//! `extern "C"` function pointer types; the loader and the negotiator
//! attach behaviour to them.

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
