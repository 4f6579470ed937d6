//! Core session layer for oxidized-retro
//!
//! This crate ties the loader and the environment negotiator together into a
//! [`CoreSession`]: bind a core, install its negotiator, register callbacks,
//! and tear everything down again on drop.

pub mod dataplane;
pub mod session;

pub use dataplane::FrameGeometry;
pub use session::CoreSession;
