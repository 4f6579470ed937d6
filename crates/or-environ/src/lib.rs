//! Environment negotiation between a loaded core and the frontend
//!
//! A core configures and queries the frontend through a single
//! `retro_environment_t` callback. This crate decodes those calls into
//! [`EnvironmentRequest`]s, answers them from a [`Negotiator`] owned for the
//! lifetime of the core session, and exposes the `extern "C"` entry points
//! handed to the core.

pub mod callback;
pub mod message;
pub mod negotiator;
pub mod request;
pub mod state;
pub mod variables;
pub mod video;

pub use callback::{
    environment_callback, hw_current_framebuffer, hw_proc_address, install_negotiator,
    is_negotiator_installed, take_negotiator, with_negotiator,
};
pub use message::{Message, MessageQueue, DEFAULT_CAPACITY};
pub use negotiator::{Negotiator, MESSAGE_PRIORITY};
pub use request::{
    base_command, write_reply, EnvironmentReply, EnvironmentRequest, InputDescriptor,
    VariableDeclaration,
};
pub use state::{
    DeclaredVariable, InputDescriptorTable, PixelFormat, Rotation, SystemEnvironmentState, BUTTON_NAMES,
    FIRST_CUSTOM_BIND, MAX_PLAYERS,
};
pub use variables::VariableStore;
pub use video::{
    HwContextFamily, HwContextType, VideoDriver, VideoDriverSlot, HW_RENDER_DRIVER, ROTATING_DRIVERS,
};
