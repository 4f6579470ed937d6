//! Video driver slot and hardware rendering families

use crate::state::Rotation;
use or_ffi::{hw_context, ProcAddressFn};
use std::ffi::CStr;
use tracing::{debug, info};

/// Ident of the driver that serves hardware-rendered cores
pub const HW_RENDER_DRIVER: &str = "gl";

/// Drivers with a rotation hook, applied when the driver starts
pub const ROTATING_DRIVERS: &[&str] = &[HW_RENDER_DRIVER];

/// OpenGL flavour the hardware driver is built against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HwContextFamily {
    /// Desktop OpenGL
    Gl,
    /// OpenGL ES 2
    Gles2,
}

impl HwContextFamily {
    /// Family selected by the crate features, `None` when neither is enabled
    pub const fn compiled() -> Option<Self> {
        if cfg!(feature = "gles2") {
            Some(Self::Gles2)
        } else if cfg!(feature = "gl") {
            Some(Self::Gl)
        } else {
            None
        }
    }
}

/// Decoded `enum retro_hw_context_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HwContextType {
    /// Core renders in software
    NoContext,
    OpenGl,
    OpenGles2,
}

impl HwContextType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            hw_context::NONE => Some(Self::NoContext),
            hw_context::OPENGL => Some(Self::OpenGl),
            hw_context::OPENGLES2 => Some(Self::OpenGles2),
            _ => None,
        }
    }

    pub fn family(self) -> Option<HwContextFamily> {
        match self {
            Self::NoContext => None,
            Self::OpenGl => Some(HwContextFamily::Gl),
            Self::OpenGles2 => Some(HwContextFamily::Gles2),
        }
    }
}

/// Hooks a running video driver exposes to the negotiator.
///
/// Everything but [`VideoDriver::ident`] is optional.
pub trait VideoDriver: Send {
    /// Short identifier, e.g. `"gl"`
    fn ident(&self) -> &str;

    fn supports_rotation(&self) -> bool {
        false
    }

    fn set_rotation(&mut self, _rotation: Rotation) {}

    /// Framebuffer object the core should render into
    fn current_framebuffer(&self) -> usize {
        0
    }

    /// Resolve a GL symbol for the core
    fn proc_address(&self, _symbol: &CStr) -> Option<ProcAddressFn> {
        None
    }
}

/// The selected video driver ident plus the running driver, if any.
pub struct VideoDriverSlot {
    selected: String,
    active: Option<Box<dyn VideoDriver>>,
}

impl VideoDriverSlot {
    pub fn new(selected: impl Into<String>) -> Self {
        Self {
            selected: selected.into(),
            active: None,
        }
    }

    /// Ident of the driver the frontend will start
    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn select(&mut self, ident: &str) {
        if self.selected != ident {
            info!("Switching video driver from \"{}\" to \"{}\"", self.selected, ident);
            self.selected = ident.to_string();
        }
    }

    /// Whether the driver that runs (or will run) can rotate the screen.
    ///
    /// A running driver answers for itself; otherwise the selected ident
    /// decides.
    pub fn can_rotate(&self) -> bool {
        match self.active() {
            Some(driver) => driver.supports_rotation(),
            None => ROTATING_DRIVERS.contains(&self.selected.as_str()),
        }
    }

    /// Install the running driver, returning the previous one
    pub fn attach(&mut self, driver: Box<dyn VideoDriver>) -> Option<Box<dyn VideoDriver>> {
        debug!("Video driver \"{}\" attached", driver.ident());
        self.active.replace(driver)
    }

    pub fn detach(&mut self) -> Option<Box<dyn VideoDriver>> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&dyn VideoDriver> {
        self.active.as_deref()
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn VideoDriver + 'static)> {
        self.active.as_deref_mut()
    }
}

impl std::fmt::Debug for VideoDriverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDriverSlot")
            .field("selected", &self.selected)
            .field("active", &self.active.as_ref().map(|d| d.ident()))
            .finish()
    }
}
