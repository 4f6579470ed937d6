//! Frontend-visible state configured by a core

use or_ffi::{KeyboardEventFn, RetroDiskControlCallback, RetroHwRenderCallback};

/// Number of input ports a core may describe
pub const MAX_PLAYERS: usize = 8;

/// Number of named RetroPad buttons; ids past this are custom/analog binds
pub const FIRST_CUSTOM_BIND: usize = 16;

/// RetroPad button names, indexed by button id
pub const BUTTON_NAMES: [&str; FIRST_CUSTOM_BIND] = [
    "B (bottom)",
    "Y (left)",
    "Select",
    "Start",
    "D-Pad Up",
    "D-Pad Down",
    "D-Pad Left",
    "D-Pad Right",
    "A (right)",
    "X (up)",
    "L",
    "R",
    "L2",
    "R2",
    "L3",
    "R3",
];

/// Framebuffer pixel format requested by the core
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 0RGB1555, the libretro default
    #[default]
    Orgb1555,
    Xrgb8888,
    Rgb565,
}

impl PixelFormat {
    /// Decode `enum retro_pixel_format`
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            or_ffi::pixel_format::ORGB1555 => Some(Self::Orgb1555),
            or_ffi::pixel_format::XRGB8888 => Some(Self::Xrgb8888),
            or_ffi::pixel_format::RGB565 => Some(Self::Rgb565),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::Orgb1555 => or_ffi::pixel_format::ORGB1555,
            Self::Xrgb8888 => or_ffi::pixel_format::XRGB8888,
            Self::Rgb565 => or_ffi::pixel_format::RGB565,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Xrgb8888 => 4,
            Self::Orgb1555 | Self::Rgb565 => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Orgb1555 => "0RGB1555",
            Self::Xrgb8888 => "XRGB8888",
            Self::Rgb565 => "RGB565",
        }
    }
}

/// Screen rotation, counter-clockwise in 90° steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Deg0),
            1 => Some(Self::Deg90),
            2 => Some(Self::Deg180),
            3 => Some(Self::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// Per-port, per-button descriptions of what a core maps each RetroPad button to.
#[derive(Debug, Clone)]
pub struct InputDescriptorTable {
    buttons: [[Option<String>; FIRST_CUSTOM_BIND]; MAX_PLAYERS],
}

impl InputDescriptorTable {
    pub fn new() -> Self {
        Self {
            buttons: std::array::from_fn(|_| std::array::from_fn(|_| None)),
        }
    }

    pub fn clear(&mut self) {
        for port in self.buttons.iter_mut() {
            port.fill(None);
        }
    }

    /// Description for `port`/`id`; `None` if unset or out of range
    pub fn get(&self, port: usize, id: usize) -> Option<&str> {
        self.buttons.get(port)?.get(id)?.as_deref()
    }

    /// Set a description. Returns `false` if `port` or `id` is out of range.
    pub fn set(&mut self, port: usize, id: usize, description: impl Into<String>) -> bool {
        match self.buttons.get_mut(port).and_then(|p| p.get_mut(id)) {
            Some(slot) => {
                *slot = Some(description.into());
                true
            }
            None => false,
        }
    }

    /// Every set description as `(port, id, description)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.buttons.iter().enumerate().flat_map(|(port, buttons)| {
            buttons
                .iter()
                .enumerate()
                .filter_map(move |(id, desc)| desc.as_deref().map(|d| (port, id, d)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl Default for InputDescriptorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A core option declared through SET_VARIABLES
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredVariable {
    pub key: String,
    /// Human-readable description and choices, e.g. `"Region; Auto|NTSC|PAL"`
    pub description: Option<String>,
}

/// Everything a core has configured through the environment callback.
///
/// Written only by the negotiator; the rest of the frontend reads it between
/// core calls.
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironmentState {
    pub pixel_format: PixelFormat,
    pub rotation: Rotation,
    /// Opaque hint of how demanding the core is
    pub performance_level: u32,
    pub input_descriptors: InputDescriptorTable,
    pub disk_control: Option<RetroDiskControlCallback>,
    pub hw_render: Option<RetroHwRenderCallback>,
    /// Set when the core asked the frontend to exit
    pub shutdown: bool,
    pub keyboard_event: Option<KeyboardEventFn>,
    pub declared_variables: Vec<DeclaredVariable>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_codes() {
        for format in [PixelFormat::Orgb1555, PixelFormat::Xrgb8888, PixelFormat::Rgb565] {
            assert_eq!(PixelFormat::from_raw(format.raw()), Some(format));
        }
        assert_eq!(PixelFormat::from_raw(3), None);
        assert_eq!(PixelFormat::default(), PixelFormat::Orgb1555);
        assert_eq!(PixelFormat::Xrgb8888.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_rotation_range() {
        assert_eq!(Rotation::from_raw(1).map(Rotation::degrees), Some(90));
        assert_eq!(Rotation::from_raw(3).map(Rotation::degrees), Some(270));
        assert_eq!(Rotation::from_raw(4), None);
    }

    #[test]
    fn test_descriptor_table_bounds() {
        let mut table = InputDescriptorTable::new();
        assert!(table.is_empty());

        assert!(table.set(0, 0, "Jump"));
        assert!(table.set(MAX_PLAYERS - 1, FIRST_CUSTOM_BIND - 1, "Map"));
        assert!(!table.set(MAX_PLAYERS, 0, "Nope"));
        assert!(!table.set(0, FIRST_CUSTOM_BIND, "Nope"));

        assert_eq!(table.get(0, 0), Some("Jump"));
        assert_eq!(table.get(MAX_PLAYERS, 0), None);
        assert_eq!(table.iter().count(), 2);

        table.clear();
        assert!(table.is_empty());
    }
}
