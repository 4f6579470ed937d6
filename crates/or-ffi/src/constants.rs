//! libretro constants

/// API version the frontend is built against
pub const RETRO_API_VERSION: u32 = 1;

/// Environment command codes
pub mod environment {
    /// Flag OR-ed into command codes that were still experimental when a core was built
    pub const EXPERIMENTAL: u32 = 0x10000;

    pub const SET_ROTATION: u32 = 1;
    pub const GET_OVERSCAN: u32 = 2;
    pub const GET_CAN_DUPE: u32 = 3;
    pub const SET_MESSAGE: u32 = 6;
    pub const SHUTDOWN: u32 = 7;
    pub const SET_PERFORMANCE_LEVEL: u32 = 8;
    pub const GET_SYSTEM_DIRECTORY: u32 = 9;
    pub const SET_PIXEL_FORMAT: u32 = 10;
    pub const SET_INPUT_DESCRIPTORS: u32 = 11;
    pub const SET_KEYBOARD_CALLBACK: u32 = 12;
    pub const SET_DISK_CONTROL_INTERFACE: u32 = 13;
    pub const SET_HW_RENDER: u32 = 14;
    pub const GET_VARIABLE: u32 = 15;
    pub const SET_VARIABLES: u32 = 16;
}

/// Pixel format codes (`enum retro_pixel_format`)
pub mod pixel_format {
    pub const ORGB1555: u32 = 0;
    pub const XRGB8888: u32 = 1;
    pub const RGB565: u32 = 2;
}

/// Hardware context codes (`enum retro_hw_context_type`)
pub mod hw_context {
    pub const NONE: u32 = 0;
    pub const OPENGL: u32 = 1;
    pub const OPENGLES2: u32 = 2;
}

/// Input device types
pub mod device {
    pub const NONE: u32 = 0;
    pub const JOYPAD: u32 = 1;
    pub const MOUSE: u32 = 2;
    pub const KEYBOARD: u32 = 3;
    pub const LIGHTGUN: u32 = 4;
    pub const ANALOG: u32 = 5;
    pub const POINTER: u32 = 6;
}

/// RetroPad button ids
pub mod joypad {
    pub const B: u32 = 0;
    pub const Y: u32 = 1;
    pub const SELECT: u32 = 2;
    pub const START: u32 = 3;
    pub const UP: u32 = 4;
    pub const DOWN: u32 = 5;
    pub const LEFT: u32 = 6;
    pub const RIGHT: u32 = 7;
    pub const A: u32 = 8;
    pub const X: u32 = 9;
    pub const L: u32 = 10;
    pub const R: u32 = 11;
    pub const L2: u32 = 12;
    pub const R2: u32 = 13;
    pub const L3: u32 = 14;
    pub const R3: u32 = 15;
}

/// Memory region ids for `retro_get_memory_*`
pub mod memory {
    pub const SAVE_RAM: u32 = 0;
    pub const RTC: u32 = 1;
    pub const SYSTEM_RAM: u32 = 2;
    pub const VIDEO_RAM: u32 = 3;
}

/// Region codes returned by `retro_get_region`
pub mod region {
    pub const NTSC: u32 = 0;
    pub const PAL: u32 = 1;
}
