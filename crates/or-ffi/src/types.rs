//! `#[repr(C)]` structures and callback signatures from `libretro.h`

use std::ffi::{c_char, c_uint, c_void};
use std::ptr;

/// `retro_environment_t`
pub type EnvironmentFn = unsafe extern "C" fn(cmd: c_uint, data: *mut c_void) -> bool;
/// `retro_video_refresh_t`
pub type VideoRefreshFn =
    unsafe extern "C" fn(data: *const c_void, width: c_uint, height: c_uint, pitch: usize);
/// `retro_audio_sample_t`
pub type AudioSampleFn = unsafe extern "C" fn(left: i16, right: i16);
/// `retro_audio_sample_batch_t`
pub type AudioSampleBatchFn = unsafe extern "C" fn(data: *const i16, frames: usize) -> usize;
/// `retro_input_poll_t`
pub type InputPollFn = unsafe extern "C" fn();
/// `retro_input_state_t`
pub type InputStateFn =
    unsafe extern "C" fn(port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16;

/// `retro_keyboard_event_t`
pub type KeyboardEventFn =
    unsafe extern "C" fn(down: bool, keycode: c_uint, character: u32, key_modifiers: u16);

/// `retro_proc_address_t`
pub type ProcAddressFn = unsafe extern "C" fn();
/// `retro_hw_context_reset_t`
pub type HwContextResetFn = unsafe extern "C" fn();
/// `retro_hw_get_current_framebuffer_t`
pub type HwGetCurrentFramebufferFn = unsafe extern "C" fn() -> usize;
/// `retro_hw_get_proc_address_t`
pub type HwGetProcAddressFn = unsafe extern "C" fn(sym: *const c_char) -> Option<ProcAddressFn>;

/// Core metadata (`struct retro_system_info`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroSystemInfo {
    pub library_name: *const c_char,
    pub library_version: *const c_char,
    /// `|`-delimited list of extensions, without dots
    pub valid_extensions: *const c_char,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

impl Default for RetroSystemInfo {
    fn default() -> Self {
        Self {
            library_name: ptr::null(),
            library_version: ptr::null(),
            valid_extensions: ptr::null(),
            need_fullpath: false,
            block_extract: false,
        }
    }
}

/// `struct retro_game_geometry`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetroGameGeometry {
    pub base_width: c_uint,
    pub base_height: c_uint,
    pub max_width: c_uint,
    pub max_height: c_uint,
    pub aspect_ratio: f32,
}

/// `struct retro_system_timing`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetroSystemTiming {
    pub fps: f64,
    pub sample_rate: f64,
}

/// `struct retro_system_av_info`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetroSystemAvInfo {
    pub geometry: RetroGameGeometry,
    pub timing: RetroSystemTiming,
}

/// `struct retro_game_info`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroGameInfo {
    pub path: *const c_char,
    pub data: *const c_void,
    pub size: usize,
    pub meta: *const c_char,
}

impl Default for RetroGameInfo {
    fn default() -> Self {
        Self {
            path: ptr::null(),
            data: ptr::null(),
            size: 0,
            meta: ptr::null(),
        }
    }
}

/// Key/value pair used by GET_VARIABLE and SET_VARIABLES (`struct retro_variable`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroVariable {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// `struct retro_message`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroMessage {
    pub msg: *const c_char,
    /// Duration in frames
    pub frames: c_uint,
}

/// `struct retro_input_descriptor`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroInputDescriptor {
    pub port: c_uint,
    pub device: c_uint,
    pub index: c_uint,
    pub id: c_uint,
    /// A null description terminates the array
    pub description: *const c_char,
}

/// `struct retro_keyboard_callback`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RetroKeyboardCallback {
    pub callback: Option<KeyboardEventFn>,
}

/// Disk swapping interface (`struct retro_disk_control_callback`)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RetroDiskControlCallback {
    pub set_eject_state: Option<unsafe extern "C" fn(ejected: bool) -> bool>,
    pub get_eject_state: Option<unsafe extern "C" fn() -> bool>,
    pub get_image_index: Option<unsafe extern "C" fn() -> c_uint>,
    pub set_image_index: Option<unsafe extern "C" fn(index: c_uint) -> bool>,
    pub get_num_images: Option<unsafe extern "C" fn() -> c_uint>,
    pub replace_image_index:
        Option<unsafe extern "C" fn(index: c_uint, info: *const RetroGameInfo) -> bool>,
    pub add_image_index: Option<unsafe extern "C" fn() -> bool>,
}

/// Hardware rendering request (`struct retro_hw_render_callback`)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RetroHwRenderCallback {
    /// One of [`crate::hw_context`]
    pub context_type: c_uint,
    /// Set by the core, called by the frontend once the context is ready
    pub context_reset: Option<HwContextResetFn>,
    /// Set by the frontend
    pub get_current_framebuffer: Option<HwGetCurrentFramebufferFn>,
    /// Set by the frontend
    pub get_proc_address: Option<HwGetProcAddressFn>,
    pub depth: bool,
    pub stencil: bool,
    pub bottom_left_origin: bool,
    pub version_major: c_uint,
    pub version_minor: c_uint,
    pub cache_context: bool,
    /// Set by the core, called before the context is torn down
    pub context_destroy: Option<HwContextResetFn>,
    pub debug_context: bool,
}
