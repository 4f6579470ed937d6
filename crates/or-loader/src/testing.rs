//! In-memory stub cores for tests
//!
//! A [`StubLibrary`] maps libretro symbol names to `extern "C"` functions
//! defined here, so binding and discovery can be exercised without building
//! shared libraries. Individual entry points can be swapped out with
//! [`StubLibrary::with`] or removed with [`StubLibrary::without`].

use crate::api::CoreApi;
use crate::library::{CoreOpener, SymbolSource};
use or_core::LoaderError;
use or_ffi::{
    AudioSampleBatchFn, AudioSampleFn, EnvironmentFn, InputPollFn, InputStateFn, RetroGameInfo,
    RetroSystemAvInfo, RetroSystemInfo, VideoRefreshFn, RETRO_API_VERSION,
};
use std::collections::HashMap;
use std::ffi::{c_char, c_uint, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// Signature of `retro_get_system_info`
pub type SystemInfoFn = unsafe extern "C" fn(*mut RetroSystemInfo);

/// Save-state size reported by the stub core
pub const STUB_STATE_SIZE: usize = 64;
/// Size of the stub core's system RAM region
pub const STUB_RAM_SIZE: usize = 256;

static mut STUB_RAM: [u8; STUB_RAM_SIZE] = [0; STUB_RAM_SIZE];

unsafe fn fill_info(info: *mut RetroSystemInfo, name: &'static std::ffi::CStr, extensions: *const c_char) {
    let info = &mut *info;
    info.library_name = name.as_ptr();
    info.library_version = c"1.0".as_ptr();
    info.valid_extensions = extensions;
    info.need_fullpath = false;
    info.block_extract = false;
}

pub unsafe extern "C" fn info_nes(info: *mut RetroSystemInfo) {
    fill_info(info, c"Stub NES", c"nes|fds".as_ptr());
}

pub unsafe extern "C" fn info_snes(info: *mut RetroSystemInfo) {
    fill_info(info, c"Stub SNES", c"smc|sfc".as_ptr());
}

pub unsafe extern "C" fn info_gb(info: *mut RetroSystemInfo) {
    fill_info(info, c"Stub GB", c"gb|gbc".as_ptr());
}

pub unsafe extern "C" fn info_no_extensions(info: *mut RetroSystemInfo) {
    fill_info(info, c"Stub Odd", std::ptr::null());
}

unsafe extern "C" fn stub_api_version() -> c_uint {
    RETRO_API_VERSION
}
unsafe extern "C" fn stub_void() {}
unsafe extern "C" fn stub_av_info(info: *mut RetroSystemAvInfo) {
    let info = &mut *info;
    info.geometry.base_width = 256;
    info.geometry.base_height = 224;
    info.geometry.max_width = 512;
    info.geometry.max_height = 448;
    info.geometry.aspect_ratio = 4.0 / 3.0;
    info.timing.fps = 60.0;
    info.timing.sample_rate = 32040.0;
}
unsafe extern "C" fn stub_set_environment(_: EnvironmentFn) {}
unsafe extern "C" fn stub_set_video_refresh(_: VideoRefreshFn) {}
unsafe extern "C" fn stub_set_audio_sample(_: AudioSampleFn) {}
unsafe extern "C" fn stub_set_audio_sample_batch(_: AudioSampleBatchFn) {}
unsafe extern "C" fn stub_set_input_poll(_: InputPollFn) {}
unsafe extern "C" fn stub_set_input_state(_: InputStateFn) {}
unsafe extern "C" fn stub_set_controller_port_device(_: c_uint, _: c_uint) {}
unsafe extern "C" fn stub_serialize_size() -> usize {
    STUB_STATE_SIZE
}
unsafe extern "C" fn stub_serialize(data: *mut c_void, size: usize) -> bool {
    if size < STUB_STATE_SIZE {
        return false;
    }
    std::ptr::write_bytes(data as *mut u8, 0xA5, STUB_STATE_SIZE);
    true
}
unsafe extern "C" fn stub_unserialize(_: *const c_void, size: usize) -> bool {
    size == STUB_STATE_SIZE
}
unsafe extern "C" fn stub_cheat_set(_: c_uint, _: bool, _: *const c_char) {}
unsafe extern "C" fn stub_load_game(info: *const RetroGameInfo) -> bool {
    !info.is_null() && (!(*info).path.is_null() || !(*info).data.is_null())
}
unsafe extern "C" fn stub_load_game_special(_: c_uint, _: *const RetroGameInfo, count: usize) -> bool {
    count > 0
}
unsafe extern "C" fn stub_get_region() -> c_uint {
    or_ffi::region::NTSC
}
unsafe extern "C" fn stub_get_memory_data(id: c_uint) -> *mut c_void {
    if id == or_ffi::memory::SYSTEM_RAM {
        std::ptr::addr_of_mut!(STUB_RAM) as *mut c_void
    } else {
        std::ptr::null_mut()
    }
}
unsafe extern "C" fn stub_get_memory_size(id: c_uint) -> usize {
    if id == or_ffi::memory::SYSTEM_RAM {
        STUB_RAM_SIZE
    } else {
        0
    }
}

/// A fake core library backed by functions in this process.
#[derive(Debug, Clone, Default)]
pub struct StubLibrary {
    symbols: HashMap<&'static str, usize>,
}

impl StubLibrary {
    /// A library exporting every libretro entry point
    pub fn complete(system_info: SystemInfoFn) -> Self {
        let entries: [(&'static str, *const ()); 25] = [
            ("retro_api_version", stub_api_version as *const ()),
            ("retro_init", stub_void as *const ()),
            ("retro_deinit", stub_void as *const ()),
            ("retro_get_system_info", system_info as *const ()),
            ("retro_get_system_av_info", stub_av_info as *const ()),
            ("retro_set_environment", stub_set_environment as *const ()),
            ("retro_set_video_refresh", stub_set_video_refresh as *const ()),
            ("retro_set_audio_sample", stub_set_audio_sample as *const ()),
            ("retro_set_audio_sample_batch", stub_set_audio_sample_batch as *const ()),
            ("retro_set_input_poll", stub_set_input_poll as *const ()),
            ("retro_set_input_state", stub_set_input_state as *const ()),
            ("retro_set_controller_port_device", stub_set_controller_port_device as *const ()),
            ("retro_reset", stub_void as *const ()),
            ("retro_run", stub_void as *const ()),
            ("retro_serialize_size", stub_serialize_size as *const ()),
            ("retro_serialize", stub_serialize as *const ()),
            ("retro_unserialize", stub_unserialize as *const ()),
            ("retro_cheat_reset", stub_void as *const ()),
            ("retro_cheat_set", stub_cheat_set as *const ()),
            ("retro_load_game", stub_load_game as *const ()),
            ("retro_load_game_special", stub_load_game_special as *const ()),
            ("retro_unload_game", stub_void as *const ()),
            ("retro_get_region", stub_get_region as *const ()),
            ("retro_get_memory_data", stub_get_memory_data as *const ()),
            ("retro_get_memory_size", stub_get_memory_size as *const ()),
        ];
        debug_assert_eq!(entries.len(), CoreApi::SYMBOLS.len());

        Self {
            symbols: entries.iter().map(|&(name, addr)| (name, addr as usize)).collect(),
        }
    }

    /// A library exporting nothing but `retro_get_system_info`
    pub fn probe_only(system_info: SystemInfoFn) -> Self {
        Self::default().with("retro_get_system_info", system_info as *const ())
    }

    /// Export `symbol` at `addr`, replacing any previous definition
    pub fn with(mut self, symbol: &'static str, addr: *const ()) -> Self {
        self.symbols.insert(symbol, addr as usize);
        self
    }

    /// Stop exporting `symbol`
    pub fn without(mut self, symbol: &str) -> Self {
        self.symbols.remove(symbol);
        self
    }
}

impl SymbolSource for StubLibrary {
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        self.symbols
            .get(name)
            .and_then(|&addr| NonNull::new(addr as *mut c_void))
    }
}

/// Opener serving [`StubLibrary`] instances by file name.
#[derive(Debug, Clone, Default)]
pub struct StubOpener {
    libraries: HashMap<String, StubLibrary>,
    statically_linked: bool,
}

impl StubOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `library` for any path whose file name is `file_name`
    pub fn with(mut self, file_name: &str, library: StubLibrary) -> Self {
        self.libraries.insert(file_name.to_string(), library);
        self
    }

    /// Pretend the core ABI is linked into the process
    pub fn statically_linked(mut self) -> Self {
        self.statically_linked = true;
        self
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl CoreOpener for StubOpener {
    type Library = StubLibrary;

    unsafe fn open(&self, path: &Path) -> Result<StubLibrary, LoaderError> {
        self.libraries
            .get(&Self::file_name(path))
            .cloned()
            .ok_or_else(|| LoaderError::LibraryOpen {
                path: PathBuf::from(path),
                reason: "no such stub library".to_string(),
            })
    }

    fn exported_by_process(&self, _name: &str) -> bool {
        self.statically_linked
    }
}
