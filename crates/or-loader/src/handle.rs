//! Loaded core handle

use crate::api::CoreApi;
use crate::info::{query_system_info, SystemInfo};
use crate::library::{CoreOpener, DynamicLibrary, SymbolSource};
use or_core::LoaderError;
use or_ffi::{
    AudioSampleBatchFn, AudioSampleFn, EnvironmentFn, InputPollFn, InputStateFn, RetroGameInfo,
    RetroSystemAvInfo, VideoRefreshFn, RETRO_API_VERSION,
};
use std::ffi::{c_void, CString};
use std::path::{Path, PathBuf};
use std::ptr;
use tracing::{debug, info, warn};

/// Content handed to `retro_load_game`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentInfo<'a> {
    pub path: Option<&'a Path>,
    pub data: Option<&'a [u8]>,
    pub meta: Option<&'a str>,
}

/// Keeps the C strings of a [`ContentInfo`] alive while the core reads them.
struct RawContent {
    _path: Option<CString>,
    _meta: Option<CString>,
    info: RetroGameInfo,
}

impl RawContent {
    fn new(content: &ContentInfo<'_>) -> Option<Self> {
        let path = match content.path {
            Some(path) => Some(CString::new(path.to_string_lossy().into_owned()).ok()?),
            None => None,
        };
        let meta = match content.meta {
            Some(meta) => Some(CString::new(meta).ok()?),
            None => None,
        };

        let info = RetroGameInfo {
            path: path.as_ref().map_or(ptr::null(), |p| p.as_ptr()),
            data: content.data.map_or(ptr::null(), |d| d.as_ptr() as *const c_void),
            size: content.data.map_or(0, |d| d.len()),
            meta: meta.as_ref().map_or(ptr::null(), |m| m.as_ptr()),
        };

        Some(Self {
            _path: path,
            _meta: meta,
            info,
        })
    }
}

/// A bound core: the library plus its fully populated entry-point table.
///
/// Dropping the handle unloads the library.
pub struct CoreHandle<L: SymbolSource = DynamicLibrary> {
    api: CoreApi,
    path: PathBuf,
    // Declared last so the table never outlives the code it points into.
    _library: L,
}

impl<L: SymbolSource> CoreHandle<L> {
    /// Open `path` and bind every entry point.
    ///
    /// # Safety
    /// The library must be a trusted libretro core.
    pub unsafe fn open<O>(opener: &O, path: &Path) -> Result<Self, LoaderError>
    where
        O: CoreOpener<Library = L>,
    {
        // SAFETY: caller guarantees the library is trusted.
        let library = unsafe { opener.open(path)? };
        // SAFETY: a trusted core exports the ABI signatures; the table is
        // stored next to the library and dropped before it.
        let api = unsafe { CoreApi::bind(&library, path)? };

        let handle = Self {
            api,
            path: path.to_path_buf(),
            _library: library,
        };

        let version = handle.api_version();
        if version != RETRO_API_VERSION {
            warn!(
                "Core {:?} reports API version {}, frontend expects {}",
                path, version, RETRO_API_VERSION
            );
        }

        info!("Bound {} entry points from {:?}", CoreApi::SYMBOLS.len(), path);
        Ok(handle)
    }

    /// Raw entry-point table
    pub fn api(&self) -> &CoreApi {
        &self.api
    }

    /// Library path the core was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api_version(&self) -> u32 {
        unsafe { (self.api.api_version)() }
    }

    pub fn init(&self) {
        debug!("retro_init");
        unsafe { (self.api.init)() }
    }

    pub fn deinit(&self) {
        debug!("retro_deinit");
        unsafe { (self.api.deinit)() }
    }

    pub fn system_info(&self) -> SystemInfo {
        unsafe { query_system_info(self.api.get_system_info) }
    }

    pub fn system_av_info(&self) -> RetroSystemAvInfo {
        let mut av_info = RetroSystemAvInfo::default();
        unsafe { (self.api.get_system_av_info)(&mut av_info) };
        av_info
    }

    pub fn set_environment(&self, callback: EnvironmentFn) {
        unsafe { (self.api.set_environment)(callback) }
    }

    pub fn set_video_refresh(&self, callback: VideoRefreshFn) {
        unsafe { (self.api.set_video_refresh)(callback) }
    }

    pub fn set_audio_sample(&self, callback: AudioSampleFn) {
        unsafe { (self.api.set_audio_sample)(callback) }
    }

    pub fn set_audio_sample_batch(&self, callback: AudioSampleBatchFn) {
        unsafe { (self.api.set_audio_sample_batch)(callback) }
    }

    pub fn set_input_poll(&self, callback: InputPollFn) {
        unsafe { (self.api.set_input_poll)(callback) }
    }

    pub fn set_input_state(&self, callback: InputStateFn) {
        unsafe { (self.api.set_input_state)(callback) }
    }

    pub fn set_controller_port_device(&self, port: u32, device: u32) {
        unsafe { (self.api.set_controller_port_device)(port, device) }
    }

    pub fn reset(&self) {
        unsafe { (self.api.reset)() }
    }

    /// Run the core for one video frame
    pub fn run(&self) {
        unsafe { (self.api.run)() }
    }

    /// Bytes needed to hold a save state
    pub fn serialize_size(&self) -> usize {
        unsafe { (self.api.serialize_size)() }
    }

    /// Write a save state into `buf`, sized with [`Self::serialize_size`]
    pub fn serialize(&self, buf: &mut [u8]) -> bool {
        unsafe { (self.api.serialize)(buf.as_mut_ptr() as *mut c_void, buf.len()) }
    }

    pub fn unserialize(&self, buf: &[u8]) -> bool {
        unsafe { (self.api.unserialize)(buf.as_ptr() as *const c_void, buf.len()) }
    }

    pub fn cheat_reset(&self) {
        unsafe { (self.api.cheat_reset)() }
    }

    /// Returns `false` without calling the core if `code` contains a NUL byte.
    pub fn cheat_set(&self, index: u32, enabled: bool, code: &str) -> bool {
        let Ok(code) = CString::new(code) else {
            warn!("Cheat #{} contains a NUL byte, ignoring", index);
            return false;
        };
        unsafe { (self.api.cheat_set)(index, enabled, code.as_ptr()) };
        true
    }

    pub fn load_game(&self, content: &ContentInfo<'_>) -> bool {
        let Some(raw) = RawContent::new(content) else {
            warn!("Content path or metadata contains a NUL byte");
            return false;
        };
        unsafe { (self.api.load_game)(&raw.info) }
    }

    pub fn load_game_special(&self, game_type: u32, contents: &[ContentInfo<'_>]) -> bool {
        let Some(raw) = contents.iter().map(RawContent::new).collect::<Option<Vec<_>>>() else {
            warn!("Content path or metadata contains a NUL byte");
            return false;
        };
        let infos: Vec<RetroGameInfo> = raw.iter().map(|r| r.info).collect();
        unsafe { (self.api.load_game_special)(game_type, infos.as_ptr(), infos.len()) }
    }

    pub fn unload_game(&self) {
        unsafe { (self.api.unload_game)() }
    }

    /// One of [`or_ffi::region`]
    pub fn region(&self) -> u32 {
        unsafe { (self.api.get_region)() }
    }

    /// Core memory region `id` (see [`or_ffi::memory`]), if the core exposes it
    pub fn memory(&mut self, id: u32) -> Option<&mut [u8]> {
        let size = unsafe { (self.api.get_memory_size)(id) };
        let data = unsafe { (self.api.get_memory_data)(id) } as *mut u8;
        if data.is_null() || size == 0 {
            return None;
        }
        // SAFETY: the core guarantees `size` bytes at `data` while the game is loaded;
        // the borrow of `self` keeps the library mapped.
        Some(unsafe { std::slice::from_raw_parts_mut(data, size) })
    }
}

impl<L: SymbolSource> std::fmt::Debug for CoreHandle<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreHandle").field("path", &self.path).finish()
    }
}
