//! Core-reported system information

use crate::library::{CoreOpener, SymbolSource};
use or_core::LoaderError;
use or_ffi::RetroSystemInfo;
use std::ffi::{c_char, CStr};
use std::path::Path;
use tracing::debug;

/// Owned copy of `retro_system_info`.
///
/// The strings are copied out of the core, so this outlives the library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub library_name: String,
    pub library_version: String,
    /// `|`-delimited extension list
    pub valid_extensions: String,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

unsafe fn copy_cstr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        // SAFETY: caller guarantees a valid NUL-terminated string.
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

impl SystemInfo {
    /// Copy the strings out of a core-filled struct.
    ///
    /// # Safety
    /// Every non-null pointer in `raw` must reference a NUL-terminated string.
    pub unsafe fn from_raw(raw: &RetroSystemInfo) -> Self {
        Self {
            library_name: copy_cstr(raw.library_name),
            library_version: copy_cstr(raw.library_version),
            valid_extensions: copy_cstr(raw.valid_extensions),
            need_fullpath: raw.need_fullpath,
            block_extract: raw.block_extract,
        }
    }

    /// Advertised extensions, without empty entries
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.valid_extensions.split('|').filter(|ext| !ext.is_empty())
    }

    /// Whether the core advertises `extension` (ASCII case-insensitive)
    pub fn supports_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.extensions().any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Filesystem-friendly name for the core: lowercased, whitespace replaced by `_`.
pub fn core_pathname(info: &SystemInfo) -> String {
    let name = if info.library_name.is_empty() {
        "Unknown"
    } else {
        info.library_name.as_str()
    };

    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Query `retro_get_system_info` from a bound or probe-loaded library.
///
/// # Safety
/// `get_system_info` must be a valid `retro_get_system_info`.
pub(crate) unsafe fn query_system_info(
    get_system_info: unsafe extern "C" fn(*mut RetroSystemInfo),
) -> SystemInfo {
    let mut raw = RetroSystemInfo::default();
    // SAFETY: guaranteed by the caller.
    unsafe {
        get_system_info(&mut raw);
        SystemInfo::from_raw(&raw)
    }
}

/// Probe-load a library for its system info, without binding it.
///
/// Only `retro_get_system_info` is resolved. The library is closed again
/// before returning.
///
/// # Safety
/// The library runs arbitrary code when opened and queried; it must be trusted.
pub unsafe fn probe_system_info<O: CoreOpener>(
    opener: &O,
    path: &Path,
) -> Result<SystemInfo, LoaderError> {
    // SAFETY: caller guarantees the library is trusted.
    let library = unsafe { opener.open(path)? };

    let addr = library
        .symbol("retro_get_system_info")
        .ok_or_else(|| LoaderError::MissingSymbol {
            path: path.to_path_buf(),
            symbol: "retro_get_system_info",
        })?;

    // SAFETY: the symbol has the ABI signature of retro_get_system_info.
    let info = unsafe {
        let get_system_info = std::mem::transmute::<
            *mut std::ffi::c_void,
            unsafe extern "C" fn(*mut RetroSystemInfo),
        >(addr.as_ptr());
        query_system_info(get_system_info)
    };

    debug!(
        "Probed {:?}: {} {} [{}]",
        path, info.library_name, info.library_version, info.valid_extensions
    );

    drop(library);
    Ok(info)
}
