//! Shared library access
//!
//! The loader only ever needs two things from a platform: open a library by
//! path and look up an exported address by name. Both sit behind traits so
//! discovery and binding work the same over real libraries and in-memory
//! stub cores.

use libloading::Library;
use or_core::LoaderError;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// Something that exports named symbols.
pub trait SymbolSource {
    /// Address of the exported symbol `name`, or `None` if it isn't exported.
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>>;
}

/// Opens core libraries.
pub trait CoreOpener {
    type Library: SymbolSource;

    /// Open the library at `path`.
    ///
    /// # Safety
    /// Opening a library runs its initialisers. The library must be trusted.
    unsafe fn open(&self, path: &Path) -> Result<Self::Library, LoaderError>;

    /// Whether the running process image already exports `name`.
    fn exported_by_process(&self, name: &str) -> bool;
}

/// A dynamically loaded library, unloaded on drop.
pub struct DynamicLibrary {
    library: Library,
    path: PathBuf,
}

impl DynamicLibrary {
    /// Path the library was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolSource for DynamicLibrary {
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        // SAFETY: the symbol is only read as an address; nothing is called here.
        let sym = unsafe { self.library.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        NonNull::new(*sym)
    }
}

impl std::fmt::Debug for DynamicLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLibrary")
            .field("path", &self.path)
            .finish()
    }
}

/// Opener backed by the platform loader (`dlopen`/`LoadLibrary`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeOpener;

impl CoreOpener for NativeOpener {
    type Library = DynamicLibrary;

    unsafe fn open(&self, path: &Path) -> Result<DynamicLibrary, LoaderError> {
        // SAFETY: caller guarantees the library is trusted.
        let library = unsafe { Library::new(path) }.map_err(|e| LoaderError::LibraryOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(DynamicLibrary {
            library,
            path: path.to_path_buf(),
        })
    }

    #[cfg(unix)]
    fn exported_by_process(&self, name: &str) -> bool {
        let this = libloading::os::unix::Library::this();
        // SAFETY: the symbol is only checked for presence.
        unsafe { this.get::<*mut c_void>(name.as_bytes()) }
            .map(|sym| !(*sym).is_null())
            .unwrap_or(false)
    }

    #[cfg(windows)]
    fn exported_by_process(&self, name: &str) -> bool {
        match libloading::os::windows::Library::this() {
            // SAFETY: the symbol is only checked for presence.
            Ok(this) => unsafe { this.get::<*mut c_void>(name.as_bytes()) }.is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_nonexistent_library() {
        let result = unsafe { NativeOpener.open(Path::new("/nonexistent/libcore_xyz.so")) };
        assert!(matches!(result, Err(LoaderError::LibraryOpen { .. })));
    }

    #[test]
    fn test_core_abi_not_linked_into_tests() {
        assert!(!NativeOpener.exported_by_process("retro_init"));
    }
}
