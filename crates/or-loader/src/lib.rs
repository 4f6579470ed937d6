//! Dynamic libretro core loader
//!
//! Locates a core library (directly or by probing a directory), binds the
//! full libretro entry-point table and hands back a [`CoreHandle`]. Every
//! failure here is fatal to the caller; there is no partially bound core.

pub mod api;
pub mod discovery;
pub mod handle;
pub mod info;
pub mod library;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use api::CoreApi;
pub use discovery::{find_core, list_candidates};
pub use handle::{ContentInfo, CoreHandle};
pub use info::{core_pathname, probe_system_info, SystemInfo};
pub use library::{CoreOpener, DynamicLibrary, NativeOpener, SymbolSource};

use or_core::LoaderError;
use std::path::Path;
use tracing::{error, info};

/// Entry point probed in the process image to detect a statically linked core
pub const STATIC_LINK_PROBE: &str = "retro_init";

/// Locate, open and bind a core.
///
/// `core_path` is either a library or a directory; a directory is searched
/// for the first core advertising the extension of `content_path`.
///
/// # Safety
/// The selected library (and every candidate probed during discovery) runs
/// arbitrary code when opened and queried. Only trusted core paths may be
/// passed.
pub unsafe fn load_core<O: CoreOpener>(
    opener: &O,
    core_path: &Path,
    content_path: &Path,
) -> Result<CoreHandle<O::Library>, LoaderError> {
    // Loading the same ABI both dynamically and through the linker resolves
    // half the calls into the wrong copy.
    if opener.exported_by_process(STATIC_LINK_PROBE) {
        error!("The frontend wants to load a core dynamically, but the core ABI is already linked in");
        error!("This can happen if a module the frontend depends on links against a core directly");
        return Err(LoaderError::StaticallyLinked(STATIC_LINK_PROBE));
    }

    if core_path.as_os_str().is_empty() {
        return Err(LoaderError::EmptyCorePath);
    }

    let library_path = if core_path.is_dir() {
        find_core(opener, core_path, content_path)?
    } else {
        core_path.to_path_buf()
    };

    info!("Loading dynamic libretro core from {:?}", library_path);
    CoreHandle::open(opener, &library_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{info_gb, info_nes, StubLibrary, StubOpener};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn lib_name(stem: &str) -> String {
        format!("{}.{}", stem, std::env::consts::DLL_EXTENSION)
    }

    #[test]
    fn test_load_core_from_file() {
        let opener = StubOpener::new().with(&lib_name("nes"), StubLibrary::complete(info_nes));
        let core = unsafe {
            load_core(&opener, Path::new(&lib_name("nes")), Path::new("mario.nes"))
        }
        .unwrap();
        assert_eq!(core.system_info().library_name, "Stub NES");
    }

    #[test]
    fn test_load_core_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(lib_name("gb")), b"").unwrap();
        std::fs::write(dir.path().join(lib_name("nes")), b"").unwrap();

        let opener = StubOpener::new()
            .with(&lib_name("gb"), StubLibrary::complete(info_gb))
            .with(&lib_name("nes"), StubLibrary::complete(info_nes));

        let core = unsafe { load_core(&opener, dir.path(), Path::new("zelda.gbc")) }.unwrap();
        assert_eq!(core.path(), dir.path().join(lib_name("gb")).as_path());
    }

    #[test]
    fn test_empty_core_path_is_fatal() {
        let opener = StubOpener::new();
        let result = unsafe { load_core(&opener, Path::new(""), Path::new("mario.nes")) };
        assert!(matches!(result, Err(LoaderError::EmptyCorePath)));
    }

    #[test]
    fn test_statically_linked_core_is_fatal() {
        let opener = StubOpener::new()
            .with(&lib_name("nes"), StubLibrary::complete(info_nes))
            .statically_linked();
        let result = unsafe {
            load_core(&opener, Path::new(&lib_name("nes")), Path::new("mario.nes"))
        };
        assert!(matches!(
            result,
            Err(LoaderError::StaticallyLinked(STATIC_LINK_PROBE))
        ));
    }

    #[test]
    fn test_missing_library_is_fatal() {
        let opener = StubOpener::new();
        let result = unsafe {
            load_core(&opener, &PathBuf::from("/nowhere/core.so"), Path::new("mario.nes"))
        };
        assert!(matches!(result, Err(LoaderError::LibraryOpen { .. })));
    }
}
