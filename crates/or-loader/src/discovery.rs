//! Core discovery by content extension

use crate::info::probe_system_info;
use crate::library::CoreOpener;
use or_core::LoaderError;
use std::env::consts::DLL_EXTENSION;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Native shared libraries in `directory`, in enumeration order.
pub fn list_candidates(directory: &Path) -> Result<Vec<PathBuf>, LoaderError> {
    let entries = std::fs::read_dir(directory).map_err(|source| LoaderError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source,
    })?;

    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension() == Some(OsStr::new(DLL_EXTENSION)))
        .collect())
}

/// Find the first core in `directory` that advertises the extension of `content_path`.
///
/// Each candidate is probe-loaded for its system info and closed again.
/// Candidates that fail to open or don't export `retro_get_system_info`
/// are skipped.
///
/// # Safety
/// Every library in `directory` is opened and runs arbitrary code; the
/// directory must only contain trusted cores.
pub unsafe fn find_core<O: CoreOpener>(
    opener: &O,
    directory: &Path,
    content_path: &Path,
) -> Result<PathBuf, LoaderError> {
    let extension = content_path
        .extension()
        .and_then(OsStr::to_str)
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| LoaderError::NoContentExtension(content_path.to_path_buf()))?;

    info!("Searching for a core supporting \"{}\" in {:?}", extension, directory);

    for candidate in list_candidates(directory)? {
        debug!("Checking library {:?}", candidate);

        // SAFETY: caller guarantees the directory only holds trusted cores.
        let info = match unsafe { probe_system_info(opener, &candidate) } {
            Ok(info) => info,
            Err(e) => {
                debug!("Skipping {:?}: {}", candidate, e);
                continue;
            }
        };

        if info.supports_extension(extension) {
            info!("Found {} {} at {:?}", info.library_name, info.library_version, candidate);
            return Ok(candidate);
        }
    }

    Err(LoaderError::NoMatchingCore {
        directory: directory.to_path_buf(),
        extension: extension.to_string(),
    })
}
