//! The libretro entry-point table and its binder

use crate::library::SymbolSource;
use or_core::LoaderError;
use or_ffi::{
    AudioSampleBatchFn, AudioSampleFn, EnvironmentFn, InputPollFn, InputStateFn, RetroGameInfo,
    RetroSystemAvInfo, RetroSystemInfo, VideoRefreshFn,
};
use std::ffi::{c_char, c_uint, c_void};
use std::path::Path;
use std::ptr::NonNull;
use tracing::{error, trace};

fn resolve<S: SymbolSource + ?Sized>(
    source: &S,
    path: &Path,
    symbol: &'static str,
) -> Result<NonNull<c_void>, LoaderError> {
    match source.symbol(symbol) {
        Some(addr) => {
            trace!("Resolved {} at {:p}", symbol, addr);
            Ok(addr)
        }
        None => {
            error!("Failed to load symbol \"{}\" from {:?}", symbol, path);
            Err(LoaderError::MissingSymbol {
                path: path.to_path_buf(),
                symbol,
            })
        }
    }
}

macro_rules! core_api {
    ($( $field:ident: $symbol:literal => $ty:ty, )*) => {
        /// Function pointers bound from a loaded core, one per libretro entry point.
        ///
        /// Only ever constructed fully populated; see [`CoreApi::bind`].
        #[derive(Debug, Clone, Copy)]
        pub struct CoreApi {
            $( pub $field: $ty, )*
        }

        impl CoreApi {
            /// Exported names, in binding order
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol),*];

            /// Resolve every entry point from `source`.
            ///
            /// The first missing symbol fails the whole bind.
            ///
            /// # Safety
            /// Each exported symbol must have the signature the libretro ABI
            /// gives it, and `source` must outlive every use of the table.
            pub unsafe fn bind<S: SymbolSource + ?Sized>(
                source: &S,
                path: &Path,
            ) -> Result<Self, LoaderError> {
                Ok(Self {
                    $( $field: {
                        let addr = resolve(source, path, $symbol)?;
                        // SAFETY: guaranteed by the caller; function and data
                        // pointers share a representation on supported targets.
                        unsafe { std::mem::transmute::<*mut c_void, $ty>(addr.as_ptr()) }
                    }, )*
                })
            }
        }
    };
}

core_api! {
    api_version: "retro_api_version" => unsafe extern "C" fn() -> c_uint,
    init: "retro_init" => unsafe extern "C" fn(),
    deinit: "retro_deinit" => unsafe extern "C" fn(),
    get_system_info: "retro_get_system_info" => unsafe extern "C" fn(*mut RetroSystemInfo),
    get_system_av_info: "retro_get_system_av_info" => unsafe extern "C" fn(*mut RetroSystemAvInfo),
    set_environment: "retro_set_environment" => unsafe extern "C" fn(EnvironmentFn),
    set_video_refresh: "retro_set_video_refresh" => unsafe extern "C" fn(VideoRefreshFn),
    set_audio_sample: "retro_set_audio_sample" => unsafe extern "C" fn(AudioSampleFn),
    set_audio_sample_batch: "retro_set_audio_sample_batch" => unsafe extern "C" fn(AudioSampleBatchFn),
    set_input_poll: "retro_set_input_poll" => unsafe extern "C" fn(InputPollFn),
    set_input_state: "retro_set_input_state" => unsafe extern "C" fn(InputStateFn),
    set_controller_port_device: "retro_set_controller_port_device" => unsafe extern "C" fn(c_uint, c_uint),
    reset: "retro_reset" => unsafe extern "C" fn(),
    run: "retro_run" => unsafe extern "C" fn(),
    serialize_size: "retro_serialize_size" => unsafe extern "C" fn() -> usize,
    serialize: "retro_serialize" => unsafe extern "C" fn(*mut c_void, usize) -> bool,
    unserialize: "retro_unserialize" => unsafe extern "C" fn(*const c_void, usize) -> bool,
    cheat_reset: "retro_cheat_reset" => unsafe extern "C" fn(),
    cheat_set: "retro_cheat_set" => unsafe extern "C" fn(c_uint, bool, *const c_char),
    load_game: "retro_load_game" => unsafe extern "C" fn(*const RetroGameInfo) -> bool,
    load_game_special: "retro_load_game_special" => unsafe extern "C" fn(c_uint, *const RetroGameInfo, usize) -> bool,
    unload_game: "retro_unload_game" => unsafe extern "C" fn(),
    get_region: "retro_get_region" => unsafe extern "C" fn() -> c_uint,
    get_memory_data: "retro_get_memory_data" => unsafe extern "C" fn(c_uint) -> *mut c_void,
    get_memory_size: "retro_get_memory_size" => unsafe extern "C" fn(c_uint) -> usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{info_nes, StubLibrary};

    #[test]
    fn test_manifest_covers_every_slot() {
        assert_eq!(CoreApi::SYMBOLS.len(), 25);
        assert!(CoreApi::SYMBOLS.iter().all(|s| s.starts_with("retro_")));
        assert!(CoreApi::SYMBOLS.contains(&"retro_get_memory_size"));
    }

    #[test]
    fn test_bind_complete_core() {
        let lib = StubLibrary::complete(info_nes);
        let api = unsafe { CoreApi::bind(&lib, Path::new("nes.so")) }.unwrap();
        assert_eq!(unsafe { (api.api_version)() }, or_ffi::RETRO_API_VERSION);
    }

    #[test]
    fn test_every_missing_symbol_fails_the_bind() {
        for &symbol in CoreApi::SYMBOLS {
            let lib = StubLibrary::complete(info_nes).without(symbol);
            let result = unsafe { CoreApi::bind(&lib, Path::new("broken.so")) };
            match result {
                Err(LoaderError::MissingSymbol { symbol: missing, path }) => {
                    assert_eq!(missing, symbol);
                    assert_eq!(path, Path::new("broken.so"));
                }
                other => panic!("bind without {} returned {:?}", symbol, other.map(|_| ())),
            }
        }
    }
}
