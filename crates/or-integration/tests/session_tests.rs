//! Tests for the core session lifecycle against an in-memory core

use or_core::{Config, SessionError};
use or_environ::{HwContextFamily, PixelFormat, VideoDriver, HW_RENDER_DRIVER};
use or_ffi::environment as cmd;
use or_ffi::{
    hw_context, pixel_format, EnvironmentFn, RetroGameInfo, RetroHwRenderCallback, RetroVariable,
    VideoRefreshFn,
};
use or_integration::{dataplane, CoreSession, FrameGeometry};
use or_loader::testing::{info_snes, StubLibrary, StubOpener};
use parking_lot::Mutex;
use std::ffi::{c_void, CStr};
use std::path::{Path, PathBuf};
use std::ptr;
use tempfile::TempDir;

/// Sessions share the process-wide negotiator slot, so tests take turns.
static SESSION_GUARD: Mutex<()> = parking_lot::const_mutex(());

static ENVIRONMENT: Mutex<Option<EnvironmentFn>> = parking_lot::const_mutex(None);
static VIDEO: Mutex<Option<VideoRefreshFn>> = parking_lot::const_mutex(None);
static SEEN_VARIABLE: Mutex<Option<String>> = parking_lot::const_mutex(None);

fn environment() -> EnvironmentFn {
    ENVIRONMENT.lock().expect("core has no environment callback")
}

unsafe extern "C" fn core_set_environment(callback: EnvironmentFn) {
    *ENVIRONMENT.lock() = Some(callback);
}

unsafe extern "C" fn core_set_video_refresh(callback: VideoRefreshFn) {
    *VIDEO.lock() = Some(callback);
}

/// Negotiates the way a typical core does while loading content
unsafe extern "C" fn core_load_game(_info: *const RetroGameInfo) -> bool {
    let env = environment();

    let mut format = pixel_format::XRGB8888;
    if !env(cmd::SET_PIXEL_FORMAT, &mut format as *mut u32 as *mut c_void) {
        return false;
    }

    let mut var = RetroVariable { key: c"stub_region".as_ptr(), value: ptr::null() };
    if env(cmd::GET_VARIABLE, &mut var as *mut RetroVariable as *mut c_void) && !var.value.is_null() {
        *SEEN_VARIABLE.lock() = Some(CStr::from_ptr(var.value).to_string_lossy().into_owned());
    }

    let mut render = RetroHwRenderCallback {
        context_type: hw_context::OPENGL,
        ..Default::default()
    };
    env(cmd::SET_HW_RENDER | cmd::EXPERIMENTAL, &mut render as *mut _ as *mut c_void);
    true
}

unsafe extern "C" fn core_run() {
    if let Some(video) = *VIDEO.lock() {
        video(ptr::null(), 256, 224, 512);
    }
}

fn lib_name() -> String {
    format!("snes.{}", std::env::consts::DLL_EXTENSION)
}

fn opener() -> StubOpener {
    let library = StubLibrary::complete(info_snes)
        .with("retro_set_environment", core_set_environment as *const ())
        .with("retro_set_video_refresh", core_set_video_refresh as *const ())
        .with("retro_load_game", core_load_game as *const ())
        .with("retro_run", core_run as *const ());
    StubOpener::new().with(&lib_name(), library)
}

fn config() -> Config {
    let mut config = Config::default();
    config.core.path = PathBuf::from(lib_name());
    config.core.variables = "stub_region=pal;stub_turbo=off".to_string();
    config.video.driver = "sdl".to_string();
    config
}

struct ShutdownDriver;

impl VideoDriver for ShutdownDriver {
    fn ident(&self) -> &str {
        "gl"
    }

    fn current_framebuffer(&self) -> usize {
        3
    }
}

#[test]
fn test_session_negotiates_during_load() {
    let _guard = SESSION_GUARD.lock();
    let session = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("game.sfc")) }.unwrap();
    assert_eq!(session.content(), Path::new("game.sfc"));

    let core = session.core();
    core.init();
    assert!(core.load_game(&or_loader::ContentInfo {
        path: Some(session.content()),
        ..Default::default()
    }));

    let (format, driver, hw_render) = session
        .with_environment(|env| {
            (
                env.state().pixel_format,
                env.video().selected().to_string(),
                env.state().hw_render.is_some(),
            )
        })
        .unwrap();
    assert_eq!(format, PixelFormat::Xrgb8888);
    assert_eq!(SEEN_VARIABLE.lock().as_deref(), Some("pal"));

    // The stub core asks for desktop GL.
    if HwContextFamily::compiled() == Some(HwContextFamily::Gl) {
        assert_eq!(driver, HW_RENDER_DRIVER);
        assert!(hw_render);
    } else {
        assert_eq!(driver, "sdl");
        assert!(!hw_render);
    }

    core.unload_game();
    core.deinit();
}

#[test]
fn test_second_session_is_refused() {
    let _guard = SESSION_GUARD.lock();
    let first = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("a.sfc")) }.unwrap();

    let second = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("b.sfc")) };
    assert!(matches!(second, Err(SessionError::AlreadyLoaded)));

    drop(first);
    let third = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("c.sfc")) };
    assert!(third.is_ok());
}

#[test]
fn test_callbacks_rejected_after_drop() {
    let _guard = SESSION_GUARD.lock();
    let session = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("game.sfc")) }.unwrap();
    let env = environment();
    drop(session);

    let mut format = pixel_format::RGB565;
    assert!(!unsafe { env(cmd::SET_PIXEL_FORMAT, &mut format as *mut u32 as *mut c_void) });
}

#[test]
fn test_shutdown_and_video_driver() {
    let _guard = SESSION_GUARD.lock();
    let session = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("game.sfc")) }.unwrap();
    assert!(!session.shutdown_requested());

    assert!(unsafe { environment()(cmd::SHUTDOWN, ptr::null_mut()) });
    assert!(session.shutdown_requested());

    session.attach_video_driver(Box::new(ShutdownDriver));
    let framebuffer = session.with_environment(|env| {
        env.video().active().map(|driver| driver.current_framebuffer())
    });
    assert_eq!(framebuffer, Some(Some(3)));
}

#[test]
fn test_run_reaches_default_video_refresh() {
    let _guard = SESSION_GUARD.lock();
    let session = unsafe { CoreSession::bind_with(&opener(), &config(), Path::new("game.sfc")) }.unwrap();
    dataplane::reset();

    session.core().run();
    session.core().run();

    assert_eq!(dataplane::frame_count(), 2);
    assert_eq!(
        dataplane::last_frame(),
        Some(FrameGeometry { width: 256, height: 224, pitch: 512, duped: true })
    );
}

#[test]
fn test_session_discovers_core_in_directory() {
    let _guard = SESSION_GUARD.lock();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(lib_name()), b"").unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

    let mut config = config();
    config.core.path = dir.path().to_path_buf();

    let session = unsafe { CoreSession::bind_with(&opener(), &config, Path::new("/roms/game.sfc")) }.unwrap();
    assert_eq!(session.core().path(), dir.path().join(lib_name()).as_path());
    assert_eq!(session.core().system_info().library_name, "Stub SNES");
}

#[test]
fn test_missing_core_is_a_loader_error() {
    let _guard = SESSION_GUARD.lock();
    let mut config = config();
    config.core.path = PathBuf::from("/nowhere/missing.so");

    let result = unsafe { CoreSession::bind_with(&opener(), &config, Path::new("game.sfc")) };
    assert!(matches!(result, Err(SessionError::Loader(_))));
}
