//! Tests for the process-wide negotiator slot and its C entry points

use or_core::EnvironmentSettings;
use or_environ::{
    environment_callback, hw_current_framebuffer, hw_proc_address, install_negotiator,
    is_negotiator_installed, take_negotiator, with_negotiator, HwContextFamily, Negotiator,
    PixelFormat, VideoDriver,
};
use or_ffi::environment as cmd;
use or_ffi::{hw_context, pixel_format, ProcAddressFn, RetroHwRenderCallback};
use parking_lot::Mutex;
use std::ffi::{c_void, CStr};
use std::ptr;

/// The slot is global, so tests touching it take turns.
static SLOT_GUARD: Mutex<()> = parking_lot::const_mutex(());

fn negotiator() -> Negotiator {
    Negotiator::new(EnvironmentSettings {
        crop_overscan: true,
        allow_rotate: true,
        system_directory: None,
        variables: "A=on".to_string(),
        video_driver: "gl".to_string(),
    })
    .with_hw_family(Some(HwContextFamily::Gl))
}

unsafe extern "C" fn gl_clear() {}

struct FramebufferDriver;

impl VideoDriver for FramebufferDriver {
    fn ident(&self) -> &str {
        "gl"
    }

    fn current_framebuffer(&self) -> usize {
        7
    }

    fn proc_address(&self, symbol: &CStr) -> Option<ProcAddressFn> {
        (symbol == c"glClear").then_some(gl_clear as ProcAddressFn)
    }
}

#[test]
fn test_install_is_exclusive() {
    let _guard = SLOT_GUARD.lock();
    assert!(!is_negotiator_installed());

    assert!(install_negotiator(negotiator()).is_ok());
    assert!(is_negotiator_installed());
    assert!(install_negotiator(negotiator()).is_err());

    assert!(take_negotiator().is_some());
    assert!(!is_negotiator_installed());
    assert!(take_negotiator().is_none());
}

#[test]
fn test_callback_without_session_rejects() {
    let _guard = SLOT_GUARD.lock();
    let mut format = pixel_format::RGB565;
    let accepted =
        unsafe { environment_callback(cmd::SET_PIXEL_FORMAT, &mut format as *mut u32 as *mut c_void) };
    assert!(!accepted);
}

#[test]
fn test_callback_reaches_installed_negotiator() {
    let _guard = SLOT_GUARD.lock();
    install_negotiator(negotiator()).unwrap();

    let mut format = pixel_format::RGB565;
    let accepted =
        unsafe { environment_callback(cmd::SET_PIXEL_FORMAT, &mut format as *mut u32 as *mut c_void) };
    assert!(accepted);
    assert_eq!(with_negotiator(|env| env.state().pixel_format), Some(PixelFormat::Rgb565));

    let negotiator = take_negotiator().unwrap();
    assert_eq!(negotiator.state().pixel_format, PixelFormat::Rgb565);
}

#[test]
fn test_hw_hooks_forward_to_active_driver() {
    let _guard = SLOT_GUARD.lock();

    // No session: hooks degrade.
    assert_eq!(unsafe { hw_current_framebuffer() }, 0);
    assert!(unsafe { hw_proc_address(c"glClear".as_ptr()) }.is_none());

    install_negotiator(negotiator()).unwrap();

    let mut render = RetroHwRenderCallback {
        context_type: hw_context::OPENGL,
        ..Default::default()
    };
    let accepted = unsafe {
        environment_callback(cmd::SET_HW_RENDER, &mut render as *mut RetroHwRenderCallback as *mut c_void)
    };
    assert!(accepted);
    let framebuffer = render.get_current_framebuffer.unwrap();
    let proc_address = render.get_proc_address.unwrap();

    // Accepted before a driver runs: still degrades.
    assert_eq!(unsafe { framebuffer() }, 0);

    with_negotiator(|env| env.video_mut().attach(Box::new(FramebufferDriver)));
    assert_eq!(unsafe { framebuffer() }, 7);
    assert!(unsafe { proc_address(c"glClear".as_ptr()) }.is_some());
    assert!(unsafe { proc_address(c"glNope".as_ptr()) }.is_none());
    assert!(unsafe { proc_address(ptr::null()) }.is_none());

    // A busy slot never blocks the hooks.
    let busy = with_negotiator(|_| unsafe { framebuffer() });
    assert_eq!(busy, Some(0));

    take_negotiator();
}
