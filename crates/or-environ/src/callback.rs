//! Process-wide negotiator slot and the `extern "C"` entry points handed to cores
//!
//! libretro callbacks carry no user data, so the active [`Negotiator`] lives
//! in a single global slot. Only one core session may own it at a time.

use crate::negotiator::Negotiator;
use once_cell::sync::Lazy;
use or_ffi::ProcAddressFn;
use parking_lot::Mutex;
use std::ffi::{c_char, c_uint, c_void, CStr};
use tracing::{trace, warn};

/// Global negotiator slot
static NEGOTIATOR: Lazy<Mutex<Option<Negotiator>>> = Lazy::new(|| Mutex::new(None));

/// Install `negotiator` as the target of [`environment_callback`].
///
/// Fails, handing the negotiator back, if one is already installed.
pub fn install_negotiator(negotiator: Negotiator) -> Result<(), Negotiator> {
    let mut slot = NEGOTIATOR.lock();
    if slot.is_some() {
        return Err(negotiator);
    }
    *slot = Some(negotiator);
    Ok(())
}

/// Remove and return the installed negotiator
pub fn take_negotiator() -> Option<Negotiator> {
    NEGOTIATOR.lock().take()
}

pub fn is_negotiator_installed() -> bool {
    NEGOTIATOR.lock().is_some()
}

/// Run `f` against the installed negotiator.
///
/// The slot stays locked while `f` runs; `f` must not call into the core.
pub fn with_negotiator<R>(f: impl FnOnce(&mut Negotiator) -> R) -> Option<R> {
    NEGOTIATOR.lock().as_mut().map(f)
}

/// `retro_environment_t` handed to cores
///
/// # Safety
/// Called by the core with a payload matching `cmd`.
pub unsafe extern "C" fn environment_callback(cmd: c_uint, data: *mut c_void) -> bool {
    let mut slot = NEGOTIATOR.lock();
    match slot.as_mut() {
        Some(negotiator) => negotiator.dispatch_raw(cmd, data),
        None => {
            warn!("Environment command {} with no core session, rejecting", cmd);
            false
        }
    }
}

/// `retro_hw_get_current_framebuffer_t` handed to hardware-rendered cores
pub unsafe extern "C" fn hw_current_framebuffer() -> usize {
    let Some(slot) = NEGOTIATOR.try_lock() else {
        trace!("Negotiator busy, reporting framebuffer 0");
        return 0;
    };
    slot.as_ref()
        .and_then(|negotiator| negotiator.video().active())
        .map_or(0, |driver| driver.current_framebuffer())
}

/// `retro_hw_get_proc_address_t` handed to hardware-rendered cores
///
/// # Safety
/// `symbol` must be null or a NUL-terminated string.
pub unsafe extern "C" fn hw_proc_address(symbol: *const c_char) -> Option<ProcAddressFn> {
    if symbol.is_null() {
        return None;
    }
    let symbol = CStr::from_ptr(symbol);

    let Some(slot) = NEGOTIATOR.try_lock() else {
        trace!("Negotiator busy, no address for {:?}", symbol);
        return None;
    };
    slot.as_ref()
        .and_then(|negotiator| negotiator.video().active())
        .and_then(|driver| driver.proc_address(symbol))
}
