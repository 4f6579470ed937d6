//! Default data-plane callbacks
//!
//! Minimal video, audio and input callbacks registered with every core so
//! that `retro_run` always has valid function pointers to call. Video
//! refresh records the geometry of the last frame; everything else is a
//! sink.

use once_cell::sync::Lazy;
use or_ffi::{AudioSampleBatchFn, AudioSampleFn, InputPollFn, InputStateFn, VideoRefreshFn};
use or_loader::{CoreHandle, SymbolSource};
use parking_lot::Mutex;
use std::ffi::{c_uint, c_void};
use std::sync::atomic::{AtomicU64, Ordering};

/// Geometry of a frame handed to the video refresh callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    /// Bytes per line
    pub pitch: usize,
    /// The core passed no data and asked to repeat the previous frame
    pub duped: bool,
}

static LAST_FRAME: Lazy<Mutex<Option<FrameGeometry>>> = Lazy::new(|| Mutex::new(None));
static FRAME_COUNT: AtomicU64 = AtomicU64::new(0);

/// Geometry of the most recent frame
pub fn last_frame() -> Option<FrameGeometry> {
    *LAST_FRAME.lock()
}

/// Frames delivered since the last [`reset`]
pub fn frame_count() -> u64 {
    FRAME_COUNT.load(Ordering::Relaxed)
}

/// Forget recorded frames
pub fn reset() {
    *LAST_FRAME.lock() = None;
    FRAME_COUNT.store(0, Ordering::Relaxed);
}

unsafe extern "C" fn video_refresh(data: *const c_void, width: c_uint, height: c_uint, pitch: usize) {
    *LAST_FRAME.lock() = Some(FrameGeometry {
        width,
        height,
        pitch,
        duped: data.is_null(),
    });
    FRAME_COUNT.fetch_add(1, Ordering::Relaxed);
}

unsafe extern "C" fn audio_sample(_left: i16, _right: i16) {}

unsafe extern "C" fn audio_sample_batch(_data: *const i16, frames: usize) -> usize {
    frames
}

unsafe extern "C" fn input_poll() {}

unsafe extern "C" fn input_state(_port: c_uint, _device: c_uint, _index: c_uint, _id: c_uint) -> i16 {
    0
}

pub const VIDEO_REFRESH: VideoRefreshFn = video_refresh;
pub const AUDIO_SAMPLE: AudioSampleFn = audio_sample;
pub const AUDIO_SAMPLE_BATCH: AudioSampleBatchFn = audio_sample_batch;
pub const INPUT_POLL: InputPollFn = input_poll;
pub const INPUT_STATE: InputStateFn = input_state;

/// Register the default callbacks with `core`
pub fn register<L: SymbolSource>(core: &CoreHandle<L>) {
    core.set_video_refresh(VIDEO_REFRESH);
    core.set_audio_sample(AUDIO_SAMPLE);
    core.set_audio_sample_batch(AUDIO_SAMPLE_BATCH);
    core.set_input_poll(INPUT_POLL);
    core.set_input_state(INPUT_STATE);
}
