//! Environment requests decoded at the FFI edge

use or_ffi::environment as cmd;
use or_ffi::{
    KeyboardEventFn, RetroDiskControlCallback, RetroHwRenderCallback, RetroInputDescriptor,
    RetroKeyboardCallback, RetroMessage, RetroVariable,
};
use std::ffi::{c_char, c_void, CStr};
use std::ptr;

/// One entry of a SET_INPUT_DESCRIPTORS array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDescriptor<'a> {
    pub port: u32,
    pub device: u32,
    pub index: u32,
    pub id: u32,
    pub description: &'a CStr,
}

/// One entry of a SET_VARIABLES array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDeclaration<'a> {
    pub key: &'a CStr,
    pub value: Option<&'a CStr>,
}

/// A decoded environment call.
///
/// Borrowed data lives in the core and is only valid for the duration of
/// the call.
#[derive(Debug)]
pub enum EnvironmentRequest<'a> {
    SetRotation(u32),
    GetOverscan,
    GetCanDupe,
    SetMessage { text: &'a CStr, frames: u32 },
    Shutdown,
    SetPerformanceLevel(u32),
    GetSystemDirectory,
    SetPixelFormat(u32),
    SetInputDescriptors(Vec<InputDescriptor<'a>>),
    SetKeyboardCallback(Option<KeyboardEventFn>),
    SetDiskControlInterface(RetroDiskControlCallback),
    SetHwRender(&'a mut RetroHwRenderCallback),
    /// `key` is `None` when the core asks for every variable at once
    GetVariable { key: Option<&'a CStr> },
    SetVariables(Vec<VariableDeclaration<'a>>),
    Unsupported(u32),
}

/// Strip the experimental flag from a command code
pub fn base_command(raw: u32) -> u32 {
    raw & !cmd::EXPERIMENTAL
}

unsafe fn opt_cstr<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr))
    }
}

impl<'a> EnvironmentRequest<'a> {
    /// Decode a raw environment call.
    ///
    /// Returns `None` if the command needs a payload and `data` is null.
    ///
    /// # Safety
    /// `data` must point to the payload type libretro defines for `raw_cmd`,
    /// valid for `'a`. Arrays must be terminated the way libretro specifies.
    pub unsafe fn from_raw(raw_cmd: u32, data: *mut c_void) -> Option<Self> {
        let command = base_command(raw_cmd);

        match command {
            cmd::SHUTDOWN => return Some(Self::Shutdown),
            cmd::SET_ROTATION
            | cmd::GET_OVERSCAN
            | cmd::GET_CAN_DUPE
            | cmd::SET_MESSAGE
            | cmd::SET_PERFORMANCE_LEVEL
            | cmd::GET_SYSTEM_DIRECTORY
            | cmd::SET_PIXEL_FORMAT
            | cmd::SET_INPUT_DESCRIPTORS
            | cmd::SET_KEYBOARD_CALLBACK
            | cmd::SET_DISK_CONTROL_INTERFACE
            | cmd::SET_HW_RENDER
            | cmd::GET_VARIABLE
            | cmd::SET_VARIABLES => {}
            other => return Some(Self::Unsupported(other)),
        }

        if data.is_null() {
            return None;
        }

        let request = match command {
            cmd::SET_ROTATION => Self::SetRotation(*(data as *const u32)),
            cmd::GET_OVERSCAN => Self::GetOverscan,
            cmd::GET_CAN_DUPE => Self::GetCanDupe,
            cmd::SET_MESSAGE => {
                let message = &*(data as *const RetroMessage);
                Self::SetMessage {
                    text: opt_cstr(message.msg)?,
                    frames: message.frames,
                }
            }
            cmd::SET_PERFORMANCE_LEVEL => Self::SetPerformanceLevel(*(data as *const u32)),
            cmd::GET_SYSTEM_DIRECTORY => Self::GetSystemDirectory,
            cmd::SET_PIXEL_FORMAT => Self::SetPixelFormat(*(data as *const u32)),
            cmd::SET_INPUT_DESCRIPTORS => {
                let mut entry = data as *const RetroInputDescriptor;
                let mut descriptors = Vec::new();
                while let Some(description) = opt_cstr((*entry).description) {
                    let raw = &*entry;
                    descriptors.push(InputDescriptor {
                        port: raw.port,
                        device: raw.device,
                        index: raw.index,
                        id: raw.id,
                        description,
                    });
                    entry = entry.add(1);
                }
                Self::SetInputDescriptors(descriptors)
            }
            cmd::SET_KEYBOARD_CALLBACK => {
                Self::SetKeyboardCallback((*(data as *const RetroKeyboardCallback)).callback)
            }
            cmd::SET_DISK_CONTROL_INTERFACE => {
                Self::SetDiskControlInterface(*(data as *const RetroDiskControlCallback))
            }
            cmd::SET_HW_RENDER => Self::SetHwRender(&mut *(data as *mut RetroHwRenderCallback)),
            cmd::GET_VARIABLE => Self::GetVariable {
                key: opt_cstr((*(data as *const RetroVariable)).key),
            },
            cmd::SET_VARIABLES => {
                let mut entry = data as *const RetroVariable;
                let mut declarations = Vec::new();
                while let Some(key) = opt_cstr((*entry).key) {
                    declarations.push(VariableDeclaration {
                        key,
                        value: opt_cstr((*entry).value),
                    });
                    entry = entry.add(1);
                }
                Self::SetVariables(declarations)
            }
            other => Self::Unsupported(other),
        };

        Some(request)
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetRotation(_) => "SET_ROTATION",
            Self::GetOverscan => "GET_OVERSCAN",
            Self::GetCanDupe => "GET_CAN_DUPE",
            Self::SetMessage { .. } => "SET_MESSAGE",
            Self::Shutdown => "SHUTDOWN",
            Self::SetPerformanceLevel(_) => "SET_PERFORMANCE_LEVEL",
            Self::GetSystemDirectory => "GET_SYSTEM_DIRECTORY",
            Self::SetPixelFormat(_) => "SET_PIXEL_FORMAT",
            Self::SetInputDescriptors(_) => "SET_INPUT_DESCRIPTORS",
            Self::SetKeyboardCallback(_) => "SET_KEYBOARD_CALLBACK",
            Self::SetDiskControlInterface(_) => "SET_DISK_CONTROL_INTERFACE",
            Self::SetHwRender(_) => "SET_HW_RENDER",
            Self::GetVariable { .. } => "GET_VARIABLE",
            Self::SetVariables(_) => "SET_VARIABLES",
            Self::Unsupported(_) => "UNSUPPORTED",
        }
    }
}

/// The negotiator's answer to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentReply<'s> {
    Rejected,
    Accepted,
    /// Accepted, with a boolean written to the out-parameter
    Flag(bool),
    /// Accepted, with a string (or null) written to the out-parameter
    Text(Option<&'s CStr>),
}

impl EnvironmentReply<'_> {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Write `reply` into the core's out-parameter and return the value for
/// the callback's return.
///
/// # Safety
/// `data` must be the payload pointer the request for `raw_cmd` was decoded
/// from. A [`EnvironmentReply::Text`] pointer must stay valid for as long as
/// the core may read it.
pub unsafe fn write_reply(raw_cmd: u32, data: *mut c_void, reply: &EnvironmentReply<'_>) -> bool {
    if data.is_null() {
        return reply.is_accepted();
    }

    match *reply {
        EnvironmentReply::Rejected => return false,
        EnvironmentReply::Accepted => {}
        EnvironmentReply::Flag(value) => *(data as *mut bool) = value,
        EnvironmentReply::Text(text) => {
            let text = text.map_or(ptr::null(), CStr::as_ptr);
            match base_command(raw_cmd) {
                cmd::GET_VARIABLE => (*(data as *mut RetroVariable)).value = text,
                _ => *(data as *mut *const c_char) = text,
            }
        }
    }
    true
}
