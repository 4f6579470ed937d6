//! Capability negotiator
//!
//! Answers environment requests from a core. Each command either configures
//! [`SystemEnvironmentState`] or queries the frontend settings captured at
//! bind time. Requests the frontend can't honour are rejected and logged;
//! a rejection is never an error for the frontend.

use crate::callback::{hw_current_framebuffer, hw_proc_address};
use crate::message::MessageQueue;
use crate::request::{write_reply, EnvironmentReply, EnvironmentRequest, InputDescriptor};
use crate::state::{
    DeclaredVariable, PixelFormat, Rotation, SystemEnvironmentState, FIRST_CUSTOM_BIND, MAX_PLAYERS,
};
use crate::variables::VariableStore;
use crate::video::{HwContextFamily, HwContextType, VideoDriverSlot, HW_RENDER_DRIVER};
use or_core::EnvironmentSettings;
use or_ffi::{device, RetroHwRenderCallback};
use std::ffi::{c_void, CStr, CString};
use tracing::{debug, info, trace, warn};

/// Priority of messages a core posts through SET_MESSAGE
pub const MESSAGE_PRIORITY: u32 = 1;

/// Frontend side of the environment callback for one core session.
#[derive(Debug)]
pub struct Negotiator {
    settings: EnvironmentSettings,
    system_directory: Option<CString>,
    variables: VariableStore,
    state: SystemEnvironmentState,
    video: VideoDriverSlot,
    messages: Option<MessageQueue>,
    hw_family: Option<HwContextFamily>,
}

impl Negotiator {
    /// Build a negotiator from the settings snapshot taken at bind time.
    ///
    /// Core variables are parsed here, once.
    pub fn new(settings: EnvironmentSettings) -> Self {
        let system_directory = settings.system_directory.as_ref().and_then(|dir| {
            let dir = dir.to_string_lossy().into_owned();
            match CString::new(dir) {
                Ok(dir) => Some(dir),
                Err(_) => {
                    warn!("System directory contains a NUL byte, cores will see it unset");
                    None
                }
            }
        });

        let variables = VariableStore::parse(&settings.variables);
        debug!("Negotiator created with {} core variables", variables.len());

        Self {
            video: VideoDriverSlot::new(settings.video_driver.clone()),
            settings,
            system_directory,
            variables,
            state: SystemEnvironmentState::default(),
            messages: Some(MessageQueue::new()),
            hw_family: HwContextFamily::compiled(),
        }
    }

    /// Override the hardware rendering family the video driver supports
    pub fn with_hw_family(mut self, family: Option<HwContextFamily>) -> Self {
        self.hw_family = family;
        self
    }

    /// Drop SET_MESSAGE text instead of queueing it
    pub fn without_message_queue(mut self) -> Self {
        self.messages = None;
        self
    }

    pub fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    pub fn state(&self) -> &SystemEnvironmentState {
        &self.state
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn video(&self) -> &VideoDriverSlot {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut VideoDriverSlot {
        &mut self.video
    }

    pub fn messages(&self) -> Option<&MessageQueue> {
        self.messages.as_ref()
    }

    pub fn messages_mut(&mut self) -> Option<&mut MessageQueue> {
        self.messages.as_mut()
    }

    pub fn hw_family(&self) -> Option<HwContextFamily> {
        self.hw_family
    }

    /// Decode and answer a raw environment call, writing any out-parameter.
    ///
    /// # Safety
    /// `data` must be the payload libretro defines for `cmd`, valid for the
    /// duration of the call.
    pub unsafe fn dispatch_raw(&mut self, cmd: u32, data: *mut c_void) -> bool {
        let Some(request) = EnvironmentRequest::from_raw(cmd, data) else {
            warn!("Environment command {} without payload, rejecting", cmd);
            return false;
        };
        let reply = self.handle(request);
        write_reply(cmd, data, &reply)
    }

    /// Answer one request.
    ///
    /// A [`EnvironmentReply::Text`] points into the negotiator, so the reply
    /// borrows `self`; copy out what you need (or call
    /// [`EnvironmentReply::is_accepted`]) before touching the negotiator again.
    pub fn handle(&mut self, request: EnvironmentRequest<'_>) -> EnvironmentReply<'_> {
        trace!("Environment request {}", request.name());

        match request {
            EnvironmentRequest::GetOverscan => EnvironmentReply::Flag(!self.settings.crop_overscan),
            EnvironmentRequest::GetCanDupe => EnvironmentReply::Flag(true),
            EnvironmentRequest::GetVariable { key } => self.get_variable(key),
            EnvironmentRequest::SetVariables(declarations) => {
                self.state.declared_variables = declarations
                    .iter()
                    .map(|decl| {
                        let variable = DeclaredVariable {
                            key: decl.key.to_string_lossy().into_owned(),
                            description: decl.value.map(|v| v.to_string_lossy().into_owned()),
                        };
                        debug!(
                            "Core variable {}: {}",
                            variable.key,
                            variable.description.as_deref().unwrap_or("")
                        );
                        variable
                    })
                    .collect();
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::SetMessage { text, frames } => {
                let text = text.to_string_lossy();
                info!("Core message: {}", text);
                if let Some(queue) = self.messages.as_mut() {
                    queue.push(text.into_owned(), MESSAGE_PRIORITY, frames);
                }
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::SetRotation(raw) => self.set_rotation(raw),
            EnvironmentRequest::Shutdown => {
                info!("Core requested shutdown");
                self.state.shutdown = true;
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::SetPerformanceLevel(level) => {
                debug!("Core performance level: {}", level);
                self.state.performance_level = level;
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::GetSystemDirectory => {
                debug!("System directory: {:?}", self.system_directory);
                EnvironmentReply::Text(self.system_directory.as_deref())
            }
            EnvironmentRequest::SetPixelFormat(raw) => match PixelFormat::from_raw(raw) {
                Some(format) => {
                    info!("Core pixel format: {}", format.name());
                    self.state.pixel_format = format;
                    EnvironmentReply::Accepted
                }
                None => {
                    warn!("Unknown pixel format {}, rejecting", raw);
                    EnvironmentReply::Rejected
                }
            },
            EnvironmentRequest::SetInputDescriptors(descriptors) => {
                self.set_input_descriptors(&descriptors);
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::SetKeyboardCallback(callback) => {
                debug!("Core keyboard callback registered");
                self.state.keyboard_event = callback;
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::SetDiskControlInterface(interface) => {
                debug!("Core disk control interface registered");
                self.state.disk_control = Some(interface);
                EnvironmentReply::Accepted
            }
            EnvironmentRequest::SetHwRender(render) => self.set_hw_render(render),
            EnvironmentRequest::Unsupported(cmd) => {
                debug!("Unsupported environment command {}", cmd);
                EnvironmentReply::Rejected
            }
        }
    }

    fn get_variable(&self, key: Option<&CStr>) -> EnvironmentReply<'_> {
        let Some(key) = key else {
            return EnvironmentReply::Text(Some(self.variables.raw()));
        };

        let value = key.to_str().ok().and_then(|key| self.variables.get(key));
        trace!("Variable {:?} = {:?}", key, value);
        EnvironmentReply::Text(value)
    }

    fn set_rotation(&mut self, raw: u32) -> EnvironmentReply<'static> {
        if !self.settings.allow_rotate {
            debug!("Rotation disabled, ignoring request for {}", raw);
            return EnvironmentReply::Accepted;
        }

        let Some(rotation) = Rotation::from_raw(raw) else {
            warn!("Invalid rotation {}, rejecting", raw);
            return EnvironmentReply::Rejected;
        };

        if !self.video.can_rotate() {
            warn!(
                "Video driver \"{}\" can't rotate, rejecting rotation {}",
                self.video.selected(),
                rotation.degrees()
            );
            return EnvironmentReply::Rejected;
        }

        info!("Rotating screen by {} degrees", rotation.degrees());
        self.state.rotation = rotation;
        // A driver that isn't running yet picks the rotation up when it starts.
        if let Some(driver) = self.video.active_mut() {
            driver.set_rotation(rotation);
        }
        EnvironmentReply::Accepted
    }

    fn set_input_descriptors(&mut self, descriptors: &[InputDescriptor<'_>]) {
        let table = &mut self.state.input_descriptors;
        table.clear();

        for desc in descriptors {
            let (port, id) = (desc.port as usize, desc.id as usize);
            if port >= MAX_PLAYERS || desc.device != device::JOYPAD || id >= FIRST_CUSTOM_BIND {
                trace!(
                    "Skipping input descriptor port {} device {} id {}",
                    desc.port,
                    desc.device,
                    desc.id
                );
                continue;
            }
            table.set(port, id, desc.description.to_string_lossy());
        }

        for (port, id, description) in table.iter() {
            debug!("Player {} {}: {}", port + 1, crate::state::BUTTON_NAMES[id], description);
        }
    }

    fn set_hw_render(&mut self, render: &mut RetroHwRenderCallback) -> EnvironmentReply<'static> {
        let Some(context) = HwContextType::from_raw(render.context_type) else {
            warn!("Unknown hardware context type {}, rejecting", render.context_type);
            return EnvironmentReply::Rejected;
        };

        match context.family() {
            None => debug!("Core requested no hardware context"),
            Some(family) if Some(family) == self.hw_family => {
                info!("Core requested {:?} hardware rendering", family);
                self.video.select(HW_RENDER_DRIVER);
            }
            Some(family) => {
                warn!(
                    "Core requested {:?} hardware rendering, frontend was built for {:?}",
                    family, self.hw_family
                );
                return EnvironmentReply::Rejected;
            }
        }

        render.get_current_framebuffer = Some(hw_current_framebuffer);
        render.get_proc_address = Some(hw_proc_address);
        self.state.hw_render = Some(*render);
        EnvironmentReply::Accepted
    }
}
