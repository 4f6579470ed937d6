//! Core session: one bound core with its negotiator installed

use crate::dataplane;
use or_core::{Config, SessionError};
use or_environ::{
    environment_callback, install_negotiator, is_negotiator_installed, take_negotiator,
    with_negotiator, Negotiator, VideoDriver,
};
use or_loader::{load_core, CoreHandle, CoreOpener, DynamicLibrary, NativeOpener, SymbolSource};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A loaded core wired up to the frontend.
///
/// While the session lives, the core's environment calls reach the
/// [`Negotiator`] built from the session's config. Dropping the session
/// removes the negotiator, so late calls are rejected, and then unloads the
/// library.
pub struct CoreSession<L: SymbolSource = DynamicLibrary> {
    core: CoreHandle<L>,
    content: PathBuf,
}

impl CoreSession<DynamicLibrary> {
    /// Load the core configured in `config` for `content`.
    ///
    /// # Safety
    /// The configured core (or every library in the configured directory)
    /// must be a trusted libretro core.
    pub unsafe fn bind(config: &Config, content: &Path) -> Result<Self, SessionError> {
        Self::bind_with(&NativeOpener, config, content)
    }
}

impl<L: SymbolSource> CoreSession<L> {
    /// Like [`CoreSession::bind`], opening libraries through `opener`.
    ///
    /// # Safety
    /// See [`CoreSession::bind`].
    pub unsafe fn bind_with<O>(opener: &O, config: &Config, content: &Path) -> Result<Self, SessionError>
    where
        O: CoreOpener<Library = L>,
    {
        if is_negotiator_installed() {
            return Err(SessionError::AlreadyLoaded);
        }

        let core = load_core(opener, &config.core.path, content)?;

        let negotiator = Negotiator::new(config.environment_settings());
        if install_negotiator(negotiator).is_err() {
            return Err(SessionError::AlreadyLoaded);
        }

        core.set_environment(environment_callback);
        dataplane::register(&core);
        debug!("Environment and data-plane callbacks registered");

        let info = core.system_info();
        info!("Core session started: {} {}", info.library_name, info.library_version);

        Ok(Self {
            core,
            content: content.to_path_buf(),
        })
    }

    /// The bound core
    pub fn core(&self) -> &CoreHandle<L> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut CoreHandle<L> {
        &mut self.core
    }

    /// Content path the session was bound for
    pub fn content(&self) -> &Path {
        &self.content
    }

    /// Run `f` against this session's negotiator.
    ///
    /// Must not be called from inside a core callback.
    pub fn with_environment<R>(&self, f: impl FnOnce(&mut Negotiator) -> R) -> Option<R> {
        with_negotiator(f)
    }

    /// Hand the running video driver to the negotiator
    pub fn attach_video_driver(&self, driver: Box<dyn VideoDriver>) {
        with_negotiator(|env| env.video_mut().attach(driver));
    }

    /// Whether the core asked the frontend to exit
    pub fn shutdown_requested(&self) -> bool {
        with_negotiator(|env| env.state().shutdown).unwrap_or(false)
    }
}

impl<L: SymbolSource> Drop for CoreSession<L> {
    fn drop(&mut self) {
        take_negotiator();
        info!("Core session ended, unloading {:?}", self.core.path());
    }
}

impl<L: SymbolSource> std::fmt::Debug for CoreSession<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreSession")
            .field("core", &self.core)
            .field("content", &self.content)
            .finish()
    }
}
