//! Error types for the oxidized-retro frontend

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the frontend
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while locating, opening or binding a core.
///
/// Every variant is fatal: a frontend without a usable core has nothing to run.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No core path configured, cannot load a core dynamically")]
    EmptyCorePath,

    #[error("Core ABI symbol \"{0}\" is already linked into the process")]
    StaticallyLinked(&'static str),

    #[error("Content path {0:?} has no extension, cannot infer which core to use")]
    NoContentExtension(PathBuf),

    #[error("Couldn't open core directory {path:?}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No core in {directory:?} supports extension \"{extension}\"")]
    NoMatchingCore { directory: PathBuf, extension: String },

    #[error("Failed to open dynamic library {path:?}: {reason}")]
    LibraryOpen { path: PathBuf, reason: String },

    #[error("Failed to load symbol \"{symbol}\" from {path:?}")]
    MissingSymbol { path: PathBuf, symbol: &'static str },
}

/// Core session lifecycle errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("A core is already loaded in this process")]
    AlreadyLoaded,

    #[error(transparent)]
    Loader(#[from] LoaderError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias for frontend operations
pub type Result<T> = std::result::Result<T, FrontendError>;

/// Log a fatal diagnostic and terminate the process.
///
/// Used for the unrecoverable tier: no core could be located, opened or bound.
pub fn fatal(context: &str, err: &dyn std::error::Error) -> ! {
    tracing::error!("{}: {}", context, err);
    let mut source = err.source();
    while let Some(cause) = source {
        tracing::error!("  caused by: {}", cause);
        source = cause.source();
    }
    std::process::exit(1)
}
