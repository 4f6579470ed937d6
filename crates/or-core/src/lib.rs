//! Core frontend plumbing for oxidized-retro
//!
//! This crate provides the configuration, error types and logging
//! infrastructure shared by the loader, the environment negotiator
//! and the binary.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, EnvironmentSettings, LogLevel};
pub use error::{fatal, ConfigError, FrontendError, LoaderError, Result, SessionError};
