use std::path::PathBuf;

use thiserror::Error;

/// Failure to resolve, decode or play an asset. Never fatal: every caller
/// has a placeholder or a silent fallback.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("could not decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// The gameplay subsystem could not be constructed. The shell refuses to
/// enter gameplay and shows the message instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game engine unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum InputDeviceError {
    #[error("no gamepad backend in this build")]
    NoBackend,
    #[error("gamepad enumeration failed: {0}")]
    Enumeration(String),
}

/// Rejected account data, e.g. a duplicate alias. The message is shown as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Error)]
#[error("could not send mail: {0}")]
pub struct MailError(pub String);
