//! Application error type

use crate::config::ConfigError;
use charger_core::CoreError;
use charger_hal::HalError;
use core::fmt;

/// Errors surfaced by the charger application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    /// Configuration rejected before any hardware was touched
    Config(ConfigError),
    /// Table or registry defect found at startup
    Core(CoreError),
    /// Collaborator failure
    Hal(HalError),
}

/// Result type for the charger application
pub type AppResult<T> = Result<T, AppError>;

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}

impl From<HalError> for AppError {
    fn from(err: HalError) -> Self {
        AppError::Hal(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration: {}", err),
            AppError::Core(err) => write!(f, "framework: {}", err),
            AppError::Hal(err) => write!(f, "hardware: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AppError {}

#[cfg(feature = "defmt")]
impl defmt::Format for AppError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AppError::Config(err) => defmt::write!(fmt, "Config({})", err),
            AppError::Core(err) => defmt::write!(fmt, "Core({})", err),
            AppError::Hal(err) => defmt::write!(fmt, "Hal({})", err),
        }
    }
}
