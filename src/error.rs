//! Error type for the simulation crate
//!
//! The core has no recoverable I/O; these cover misuse at the edges
//! (bad viewport, bad config) and config file loading.

use std::fmt;

#[derive(Debug)]
pub enum SimError {
    /// Viewport size was zero, negative or not finite
    InvalidViewport { width: f32, height: f32 },
    /// A config value failed validation
    InvalidConfig(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidViewport { width, height } => {
                write!(f, "invalid viewport size {}x{}", width, height)
            }
            SimError::InvalidConfig(reason) => write!(f, "invalid config: {}", reason),
            SimError::Io(e) => write!(f, "config i/o failed: {}", e),
            SimError::Json(e) => write!(f, "config json malformed: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io(e) => Some(e),
            SimError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::Io(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}
