use std::fmt;

use crate::types::{AssignmentParseError, PresetFileError};

/// Run failure carrying the process exit code
#[derive(Debug)]
pub enum PresetsError {
    /// At least one desired value had no matching option (exit code 2)
    OptionsNotFound { count: usize },
    /// Assignment or preset file could not be parsed (exit code 3)
    InvalidPreset(String),
    /// WebDriver connection failed (exit code 4)
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl PresetsError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PresetsError::OptionsNotFound { .. } => 2,
            PresetsError::InvalidPreset(_) => 3,
            PresetsError::WebDriverFailed(_) => 4,
            PresetsError::Timeout(_) => 5,
            PresetsError::Other(_) => 1,
        }
    }
}

impl fmt::Display for PresetsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetsError::OptionsNotFound { count } => {
                write!(f, "{} select control(s) had no option with the desired value", count)
            }
            PresetsError::InvalidPreset(msg) => write!(f, "{}", msg),
            PresetsError::WebDriverFailed(msg) => {
                write!(f, "WebDriver connection failed: {}", msg)
            }
            PresetsError::Timeout(msg) => write!(f, "Operation timed out: {}", msg),
            PresetsError::Other(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for PresetsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresetsError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for PresetsError {
    fn from(err: anyhow::Error) -> Self {
        // Typed errors first, then fall back to message sniffing for driver failures
        if let Some(PresetsError::OptionsNotFound { count }) = err.downcast_ref::<PresetsError>() {
            return PresetsError::OptionsNotFound { count: *count };
        }
        if err.downcast_ref::<AssignmentParseError>().is_some()
            || err.downcast_ref::<PresetFileError>().is_some()
        {
            return PresetsError::InvalidPreset(format!("{:#}", err));
        }

        let msg = format!("{:#}", err);
        if msg.contains("Failed to connect to WebDriver")
            || msg.contains("WebDriver")
            || msg.contains("geckodriver")
            || msg.contains("chromedriver")
        {
            PresetsError::WebDriverFailed(msg)
        } else if msg.contains("timeout") || msg.contains("timed out") {
            PresetsError::Timeout(msg)
        } else {
            PresetsError::Other(err)
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
