use dt_config::ConfigError;
use dt_core::CoreError;
use dt_session::SessionError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{source}")]
    Session {
        #[source]
        source: SessionError,
        location: ErrorLocation,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("Invalid argument: {source}")]
    Argument {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },

    #[error("Not signed in {location}")]
    NotSignedIn { location: ErrorLocation },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to serialize output: {source}")]
    Output {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn not_signed_in() -> Self {
        Self::NotSignedIn {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn logger(message: impl Into<String>) -> Self {
        Self::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable code printed alongside the error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Session { source, .. } => source.error_code(),
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Argument { .. } => "INVALID_ARGUMENT",
            Self::NotSignedIn { .. } => "NOT_SIGNED_IN",
            Self::Logger { .. } => "LOGGER_ERROR",
            Self::Output { .. } => "OUTPUT_ERROR",
        }
    }
}

impl From<SessionError> for CliError {
    #[track_caller]
    fn from(source: SessionError) -> Self {
        Self::Session {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for CliError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::Argument {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Output {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
