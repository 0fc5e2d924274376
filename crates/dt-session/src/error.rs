use crate::api::ClientError;
use crate::token_store::StorageError;

use dt_config::ConfigError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";
pub(crate) const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";
pub(crate) const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
pub(crate) const PERMISSION_UPDATE_FAILED_MESSAGE: &str = "Failed to update permissions";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Missing credential field '{field}' {location}")]
    MissingCredentials {
        field: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid credentials {location}")]
    InvalidCredentials {
        #[source]
        source: Option<ClientError>,
        location: ErrorLocation,
    },

    #[error("Registration failed {location}")]
    RegistrationFailed { location: ErrorLocation },

    #[error("Unknown identity '{id}' {location}")]
    UnknownIdentity { id: String, location: ErrorLocation },

    #[error("Session restore failed: {message} {location}")]
    SessionRestoreFailed {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unauthorized: session rejected by backend {location}")]
    Unauthorized { location: ErrorLocation },

    #[error("Backend request failed: {source} {location}")]
    Api {
        #[source]
        source: ClientError,
        location: ErrorLocation,
    },

    #[error("Session storage failed: {source} {location}")]
    Storage {
        #[source]
        source: StorageError,
        location: ErrorLocation,
    },

    #[error("Session configuration invalid: {source} {location}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Message safe to show in the UI; never carries internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials { .. } | Self::InvalidCredentials { .. } => {
                INVALID_CREDENTIALS_MESSAGE
            }
            Self::RegistrationFailed { .. } => REGISTRATION_FAILED_MESSAGE,
            Self::UnknownIdentity { .. } => "Unknown user",
            Self::SessionRestoreFailed { .. } | Self::Unauthorized { .. } => {
                SESSION_EXPIRED_MESSAGE
            }
            Self::Api { .. } => "The server could not complete the request",
            Self::Storage { .. } => "Unable to access saved session",
            Self::Config { .. } => "Invalid configuration",
        }
    }

    /// Stable code for CLI output and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredentials { .. } => "MISSING_CREDENTIALS",
            Self::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            Self::RegistrationFailed { .. } => "REGISTRATION_FAILED",
            Self::UnknownIdentity { .. } => "UNKNOWN_IDENTITY",
            Self::SessionRestoreFailed { .. } => "SESSION_RESTORE_FAILED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Api { .. } => "API_ERROR",
            Self::Storage { .. } => "STORAGE_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }

    #[track_caller]
    pub fn missing_credentials(field: &'static str) -> Self {
        Self::MissingCredentials {
            field,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_credentials(source: Option<ClientError>) -> Self {
        Self::InvalidCredentials {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn registration_failed() -> Self {
        Self::RegistrationFailed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_identity(id: &str) -> Self {
        Self::UnknownIdentity {
            id: id.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn restore_failed(message: impl Into<String>) -> Self {
        Self::SessionRestoreFailed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ClientError> for SessionError {
    #[track_caller]
    fn from(source: ClientError) -> Self {
        if source.is_unauthorized() {
            return Self::unauthorized();
        }
        Self::Api {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<StorageError> for SessionError {
    #[track_caller]
    fn from(source: StorageError) -> Self {
        Self::Storage {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for SessionError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
