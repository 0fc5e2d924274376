use dt_core::Identity;

use serde::Serialize;

/// Coarse lifecycle position of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Startup, before the persisted session has been restored
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// The mutable record of current authentication status.
///
/// `authenticated` implies `identity.is_some()`; the constructors below are
/// the only shapes the store publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub authenticated: bool,
    /// In-flight restore or sign-in; other fields are stale while set
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initializing()
    }
}

impl SessionState {
    pub fn initializing() -> Self {
        Self {
            identity: None,
            authenticated: false,
            loading: true,
            error: None,
        }
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            authenticated: true,
            loading: false,
            error: None,
        }
    }

    pub fn signed_out(error: Option<String>) -> Self {
        Self {
            identity: None,
            authenticated: false,
            loading: false,
            error,
        }
    }

    /// Authenticated with an identity present
    pub fn is_signed_in(&self) -> bool {
        self.authenticated && self.identity.is_some()
    }
}
