use crate::{DEFAULT_SERIALIZE_OPERATIONS, DEFAULT_VERIFY_ON_RESTORE};

use std::str::FromStr;

use serde::Deserialize;

/// Which credential backend the session store talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthBackend {
    /// In-process stub with fixed demo accounts
    #[default]
    Mock,
    /// Practice backend over HTTP
    Http,
}

impl FromStr for AuthBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "http" => Ok(Self::Http),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub backend: AuthBackend,
    /// Confirm a persisted session against the backend directory on startup
    pub verify_on_restore: bool,
    /// Run session mutations one at a time instead of last-write-wins
    pub serialize_operations: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            backend: AuthBackend::default(),
            verify_on_restore: DEFAULT_VERIFY_ON_RESTORE,
            serialize_operations: DEFAULT_SERIALIZE_OPERATIONS,
        }
    }
}
