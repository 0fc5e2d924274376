use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_API_BASE_URL, DEFAULT_LOGIN_PATH,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USERS_PATH, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};

use serde::Deserialize;

/// Configuration for the practice backend REST API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin (e.g., "http://localhost:5173")
    pub base_url: String,
    /// Credential exchange endpoint
    pub login_path: String,
    /// Identity directory endpoint
    pub users_path: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_API_BASE_URL),
            login_path: String::from(DEFAULT_LOGIN_PATH),
            users_path: String::from(DEFAULT_USERS_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::api(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        for (name, path) in [
            ("api.login_path", &self.login_path),
            ("api.users_path", &self.users_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::api(format!(
                    "{name} must start with '/', got '{path}'"
                )));
            }
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::api(format!(
                "api.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        Ok(())
    }
}
