mod api_config;
mod auth_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod routes_config;
mod storage_config;

pub use api_config::ApiConfig;
pub use auth_config::{AuthBackend, AuthConfig};
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use routes_config::RoutesConfig;
pub use storage_config::StorageConfig;

#[cfg(test)]
mod tests;

pub const CONFIG_DIR_ENV: &str = "DT_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".dentech";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5173";
const DEFAULT_LOGIN_PATH: &str = "/api/accounts/login/";
const DEFAULT_USERS_PATH: &str = "/api/accounts/users/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

const DEFAULT_VERIFY_ON_RESTORE: bool = true;
const DEFAULT_SERIALIZE_OPERATIONS: bool = false;

const DEFAULT_STORAGE_DIR: &str = "session";

const DEFAULT_SIGN_IN_ROUTE: &str = "/login";
const DEFAULT_ADMIN_HOME_ROUTE: &str = "/admin";
const DEFAULT_SECRETARY_HOME_ROUTE: &str = "/secretary";
const DEFAULT_USER_HOME_ROUTE: &str = "/dashboard";

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
