use crate::{
    ApiConfig, AuthBackend, AuthConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError,
    ConfigErrorResult, DEFAULT_CONFIG_DIR, LoggingConfig, RoutesConfig, StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub routes: RoutesConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for DT_CONFIG_DIR env var, else use ./.dentech/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply DT_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: DT_CONFIG_DIR env var > ./.dentech/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.api.validate()?;
        self.storage.validate()?;
        self.routes.validate()?;

        if let Some(ref file) = self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::config(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute path of the session token directory.
    pub fn storage_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.storage.dir))
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref file) => Ok(Some(Self::config_dir()?.join(file))),
            None => Ok(None),
        }
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  api: {} (login {}, users {}, timeout {}s)",
            self.api.base_url, self.api.login_path, self.api.users_path, self.api.timeout_secs
        );
        info!(
            "  auth: backend={}, verify_on_restore={}, serialize_operations={}",
            match self.auth.backend {
                AuthBackend::Mock => "mock",
                AuthBackend::Http => "http",
            },
            self.auth.verify_on_restore,
            self.auth.serialize_operations
        );
        info!("  storage: {}", self.storage.dir);
        info!(
            "  routes: sign_in={}, admin={}, secretary={}, user={}",
            self.routes.sign_in,
            self.routes.admin_home,
            self.routes.secretary_home,
            self.routes.user_home
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Api
        Self::apply_env_string("DT_API_BASE_URL", &mut self.api.base_url);
        Self::apply_env_string("DT_API_LOGIN_PATH", &mut self.api.login_path);
        Self::apply_env_string("DT_API_USERS_PATH", &mut self.api.users_path);
        Self::apply_env_parse("DT_API_TIMEOUT_SECS", &mut self.api.timeout_secs);

        // Auth
        Self::apply_env_parse("DT_AUTH_BACKEND", &mut self.auth.backend);
        Self::apply_env_bool(
            "DT_AUTH_VERIFY_ON_RESTORE",
            &mut self.auth.verify_on_restore,
        );
        Self::apply_env_bool(
            "DT_AUTH_SERIALIZE_OPERATIONS",
            &mut self.auth.serialize_operations,
        );

        // Storage
        Self::apply_env_string("DT_STORAGE_DIR", &mut self.storage.dir);

        // Routes
        Self::apply_env_string("DT_ROUTE_SIGN_IN", &mut self.routes.sign_in);
        Self::apply_env_string("DT_ROUTE_ADMIN_HOME", &mut self.routes.admin_home);
        Self::apply_env_string("DT_ROUTE_SECRETARY_HOME", &mut self.routes.secretary_home);
        Self::apply_env_string("DT_ROUTE_USER_HOME", &mut self.routes.user_home);

        // Logging
        Self::apply_env_parse("DT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("DT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("DT_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
