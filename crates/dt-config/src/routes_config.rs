use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_ADMIN_HOME_ROUTE, DEFAULT_SECRETARY_HOME_ROUTE,
    DEFAULT_SIGN_IN_ROUTE, DEFAULT_USER_HOME_ROUTE,
};

use serde::Deserialize;

/// Navigation targets used by the access gate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub sign_in: String,
    pub admin_home: String,
    pub secretary_home: String,
    /// Landing view for every role without a dedicated home
    pub user_home: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            sign_in: String::from(DEFAULT_SIGN_IN_ROUTE),
            admin_home: String::from(DEFAULT_ADMIN_HOME_ROUTE),
            secretary_home: String::from(DEFAULT_SECRETARY_HOME_ROUTE),
            user_home: String::from(DEFAULT_USER_HOME_ROUTE),
        }
    }
}

impl RoutesConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, route) in [
            ("routes.sign_in", &self.sign_in),
            ("routes.admin_home", &self.admin_home),
            ("routes.secretary_home", &self.secretary_home),
            ("routes.user_home", &self.user_home),
        ] {
            if !route.starts_with('/') {
                return Err(ConfigError::routes(format!(
                    "{name} must start with '/', got '{route}'"
                )));
            }
        }

        if [&self.admin_home, &self.secretary_home, &self.user_home].contains(&&self.sign_in) {
            return Err(ConfigError::routes(
                "routes.sign_in cannot double as a role home",
            ));
        }

        Ok(())
    }
}
