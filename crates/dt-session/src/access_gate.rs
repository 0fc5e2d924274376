use crate::session_state::SessionState;

use dt_config::RoutesConfig;
use dt_core::Role;

use serde::Serialize;

/// What the routing layer should do with a navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateOutcome {
    /// Session still resolving; show a loading indicator
    RenderPlaceholder,
    RenderRequestedView,
    Redirect {
        to: String,
        /// Path the user was headed for, so sign-in can send them back
        return_to: Option<String>,
    },
}

/// Declarative guard evaluated before any protected view mounts.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    routes: RoutesConfig,
}

impl AccessGate {
    pub fn new(routes: RoutesConfig) -> Self {
        Self { routes }
    }

    pub fn sign_in_path(&self) -> &str {
        &self.routes.sign_in
    }

    /// Landing view for a role
    pub fn role_home(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.routes.admin_home,
            Role::Secretary => &self.routes.secretary_home,
            Role::User | Role::Patient => &self.routes.user_home,
        }
    }

    /// Decide the outcome of navigating to `current_path`.
    ///
    /// Pure: the result depends only on the arguments and the configured
    /// routes. An empty `required_roles` admits any signed-in identity.
    pub fn evaluate(
        &self,
        state: &SessionState,
        required_roles: &[Role],
        current_path: &str,
    ) -> GateOutcome {
        if state.loading {
            return GateOutcome::RenderPlaceholder;
        }

        let identity = match state.identity {
            Some(ref identity) if state.authenticated => identity,
            _ => {
                if current_path == self.routes.sign_in {
                    return GateOutcome::RenderRequestedView;
                }
                return GateOutcome::Redirect {
                    to: self.routes.sign_in.clone(),
                    return_to: Some(current_path.to_string()),
                };
            }
        };

        if !required_roles.is_empty() && !required_roles.contains(&identity.role) {
            return GateOutcome::Redirect {
                to: self.role_home(identity.role).to_string(),
                return_to: None,
            };
        }

        GateOutcome::RenderRequestedView
    }
}
