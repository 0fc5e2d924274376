use crate::access_gate::{AccessGate, GateOutcome};
use crate::session_state::SessionState;

use dt_config::RoutesConfig;
use dt_core::Role;

const REGISTER_ROUTE: &str = "/register";
const APPOINTMENTS_ROUTE: &str = "/appointments";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// Signed-in identities whose role is listed; empty admits any role
    Protected(Vec<Role>),
}

/// One entry of the route table.
///
/// A pattern ending in `/*` matches the prefix itself and everything
/// below it; any other pattern matches exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: String,
    pub access: RouteAccess,
}

impl RouteRule {
    pub fn matches(&self, path: &str) -> bool {
        match self.pattern.strip_suffix("/*") {
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => path == self.pattern,
        }
    }
}

/// Ordered route rules; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(mut self, pattern: &str) -> Self {
        self.rules.push(RouteRule {
            pattern: pattern.to_string(),
            access: RouteAccess::Public,
        });
        self
    }

    pub fn protected(mut self, pattern: &str, roles: &[Role]) -> Self {
        self.rules.push(RouteRule {
            pattern: pattern.to_string(),
            access: RouteAccess::Protected(roles.to_vec()),
        });
        self
    }

    /// The practice console's routes.
    pub fn practice(routes: &RoutesConfig) -> Self {
        Self::new()
            .public("/")
            .public(&routes.sign_in)
            .public(REGISTER_ROUTE)
            .protected(&format!("{}/*", routes.admin_home), &[Role::Admin])
            .protected(&format!("{}/*", routes.secretary_home), &[Role::Secretary])
            .protected(
                APPOINTMENTS_ROUTE,
                &[Role::User, Role::Secretary, Role::Admin],
            )
            // Patients land here too; leaving them out would bounce them
            // back to their own home forever.
            .protected(&routes.user_home, &[Role::User, Role::Patient])
    }

    /// Rule for `path`, ignoring any query string or fragment
    pub fn resolve(&self, path: &str) -> Option<&RouteRule> {
        let path = strip_query(path);
        self.rules.iter().find(|rule| rule.matches(path))
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Route table plus access gate: the full decision for a navigation.
#[derive(Debug, Clone)]
pub struct Navigator {
    gate: AccessGate,
    table: RouteTable,
}

impl Navigator {
    pub fn new(gate: AccessGate, table: RouteTable) -> Self {
        Self { gate, table }
    }

    pub fn from_routes(routes: &RoutesConfig) -> Self {
        Self::new(AccessGate::new(routes.clone()), RouteTable::practice(routes))
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Unknown paths redirect to sign-in without a return path.
    pub fn navigate(&self, state: &SessionState, path: &str) -> GateOutcome {
        match self.table.resolve(path) {
            None => GateOutcome::Redirect {
                to: self.gate.sign_in_path().to_string(),
                return_to: None,
            },
            Some(rule) => match rule.access {
                RouteAccess::Public => GateOutcome::RenderRequestedView,
                RouteAccess::Protected(ref roles) => self.gate.evaluate(state, roles, path),
            },
        }
    }
}
