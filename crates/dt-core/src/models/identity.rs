use crate::{CoreError, Permission, Result as CoreErrorResult, Role};

use std::collections::BTreeSet;
use std::panic::Location;

use chrono::{DateTime, Duration, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// The signed-in principal's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// New identity with the role's default permission set.
    #[track_caller]
    pub fn new(id: &str, name: &str, email: &str, role: Role) -> CoreErrorResult<Self> {
        if id.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "identity id cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            permissions: role.default_permissions(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Replace the permission set and advance `updated_at`.
    ///
    /// The new timestamp is strictly greater than the old one even when the
    /// clock has not moved since the last update.
    pub fn replace_permissions(&mut self, permissions: impl IntoIterator<Item = Permission>) {
        self.permissions = permissions.into_iter().collect();

        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Identities whose permissions `current` may edit.
///
/// Only administrators manage permissions, and never their own or another
/// administrator's.
pub fn editable_identities<'a>(current: &Identity, all: &'a [Identity]) -> Vec<&'a Identity> {
    if current.role != Role::Admin {
        return Vec::new();
    }

    all.iter()
        .filter(|candidate| candidate.role != Role::Admin && candidate.id != current.id)
        .collect()
}
