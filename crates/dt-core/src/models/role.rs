use crate::{CoreError, Permission, Result as CoreErrorResult};

use std::collections::BTreeSet;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Coarse-grained account category governing default access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Practice administrator, full access
    Admin,
    /// Front-desk staff
    Secretary,
    /// Standard practice user
    #[default]
    User,
    /// Patient portal account
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Secretary => "secretary",
            Self::User => "user",
            Self::Patient => "patient",
        }
    }

    /// Permission set granted to a new identity of this role.
    ///
    /// Administrators get the whole vocabulary; every other role starts
    /// with appointment viewing only.
    pub fn default_permissions(&self) -> BTreeSet<Permission> {
        match self {
            Self::Admin => Permission::all().collect(),
            Self::Secretary | Self::User | Self::Patient => {
                BTreeSet::from([Permission::ViewAppointments])
            }
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "admin" => Ok(Self::Admin),
            "secretary" => Ok(Self::Secretary),
            "user" => Ok(Self::User),
            "patient" => Ok(Self::Patient),
            _ => Err(CoreError::InvalidRole {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
