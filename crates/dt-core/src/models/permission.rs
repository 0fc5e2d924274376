use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Fine-grained capability tag, independently grantable per identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewPatients,
    EditPatients,
    DeletePatients,
    ViewAppointments,
    ScheduleAppointments,
    CancelAppointments,
    ViewPayments,
    ProcessPayments,
    ViewReports,
    ManageUsers,
    ManagePermissions,
    ManageStock,
    DataEntry,
}

const ALL_PERMISSIONS: [Permission; 13] = [
    Permission::ViewPatients,
    Permission::EditPatients,
    Permission::DeletePatients,
    Permission::ViewAppointments,
    Permission::ScheduleAppointments,
    Permission::CancelAppointments,
    Permission::ViewPayments,
    Permission::ProcessPayments,
    Permission::ViewReports,
    Permission::ManageUsers,
    Permission::ManagePermissions,
    Permission::ManageStock,
    Permission::DataEntry,
];

impl Permission {
    /// The full closed vocabulary, in declaration order
    pub fn all() -> impl Iterator<Item = Permission> {
        ALL_PERMISSIONS.into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewPatients => "view_patients",
            Self::EditPatients => "edit_patients",
            Self::DeletePatients => "delete_patients",
            Self::ViewAppointments => "view_appointments",
            Self::ScheduleAppointments => "schedule_appointments",
            Self::CancelAppointments => "cancel_appointments",
            Self::ViewPayments => "view_payments",
            Self::ProcessPayments => "process_payments",
            Self::ViewReports => "view_reports",
            Self::ManageUsers => "manage_users",
            Self::ManagePermissions => "manage_permissions",
            Self::ManageStock => "manage_stock",
            Self::DataEntry => "data_entry",
        }
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        Self::all()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::InvalidPermission {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
