use crate::{Permission, Role};

use std::str::FromStr;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::Secretary.as_str(), "secretary");
    assert_eq!(Role::User.as_str(), "user");
    assert_eq!(Role::Patient.as_str(), "patient");
}

#[test]
fn test_role_from_str() {
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::from_str("secretary").unwrap(), Role::Secretary);
    assert_eq!(Role::from_str("patient").unwrap(), Role::Patient);
    assert!(Role::from_str("Admin").is_err());
    assert!(Role::from_str("superuser").is_err());
}

#[test]
fn test_role_default_is_user() {
    assert_eq!(Role::default(), Role::User);
}

#[test]
fn given_admin_role_when_default_permissions_then_full_vocabulary() {
    let permissions = Role::Admin.default_permissions();

    assert_eq!(permissions.len(), 13);
    assert!(Permission::all().all(|p| permissions.contains(&p)));
}

#[test]
fn given_non_admin_role_when_default_permissions_then_view_appointments_only() {
    for role in [Role::Secretary, Role::User, Role::Patient] {
        let permissions = role.default_permissions();
        assert_eq!(permissions.len(), 1, "{role}");
        assert!(permissions.contains(&Permission::ViewAppointments));
    }
}

#[test]
fn test_role_serde_uses_snake_case() {
    assert_eq!(serde_json::to_string(&Role::Secretary).unwrap(), "\"secretary\"");
    let role: Role = serde_json::from_str("\"patient\"").unwrap();
    assert_eq!(role, Role::Patient);
}
