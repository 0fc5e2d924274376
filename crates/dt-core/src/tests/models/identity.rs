use crate::{Identity, Permission, Role, editable_identities};

#[test]
fn given_admin_when_new_then_has_full_permission_set() {
    let identity = Identity::new("1", "Admin User", "admin@example.com", Role::Admin).unwrap();

    assert_eq!(identity.permissions.len(), 13);
    assert_eq!(identity.created_at, identity.updated_at);
}

#[test]
fn given_empty_id_when_new_then_validation_error() {
    assert!(Identity::new("  ", "Nobody", "nobody@example.com", Role::User).is_err());
}

#[test]
fn given_duplicate_permissions_when_with_permissions_then_stored_once() {
    let identity = Identity::new("2", "Regular User", "user@example.com", Role::User)
        .unwrap()
        .with_permissions([Permission::ViewReports, Permission::ViewReports]);

    assert_eq!(identity.permissions.len(), 1);
    assert!(identity.has_permission(Permission::ViewReports));
    assert!(!identity.has_permission(Permission::ViewAppointments));
}

#[test]
fn given_identity_when_replace_permissions_then_updated_at_advances() {
    let mut identity = Identity::new("2", "Regular User", "user@example.com", Role::User).unwrap();
    let before = identity.updated_at;

    identity.replace_permissions([Permission::DataEntry]);
    let first = identity.updated_at;
    identity.replace_permissions([Permission::DataEntry]);

    assert!(first > before);
    assert!(identity.updated_at > first);
    assert_eq!(identity.permissions.len(), 1);
}

#[test]
fn given_camel_case_timestamps_when_deserialize_then_accepted() {
    let json = r#"{
        "id": "2",
        "name": "Regular User",
        "email": "user@example.com",
        "role": "user",
        "permissions": ["view_appointments"],
        "createdAt": "2025-02-23T21:08:17+02:00",
        "updatedAt": "2025-02-23T21:08:17+02:00"
    }"#;

    let identity: Identity = serde_json::from_str(json).unwrap();

    assert_eq!(identity.role, Role::User);
    assert!(identity.has_permission(Permission::ViewAppointments));
}

#[test]
fn given_missing_permissions_when_deserialize_then_empty_set() {
    let json = r#"{"id":"9","name":"P","email":"p@example.com","role":"patient",
        "created_at":"2025-02-23T19:08:17Z","updated_at":"2025-02-23T19:08:17Z"}"#;

    let identity: Identity = serde_json::from_str(json).unwrap();

    assert!(identity.permissions.is_empty());
}

#[test]
fn given_admin_when_editable_identities_then_excludes_self_and_admins() {
    let admin = Identity::new("1", "Admin", "admin@example.com", Role::Admin).unwrap();
    let other_admin = Identity::new("5", "Other", "other@example.com", Role::Admin).unwrap();
    let user = Identity::new("2", "User", "user@example.com", Role::User).unwrap();
    let secretary = Identity::new("3", "Sec", "sec@example.com", Role::Secretary).unwrap();
    let all = vec![admin.clone(), other_admin, user, secretary];

    let editable: Vec<&str> = editable_identities(&admin, &all)
        .into_iter()
        .map(|i| i.id.as_str())
        .collect();

    assert_eq!(editable, vec!["2", "3"]);
}

#[test]
fn given_non_admin_when_editable_identities_then_empty() {
    let secretary = Identity::new("3", "Sec", "sec@example.com", Role::Secretary).unwrap();
    let user = Identity::new("2", "User", "user@example.com", Role::User).unwrap();
    let all = vec![secretary.clone(), user];

    assert!(editable_identities(&secretary, &all).is_empty());
}
