use crate::Permission;

use std::collections::HashSet;
use std::str::FromStr;

#[test]
fn test_permission_vocabulary_is_closed_and_unique() {
    let tags: HashSet<&str> = Permission::all().map(|p| p.as_str()).collect();

    assert_eq!(tags.len(), 13);
    assert!(tags.contains("view_patients"));
    assert!(tags.contains("manage_permissions"));
    assert!(tags.contains("data_entry"));
}

#[test]
fn test_permission_from_str_round_trips_every_tag() {
    for permission in Permission::all() {
        assert_eq!(Permission::from_str(permission.as_str()).unwrap(), permission);
    }
}

#[test]
fn test_permission_from_str_rejects_unknown_tag() {
    assert!(Permission::from_str("launch_missiles").is_err());
    assert!(Permission::from_str("").is_err());
}

#[test]
fn test_permission_display_matches_wire_tag() {
    assert_eq!(Permission::ScheduleAppointments.to_string(), "schedule_appointments");
    assert_eq!(
        serde_json::to_string(&Permission::ProcessPayments).unwrap(),
        "\"process_payments\""
    );
}
