use pretty_assertions::assert_eq;
use rusqlite::Connection;

use techsupport_core::db;
use techsupport_core::ingest::incidents_csv::IncidentCsvMapping;
use techsupport_core::profiles::{
    delete_profile, get_profile, list_profiles, upsert_profile, MappingProfileUpsert,
};

fn test_conn() -> Connection {
    let mut conn = db::open_in_memory().expect("open");
    db::migrate(&mut conn).expect("migrate");
    conn
}

fn custom_mapping() -> IncidentCsvMapping {
    IncidentCsvMapping {
        title: "Summary".to_string(),
        description: "Notes".to_string(),
        customer: "Account".to_string(),
        product: "Software".to_string(),
        date_opened: "Opened".to_string(),
    }
}

#[test]
fn profile_round_trips_through_json_column() {
    let mut conn = test_conn();
    let created = upsert_profile(
        &mut conn,
        MappingProfileUpsert {
            id: None,
            name: "legacy export".to_string(),
            mapping: custom_mapping(),
        },
    )
    .expect("create");

    let fetched = get_profile(&conn, created.id).expect("get");
    assert_eq!(fetched, created);
    assert_eq!(fetched.mapping, custom_mapping());

    let all = list_profiles(&conn).expect("list");
    assert_eq!(all, vec![created]);
}

#[test]
fn upsert_with_id_updates_in_place() {
    let mut conn = test_conn();
    let created = upsert_profile(
        &mut conn,
        MappingProfileUpsert {
            id: None,
            name: "legacy export".to_string(),
            mapping: custom_mapping(),
        },
    )
    .expect("create");

    let mut mapping = custom_mapping();
    mapping.title = "Headline".to_string();
    let updated = upsert_profile(
        &mut conn,
        MappingProfileUpsert {
            id: Some(created.id),
            name: "legacy export v2".to_string(),
            mapping: mapping.clone(),
        },
    )
    .expect("update");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "legacy export v2");
    assert_eq!(updated.mapping, mapping);
    assert_eq!(list_profiles(&conn).expect("list").len(), 1);
}

#[test]
fn blank_name_or_column_is_rejected() {
    let mut conn = test_conn();
    let err = upsert_profile(
        &mut conn,
        MappingProfileUpsert {
            id: None,
            name: "  ".to_string(),
            mapping: custom_mapping(),
        },
    )
    .unwrap_err();
    assert!(err.is_invalid_argument());

    let mut mapping = custom_mapping();
    mapping.product = String::new();
    let err = upsert_profile(
        &mut conn,
        MappingProfileUpsert {
            id: None,
            name: "ok".to_string(),
            mapping,
        },
    )
    .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn missing_profile_reports_not_found() {
    let mut conn = test_conn();
    assert_eq!(get_profile(&conn, 7).unwrap_err().code, "PROFILE_NOT_FOUND");
    assert_eq!(delete_profile(&mut conn, 7).unwrap_err().code, "PROFILE_NOT_FOUND");

    let created = upsert_profile(
        &mut conn,
        MappingProfileUpsert {
            id: None,
            name: "short lived".to_string(),
            mapping: custom_mapping(),
        },
    )
    .expect("create");
    delete_profile(&mut conn, created.id).expect("delete");
    assert!(list_profiles(&conn).expect("list").is_empty());
}
