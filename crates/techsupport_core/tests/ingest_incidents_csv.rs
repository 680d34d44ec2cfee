use pretty_assertions::assert_eq;
use rusqlite::Connection;

use techsupport_core::db;
use techsupport_core::ingest::incidents_csv::{
    import_incidents_csv, preview_incidents_csv, IncidentCsvMapping,
};
use techsupport_core::repo::{count_incidents, list_open_incidents};

fn test_conn() -> Connection {
    let mut conn = db::open_in_memory().expect("open");
    db::migrate(&mut conn).expect("migrate");
    conn.execute_batch(
        r#"
      INSERT INTO customers(name) VALUES ('Able Telephone'), ('Baldwin Medical Group');
      INSERT INTO products(product_code, name) VALUES ('ED100', 'Editor Basic');
    "#,
    )
    .expect("seed reference data");
    conn
}

const GOOD_CSV: &str = "\
Title,Description,Customer,Product,DateOpened
Crash on save,Editor crashes saving large files,Able Telephone,Editor Basic,2026-08-01T09:00:00Z
License rejected,Key not accepted after renewal,Baldwin Medical Group,Editor Basic,2026-08-02T10:00:00Z
";

#[test]
fn imports_every_valid_row() {
    let conn = test_conn();
    let summary = import_incidents_csv(&conn, GOOD_CSV, &IncidentCsvMapping::default()).unwrap();

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.skipped, 0);
    assert!(summary.warnings.is_empty());
    assert_eq!(count_incidents(&conn).unwrap(), 2);
    assert_eq!(list_open_incidents(&conn).unwrap().len(), 2);
}

#[test]
fn skips_rows_with_missing_cells() {
    let conn = test_conn();
    let csv_text = "\
Title,Description,Customer,Product,DateOpened
,No title here,Able Telephone,Editor Basic,2026-08-01T09:00:00Z
Crash on save,Editor crashes,Able Telephone,Editor Basic,2026-08-01T09:00:00Z
";
    let summary = import_incidents_csv(&conn, csv_text, &IncidentCsvMapping::default()).unwrap();

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.skipped, 1);
    assert!(summary
        .warnings
        .iter()
        .any(|w| w.code == "INGEST_MISSING_FIELD"));
}

#[test]
fn skips_rows_with_unknown_references_and_keeps_going() {
    let conn = test_conn();
    let csv_text = "\
Title,Description,Customer,Product,DateOpened
Crash on save,Editor crashes,Nonesuch Industries,Editor Basic,2026-08-01T09:00:00Z
License rejected,Key not accepted,Able Telephone,Editor Basic,2026-08-02T10:00:00Z
";
    let summary = import_incidents_csv(&conn, csv_text, &IncidentCsvMapping::default()).unwrap();

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.skipped, 1);
    assert!(summary.warnings.iter().any(|w| w.code == "INGEST_ROW_SKIPPED"
        && w.details.as_deref().is_some_and(|d| d.contains("CUSTOMER_NOT_FOUND"))));
    assert_eq!(count_incidents(&conn).unwrap(), 1);
}

#[test]
fn unmapped_column_fails_up_front() {
    let conn = test_conn();
    let csv_text = "\
Summary,Description,Customer,Product,DateOpened
Crash on save,Editor crashes,Able Telephone,Editor Basic,2026-08-01T09:00:00Z
";
    let err = import_incidents_csv(&conn, csv_text, &IncidentCsvMapping::default()).unwrap_err();
    assert_eq!(err.code, "INGEST_COLUMN_MISSING");
    assert_eq!(count_incidents(&conn).unwrap(), 0);
}

#[test]
fn custom_mapping_renames_columns() {
    let conn = test_conn();
    let csv_text = "\
Summary,Notes,Account,Software,Opened
Crash on save,Editor crashes,Able Telephone,Editor Basic,2026-08-01T09:00:00Z
";
    let mapping = IncidentCsvMapping {
        title: "Summary".to_string(),
        description: "Notes".to_string(),
        customer: "Account".to_string(),
        product: "Software".to_string(),
        date_opened: "Opened".to_string(),
    };
    let summary = import_incidents_csv(&conn, csv_text, &mapping).unwrap();
    assert_eq!(summary.inserted, 1);
}

#[test]
fn preview_returns_headers_and_capped_rows() {
    let preview = preview_incidents_csv(GOOD_CSV, 1).unwrap();
    assert_eq!(
        preview.headers,
        vec!["Title", "Description", "Customer", "Product", "DateOpened"]
    );
    assert_eq!(preview.rows.len(), 1);
    assert_eq!(preview.rows[0][0], "Crash on save");
}
