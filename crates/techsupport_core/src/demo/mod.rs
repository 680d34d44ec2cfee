//! Deterministic sanitized dataset for demos and tests. Expects a freshly
//! migrated database; reseeding an already-seeded one fails on UNIQUE
//! constraints.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::domain::IncidentPatch;
use crate::error::AppError;
use crate::ingest::incidents_csv::{import_incidents_csv, IncidentCsvMapping};
use crate::repo::{close_incident, get_incident};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoSeedSummary {
    pub customers: usize,
    pub products: usize,
    pub technicians: usize,
    pub registrations: usize,
    pub incidents: usize,
    pub closed: usize,
}

const CUSTOMERS: [&str; 5] = [
    "Able Telephone",
    "Baldwin Medical Group",
    "Chesbro Systems",
    "Davison Auto Parts",
    "Eastman Imports",
];

const PRODUCTS: [(&str, &str); 4] = [
    ("ED100", "Editor Basic"),
    ("ED200", "Editor Pro"),
    ("LD050", "Ledger Lite"),
    ("PAY90", "Payroll Ninety"),
];

const TECHNICIANS: [&str; 3] = ["Alison Diaz", "Marco Benelli", "Priya Nair"];

const REGISTRATIONS: [(&str, &str); 6] = [
    ("Able Telephone", "ED100"),
    ("Able Telephone", "LD050"),
    ("Baldwin Medical Group", "ED200"),
    ("Chesbro Systems", "PAY90"),
    ("Davison Auto Parts", "ED100"),
    ("Eastman Imports", "ED200"),
];

fn demo_incidents_csv() -> String {
    let mut out = String::new();
    out.push_str("Title,Description,Customer,Product,DateOpened\n");

    let titles = [
        "Cannot open saved files",
        "License key rejected",
        "Report totals drift",
        "Crash when printing",
        "Import hangs on large batch",
        "Payroll run double-counts overtime",
        "Spell check misses headers",
        "Export drops trailing rows",
    ];

    for (i, title) in titles.iter().enumerate() {
        let customer = CUSTOMERS[i % CUSTOMERS.len()];
        let product = PRODUCTS[i % PRODUCTS.len()].1;
        let day = 1 + i; // one incident per day, deterministic window
        out.push_str(&format!(
            "{title},\"Reported by {customer} support contact.\",{customer},{product},2026-07-{day:02}T09:00:00Z\n"
        ));
    }
    out
}

pub fn seed_demo_dataset(conn: &mut Connection) -> Result<DemoSeedSummary, AppError> {
    for name in CUSTOMERS {
        conn.execute("INSERT INTO customers(name) VALUES (?1)", [name])
            .map_err(|e| {
                AppError::new("DB_WRITE_FAILED", "Failed to seed customer")
                    .with_details(format!("name={name}; err={e}"))
            })?;
    }
    for (code, name) in PRODUCTS {
        conn.execute(
            "INSERT INTO products(product_code, name) VALUES (?1, ?2)",
            [code, name],
        )
        .map_err(|e| {
            AppError::new("DB_WRITE_FAILED", "Failed to seed product")
                .with_details(format!("code={code}; err={e}"))
        })?;
    }
    for name in TECHNICIANS {
        conn.execute("INSERT INTO technicians(name) VALUES (?1)", [name])
            .map_err(|e| {
                AppError::new("DB_WRITE_FAILED", "Failed to seed technician")
                    .with_details(format!("name={name}; err={e}"))
            })?;
    }
    for (customer, product_code) in REGISTRATIONS {
        conn.execute(
            r#"
          INSERT INTO registrations (customer_id, product_code)
          SELECT c.customer_id, ?2 FROM customers c WHERE c.name = ?1
          "#,
            [customer, product_code],
        )
        .map_err(|e| {
            AppError::new("DB_WRITE_FAILED", "Failed to seed registration")
                .with_details(format!("customer={customer}; product={product_code}; err={e}"))
        })?;
    }

    let import = import_incidents_csv(conn, &demo_incidents_csv(), &IncidentCsvMapping::default())?;

    // Close the two oldest so both lifecycle states are represented.
    let mut closed = 0usize;
    for (id, tech_id, date_closed) in [(1, 1, "2026-07-03T16:30:00Z"), (2, 2, "2026-07-05T11:00:00Z")]
    {
        let old = get_incident(conn, id)?;
        let patch = IncidentPatch {
            title: old.title.clone(),
            description: old.description.clone(),
            tech_id: Some(tech_id),
            date_closed: Some(date_closed.to_string()),
        };
        close_incident(conn, &old, &patch)?;
        closed += 1;
    }

    Ok(DemoSeedSummary {
        customers: CUSTOMERS.len(),
        products: PRODUCTS.len(),
        technicians: TECHNICIANS.len(),
        registrations: REGISTRATIONS.len(),
        incidents: import.inserted,
        closed,
    })
}
