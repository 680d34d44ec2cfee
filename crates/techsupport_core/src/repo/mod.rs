//! Incident persistence and the business rules attached to it. All SQL here
//! is parameterized; caller-supplied values are never interpolated.

use rusqlite::{Connection, OptionalExtension};

use crate::domain::{CustomerRef, Incident, IncidentPatch, NewIncident, OpenIncidentRow, ProductRef};
use crate::error::AppError;
use crate::refdata;
use crate::validate::{
    validate_close_patch, validate_incident_id, validate_new_incident, validate_patch,
};

/// Returns every incident whose close date is unset, joined with customer
/// and technician display names. Ordering is storage-defined.
pub fn list_open_incidents(conn: &Connection) -> Result<Vec<OpenIncidentRow>, AppError> {
    let mut stmt = conn
        .prepare(
            r#"
      SELECT i.incident_id, i.product_code, i.date_opened, c.name, t.name, i.title
      FROM incidents i
      LEFT JOIN customers c ON c.customer_id = i.customer_id
      LEFT JOIN technicians t ON t.tech_id = i.tech_id
      WHERE i.date_closed IS NULL
      "#,
        )
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare open incidents query")
                .with_details(e.to_string())
        })?;

    let rows = stmt
        .query_map([], |row| {
            Ok(OpenIncidentRow {
                id: row.get(0)?,
                product_code: row.get(1)?,
                date_opened: row.get(2)?,
                customer: row.get(3)?,
                technician: row.get(4)?,
                title: row.get(5)?,
            })
        })
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query open incidents")
                .with_details(e.to_string())
        })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to decode open incident row")
                .with_details(e.to_string())
        })?);
    }

    Ok(out)
}

/// Fetches the full record for a known incident key.
pub fn get_incident(conn: &Connection, id: i64) -> Result<Incident, AppError> {
    validate_incident_id(id)?;

    let incident = conn
        .query_row(
            r#"
      SELECT incident_id, customer_id, product_code, tech_id,
             date_opened, date_closed, title, description
      FROM incidents
      WHERE incident_id = ?1
      "#,
            [id],
            |row| {
                Ok(Incident {
                    id: row.get(0)?,
                    customer_id: row.get(1)?,
                    product_code: row.get(2)?,
                    tech_id: row.get(3)?,
                    date_opened: row.get(4)?,
                    date_closed: row.get(5)?,
                    title: row.get(6)?,
                    description: row.get(7)?,
                })
            },
        )
        .optional()
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query incident")
                .with_details(e.to_string())
        })?;

    incident.ok_or_else(|| {
        AppError::new("INCIDENT_NOT_FOUND", "Incident not found").with_details(format!("id={id}"))
    })
}

/// Key of the most recently created incident, or 0 when none exist. This is
/// how callers observe the identity of a just-inserted record.
pub fn last_incident_id(conn: &Connection) -> Result<i64, AppError> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT incident_id FROM incidents ORDER BY incident_id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query last incident id")
                .with_details(e.to_string())
        })?;

    Ok(id.unwrap_or(0))
}

pub fn count_incidents(conn: &Connection) -> Result<i64, AppError> {
    conn.query_row("SELECT COUNT(*) FROM incidents", [], |row| row.get(0))
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to count incidents")
                .with_details(e.to_string())
        })
}

fn resolve_customer_id(conn: &Connection, customer: &CustomerRef) -> Result<i64, AppError> {
    match customer {
        CustomerRef::Id(id) => Ok(*id),
        CustomerRef::Name(name) => refdata::customer_id_by_name(conn, name)?.ok_or_else(|| {
            AppError::new("CUSTOMER_NOT_FOUND", "No customer with that name")
                .with_details(format!("name={name}"))
        }),
    }
}

fn resolve_product_code(conn: &Connection, product: &ProductRef) -> Result<String, AppError> {
    match product {
        ProductRef::Code(code) => Ok(code.clone()),
        ProductRef::Name(name) => refdata::product_code_by_name(conn, name)?.ok_or_else(|| {
            AppError::new("PRODUCT_NOT_FOUND", "No product with that name")
                .with_details(format!("name={name}"))
        }),
    }
}

/// Inserts a new open incident.
///
/// Validation runs before any query; name references are resolved lazily,
/// once, here. The new row has no technician and no close date. No identity
/// is returned; see `last_incident_id`.
pub fn add_open_incident(conn: &Connection, incident: &NewIncident) -> Result<(), AppError> {
    validate_new_incident(incident)?;

    let customer_id = resolve_customer_id(conn, &incident.customer)?;
    let product_code = resolve_product_code(conn, &incident.product)?;

    conn.execute(
        r#"
      INSERT INTO incidents (customer_id, product_code, date_opened, title, description)
      VALUES (?1, ?2, ?3, ?4, ?5)
      "#,
        rusqlite::params![
            customer_id,
            product_code,
            incident.date_opened,
            incident.title,
            incident.description,
        ],
    )
    .map_err(|e| {
        AppError::new("DB_WRITE_FAILED", "Failed to insert incident").with_details(e.to_string())
    })?;

    Ok(())
}

fn overwrite_incident(
    conn: &Connection,
    old: &Incident,
    new: &IncidentPatch,
) -> Result<(), AppError> {
    // The old view only locates the row; its field values are not compared
    // against storage, so concurrent writers can lose updates.
    let changed = conn
        .execute(
            r#"
      UPDATE incidents
      SET title = ?1, description = ?2, tech_id = ?3, date_closed = ?4
      WHERE incident_id = ?5
      "#,
            rusqlite::params![new.title, new.description, new.tech_id, new.date_closed, old.id],
        )
        .map_err(|e| {
            AppError::new("DB_WRITE_FAILED", "Failed to update incident")
                .with_details(e.to_string())
        })?;

    if changed == 0 {
        return Err(AppError::new("INCIDENT_NOT_FOUND", "Incident not found")
            .with_details(format!("id={}", old.id)));
    }
    Ok(())
}

/// Replaces the mutable fields of the record located via the old view's
/// identity. The close date passes through as given; the open date is
/// immutable after creation.
pub fn update_incident(
    conn: &Connection,
    old: &Incident,
    new: &IncidentPatch,
) -> Result<(), AppError> {
    validate_incident_id(old.id)?;
    validate_patch(new)?;
    overwrite_incident(conn, old, new)
}

/// Closes the incident located via the old view's identity, setting the
/// supplied close date and technician assignment.
pub fn close_incident(
    conn: &Connection,
    old: &Incident,
    new: &IncidentPatch,
) -> Result<(), AppError> {
    validate_incident_id(old.id)?;
    validate_close_patch(new)?;
    overwrite_incident(conn, old, new)
}

/// Whether the incident's close date has been set.
pub fn is_incident_closed(conn: &Connection, id: i64) -> Result<bool, AppError> {
    validate_incident_id(id)?;

    let date_closed: Option<Option<String>> = conn
        .query_row(
            "SELECT date_closed FROM incidents WHERE incident_id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query incident close state")
                .with_details(e.to_string())
        })?;

    match date_closed {
        Some(value) => Ok(value.is_some()),
        None => Err(AppError::new("INCIDENT_NOT_FOUND", "Incident not found")
            .with_details(format!("id={id}"))),
    }
}
