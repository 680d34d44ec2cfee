//! Read-only access to the customer/product/technician lookup tables.
//! These entities are listed and resolved here, never created or edited.

use rusqlite::{Connection, OptionalExtension};

use crate::error::AppError;

fn list_names(conn: &Connection, sql: &str, what: &str) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare(sql).map_err(|e| {
        AppError::new("DB_QUERY_FAILED", format!("Failed to prepare {what} name query"))
            .with_details(e.to_string())
    })?;

    let rows = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(|e| {
        AppError::new("DB_QUERY_FAILED", format!("Failed to query {what} names"))
            .with_details(e.to_string())
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| {
            AppError::new("DB_QUERY_FAILED", format!("Failed to decode {what} name row"))
                .with_details(e.to_string())
        })?);
    }
    Ok(out)
}

pub fn customer_names(conn: &Connection) -> Result<Vec<String>, AppError> {
    list_names(conn, "SELECT name FROM customers", "customer")
}

pub fn product_names(conn: &Connection) -> Result<Vec<String>, AppError> {
    list_names(conn, "SELECT name FROM products", "product")
}

pub fn technician_names(conn: &Connection) -> Result<Vec<String>, AppError> {
    list_names(conn, "SELECT name FROM technicians", "technician")
}

/// Resolves a customer display name to its key. `None` means no such
/// customer; the caller decides whether that is an error.
pub fn customer_id_by_name(conn: &Connection, name: &str) -> Result<Option<i64>, AppError> {
    conn.query_row(
        "SELECT customer_id FROM customers WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to resolve customer name")
            .with_details(e.to_string())
    })
}

/// Resolves a product display name to its code.
pub fn product_code_by_name(conn: &Connection, name: &str) -> Result<Option<String>, AppError> {
    conn.query_row(
        "SELECT product_code FROM products WHERE name = ?1",
        [name],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to resolve product name")
            .with_details(e.to_string())
    })
}
