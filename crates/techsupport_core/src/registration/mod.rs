use rusqlite::Connection;

use crate::error::AppError;
use crate::validate::validate_registration_query;

/// Answers whether a registration row joins the named customer and product.
/// Pure existence read; inserting a matching row changes the answer on the
/// next call, there is no caching.
pub fn product_registered_to_customer(
    conn: &Connection,
    customer_name: &str,
    product_name: &str,
) -> Result<bool, AppError> {
    validate_registration_query(customer_name, product_name)?;

    conn.query_row(
        r#"
      SELECT EXISTS (
        SELECT 1
        FROM registrations r
        JOIN customers c ON c.customer_id = r.customer_id
        JOIN products p ON p.product_code = r.product_code
        WHERE c.name = ?1 AND p.name = ?2
      )
      "#,
        [customer_name, product_name],
        |row| row.get(0),
    )
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to query registration")
            .with_details(e.to_string())
    })
}
