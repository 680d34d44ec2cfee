use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerRef, NewIncident, ProductRef, ValidationWarning};
use crate::error::AppError;
use crate::repo::add_open_incident;

/// Maps CSV column headers to incident fields. Every field is mandatory for
/// an open incident, so every column must be mapped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentCsvMapping {
    pub title: String,
    pub description: String,
    pub customer: String,
    pub product: String,
    pub date_opened: String,
}

impl Default for IncidentCsvMapping {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            description: "Description".to_string(),
            customer: "Customer".to_string(),
            product: "Product".to_string(),
            date_opened: "DateOpened".to_string(),
        }
    }
}

impl IncidentCsvMapping {
    pub fn columns(&self) -> [&str; 5] {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.customer.as_str(),
            self.product.as_str(),
            self.date_opened.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentCsvPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentImportSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub warnings: Vec<ValidationWarning>,
}

fn get<'a>(
    row: &'a csv::StringRecord,
    headers: &'a csv::StringRecord,
    header_name: &str,
) -> Option<&'a str> {
    headers
        .iter()
        .position(|h| h == header_name)
        .and_then(|idx| row.get(idx))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

pub fn preview_incidents_csv(csv_text: &str, max_rows: usize) -> Result<IncidentCsvPreview, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| {
            AppError::new("INGEST_CSV_PARSE_FAILED", "Failed to read CSV headers")
                .with_details(e.to_string())
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records().take(max_rows) {
        let record = record.map_err(|e| {
            AppError::new("INGEST_CSV_PARSE_FAILED", "Failed to read CSV row")
                .with_details(e.to_string())
        })?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(IncidentCsvPreview { headers, rows })
}

/// Imports open incidents from CSV text, feeding each row through the same
/// creation path as a single add. Rows with missing cells, invalid fields,
/// or unresolvable customer/product names are skipped with a warning;
/// storage faults abort the import.
pub fn import_incidents_csv(
    conn: &Connection,
    csv_text: &str,
    mapping: &IncidentCsvMapping,
) -> Result<IncidentImportSummary, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| {
            AppError::new("INGEST_CSV_PARSE_FAILED", "Failed to read CSV headers")
                .with_details(e.to_string())
        })?
        .clone();

    for column in mapping.columns() {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::new(
                "INGEST_COLUMN_MISSING",
                format!("Mapped column {column} is not present in the CSV"),
            ));
        }
    }

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    let mut warnings: Vec<ValidationWarning> = Vec::new();

    for (idx, record) in rdr.records().enumerate() {
        // Header row is consumed above; report 1-based data row numbers.
        let row_no = idx + 1;
        let record = record.map_err(|e| {
            AppError::new("INGEST_CSV_PARSE_FAILED", "Failed to read CSV row")
                .with_details(format!("row={row_no}; err={e}"))
        })?;

        let cells = [
            ("title", get(&record, &headers, &mapping.title)),
            ("description", get(&record, &headers, &mapping.description)),
            ("customer", get(&record, &headers, &mapping.customer)),
            ("product", get(&record, &headers, &mapping.product)),
            ("date_opened", get(&record, &headers, &mapping.date_opened)),
        ];
        if let Some((field, _)) = cells.iter().find(|(_, v)| v.is_none()) {
            warnings.push(
                ValidationWarning::new("INGEST_MISSING_FIELD", format!("Row is missing {field}"))
                    .with_details(format!("row={row_no}")),
            );
            skipped += 1;
            continue;
        }

        let incident = NewIncident {
            customer: CustomerRef::Name(cells[2].1.unwrap_or_default().to_string()),
            product: ProductRef::Name(cells[3].1.unwrap_or_default().to_string()),
            date_opened: cells[4].1.unwrap_or_default().to_string(),
            title: cells[0].1.unwrap_or_default().to_string(),
            description: cells[1].1.unwrap_or_default().to_string(),
        };

        match add_open_incident(conn, &incident) {
            Ok(()) => inserted += 1,
            Err(e) if e.is_invalid_argument() || e.is_not_found() => {
                warnings.push(
                    ValidationWarning::new("INGEST_ROW_SKIPPED", e.message.clone())
                        .with_details(format!("row={row_no}; code={}", e.code)),
                );
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(IncidentImportSummary {
        inserted,
        skipped,
        warnings,
    })
}
