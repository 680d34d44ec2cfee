//! Pure argument guards, run eagerly before any I/O. Every failure is an
//! `INVALID_ARGUMENT` surfaced directly to the caller.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{IncidentPatch, NewIncident};
use crate::error::AppError;

fn ensure_rfc3339(field: &str, value: &str) -> Result<(), AppError> {
    OffsetDateTime::parse(value, &Rfc3339).map(|_| ()).map_err(|e| {
        AppError::new("INVALID_ARGUMENT", format!("{field} is not an RFC3339 timestamp"))
            .with_details(format!("value={value}; err={e}"))
    })
}

/// Mandatory-field rule for adding an open incident: customer identified by
/// name or positive key, product identified by name or code, date opened
/// set, title and description non-empty.
pub fn validate_new_incident(incident: &NewIncident) -> Result<(), AppError> {
    if !incident.customer.is_identified() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident must identify a customer by name or positive id",
        ));
    }
    if !incident.product.is_identified() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident must identify a product by name or code",
        ));
    }
    if incident.title.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident title cannot be empty",
        ));
    }
    if incident.description.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident description cannot be empty",
        ));
    }
    if incident.date_opened.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident date opened must be set",
        ));
    }
    ensure_rfc3339("date_opened", &incident.date_opened)
}

/// Guards the replacement view for update: title/description stay non-empty
/// and a close date, when present, must parse.
pub fn validate_patch(patch: &IncidentPatch) -> Result<(), AppError> {
    if patch.title.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident title cannot be empty",
        ));
    }
    if patch.description.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident description cannot be empty",
        ));
    }
    if let Some(date_closed) = patch.date_closed.as_deref() {
        ensure_rfc3339("date_closed", date_closed)?;
    }
    Ok(())
}

/// Close is an update that must carry the close timestamp.
pub fn validate_close_patch(patch: &IncidentPatch) -> Result<(), AppError> {
    validate_patch(patch)?;
    if patch.date_closed.is_none() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Closing an incident requires a close date",
        ));
    }
    Ok(())
}

/// Recoverable-identity guard used before lookup/update/close.
pub fn validate_incident_id(id: i64) -> Result<(), AppError> {
    if id < 1 {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Incident id must be positive",
        ));
    }
    Ok(())
}

/// Both names are required for the registration check; rejected before any
/// query executes.
pub fn validate_registration_query(customer_name: &str, product_name: &str) -> Result<(), AppError> {
    if customer_name.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Customer name cannot be empty",
        ));
    }
    if product_name.trim().is_empty() {
        return Err(AppError::new(
            "INVALID_ARGUMENT",
            "Product name cannot be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerRef, ProductRef};

    fn sample() -> NewIncident {
        NewIncident {
            customer: CustomerRef::Name("Able Telephone".to_string()),
            product: ProductRef::Name("Editor Basic".to_string()),
            date_opened: "2026-08-01T09:00:00Z".to_string(),
            title: "Crash on save".to_string(),
            description: "Editor crashes when saving large files".to_string(),
        }
    }

    #[test]
    fn accepts_fully_populated_incident() {
        assert!(validate_new_incident(&sample()).is_ok());
    }

    #[test]
    fn rejects_blank_customer_name() {
        let mut incident = sample();
        incident.customer = CustomerRef::Name("   ".to_string());
        assert!(validate_new_incident(&incident).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn rejects_malformed_date_opened() {
        let mut incident = sample();
        incident.date_opened = "yesterday".to_string();
        assert!(validate_new_incident(&incident).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn close_requires_date_closed() {
        let patch = IncidentPatch {
            title: "Crash on save".to_string(),
            description: "Fixed in 1.2".to_string(),
            tech_id: Some(2),
            date_closed: None,
        };
        assert!(validate_patch(&patch).is_ok());
        assert!(validate_close_patch(&patch).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn incident_id_must_be_positive() {
        assert!(validate_incident_id(0).is_err());
        assert!(validate_incident_id(7).is_ok());
    }

    #[test]
    fn registration_query_requires_both_names() {
        assert!(validate_registration_query("Able Telephone", "").is_err());
        assert!(validate_registration_query("", "Editor Basic").is_err());
        assert!(validate_registration_query("Able Telephone", "Editor Basic").is_ok());
    }
}
