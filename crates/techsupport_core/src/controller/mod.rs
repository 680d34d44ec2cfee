use std::path::Path;

use rusqlite::Connection;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db;
use crate::domain::{Incident, IncidentPatch, NewIncident, OpenIncidentRow};
use crate::error::AppError;
use crate::refdata;
use crate::registration;
use crate::repo;
use crate::validate::validate_registration_query;

/// Current UTC time as an RFC3339 string, for stamping open/close dates.
pub fn now_rfc3339_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc().format(&Rfc3339).map_err(|e| {
        AppError::new("DB_TIME_FAILED", "Failed to format current time")
            .with_details(e.to_string())
    })
}

/// Single entry point over the five resource areas (incidents, customers,
/// technicians, products, registrations). Pure delegation; no business
/// logic lives here beyond argument guards.
pub struct TechSupportController {
    conn: Connection,
}

impl TechSupportController {
    /// Wraps an already-opened connection. The caller is responsible for
    /// having migrated it.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (creating if absent) and migrates the database at `path`.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let mut conn = db::open(path)?;
        db::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, migrated. Used by tests and demos.
    pub fn open_in_memory() -> Result<Self, AppError> {
        let mut conn = db::open_in_memory()?;
        db::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    // Incidents

    pub fn add_open_incident(&self, incident: &NewIncident) -> Result<(), AppError> {
        repo::add_open_incident(&self.conn, incident)
    }

    pub fn open_incidents(&self) -> Result<Vec<OpenIncidentRow>, AppError> {
        repo::list_open_incidents(&self.conn)
    }

    pub fn incident_by_id(&self, id: i64) -> Result<Incident, AppError> {
        repo::get_incident(&self.conn, id)
    }

    pub fn last_incident_id(&self) -> Result<i64, AppError> {
        repo::last_incident_id(&self.conn)
    }

    pub fn is_incident_closed(&self, id: i64) -> Result<bool, AppError> {
        repo::is_incident_closed(&self.conn, id)
    }

    pub fn update_incident(&self, old: &Incident, new: &IncidentPatch) -> Result<(), AppError> {
        repo::update_incident(&self.conn, old, new)
    }

    pub fn close_incident(&self, old: &Incident, new: &IncidentPatch) -> Result<(), AppError> {
        repo::close_incident(&self.conn, old, new)
    }

    // Customers / technicians / products

    pub fn customer_names(&self) -> Result<Vec<String>, AppError> {
        refdata::customer_names(&self.conn)
    }

    pub fn technician_names(&self) -> Result<Vec<String>, AppError> {
        refdata::technician_names(&self.conn)
    }

    pub fn product_names(&self) -> Result<Vec<String>, AppError> {
        refdata::product_names(&self.conn)
    }

    // Registrations

    pub fn product_is_registered_to_customer(
        &self,
        customer_name: &str,
        product_name: &str,
    ) -> Result<bool, AppError> {
        validate_registration_query(customer_name, product_name)?;
        registration::product_registered_to_customer(&self.conn, customer_name, product_name)
    }
}
