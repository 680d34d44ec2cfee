use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identifies a customer either by internal key or by display name.
///
/// Name resolution happens once, at the repository boundary, when the
/// incident is persisted. Keys are positive; zero is not a valid sentinel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CustomerRef {
    Id(i64),
    Name(String),
}

impl CustomerRef {
    pub fn is_identified(&self) -> bool {
        match self {
            CustomerRef::Id(id) => *id >= 1,
            CustomerRef::Name(name) => !name.trim().is_empty(),
        }
    }
}

/// Identifies a product either by its code or by display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductRef {
    Code(String),
    Name(String),
}

impl ProductRef {
    pub fn is_identified(&self) -> bool {
        match self {
            ProductRef::Code(code) => !code.trim().is_empty(),
            ProductRef::Name(name) => !name.trim().is_empty(),
        }
    }
}

/// Input for creating an open incident.
///
/// Timestamps are RFC3339 UTC strings, matching the storage representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIncident {
    pub customer: CustomerRef,
    pub product: ProductRef,
    pub date_opened: String,
    pub title: String,
    pub description: String,
}

impl NewIncident {
    /// Constructs a new-incident request, rejecting obviously invalid input
    /// up front. The repository re-validates before persisting, since the
    /// fields stay public.
    pub fn new(
        customer: CustomerRef,
        product: ProductRef,
        date_opened: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, AppError> {
        let title = title.into();
        let description = description.into();

        if title.trim().is_empty() {
            return Err(AppError::new(
                "INVALID_ARGUMENT",
                "Incident title cannot be empty",
            ));
        }
        if description.trim().is_empty() {
            return Err(AppError::new(
                "INVALID_ARGUMENT",
                "Incident description cannot be empty",
            ));
        }
        if !customer.is_identified() {
            return Err(AppError::new(
                "INVALID_ARGUMENT",
                "Incident must identify a customer by name or positive id",
            ));
        }
        if !product.is_identified() {
            return Err(AppError::new(
                "INVALID_ARGUMENT",
                "Incident must identify a product by name or code",
            ));
        }

        Ok(Self {
            customer,
            product,
            date_opened: date_opened.into(),
            title,
            description,
        })
    }
}

/// A persisted incident. Open/closed state is solely the presence of
/// `date_closed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: i64,
    pub customer_id: i64,
    pub product_code: String,
    pub tech_id: Option<i64>,
    pub date_opened: String,
    pub date_closed: Option<String>,
    pub title: String,
    pub description: String,
}

impl Incident {
    pub fn is_open(&self) -> bool {
        self.date_closed.is_none()
    }
}

/// Listing view of an open incident, joined with display names.
/// The technician is absent while the incident is unassigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpenIncidentRow {
    pub id: i64,
    pub product_code: String,
    pub date_opened: String,
    pub customer: String,
    pub technician: Option<String>,
    pub title: String,
}

/// Desired final state for update/close. The stored row is located via the
/// old `Incident` view's id; these fields replace the mutable columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentPatch {
    pub title: String,
    pub description: String,
    pub tech_id: Option<i64>,
    pub date_closed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
