use serde::{Deserialize, Serialize};
use soltur_core::StayInterval;
use uuid::Uuid;

/// One structured record per selected unit instance: the passenger for a
/// seat, or the guest confirming a room. Created empty when the wizard is
/// built and filled in step by step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: Uuid,
    /// The inventory line this record belongs to.
    pub unit_id: String,
    pub unit_label: String,
    pub first_name: String,
    pub last_name: String,
    pub contact_email: String,
    pub document_number: String,
}

impl GuestRecord {
    pub fn empty(unit_id: String, unit_label: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_id,
            unit_label,
            first_name: String::new(),
            last_name: String::new(),
            contact_email: String::new(),
            document_number: String::new(),
        }
    }

    /// Required-field schema check. Empty result means the record is valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push(FieldError::required("first_name"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::required("last_name"));
        }
        if self.contact_email.trim().is_empty() {
            errors.push(FieldError::required("contact_email"));
        } else if !self.contact_email.contains('@') {
            errors.push(FieldError {
                field: "contact_email",
                message: "must be a valid email address".to_string(),
            });
        }
        if self.document_number.trim().is_empty() {
            errors.push(FieldError::required("document_number"));
        }

        errors
    }
}

/// A single field-level validation failure, surfaced next to the input it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "is required".to_string(),
        }
    }
}

/// Where the wizard currently stands: collecting the record at an index, or
/// on the terminal review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Collecting(usize),
    Review,
}

/// Per-unit quantity aggregation for the purchase endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSelection {
    pub unit_id: String,
    pub quantity: u32,
}

/// The finalized order handed to the external purchase collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct BookingPayload {
    pub unit_selections: Vec<UnitSelection>,
    pub records: Vec<GuestRecord>,
    /// Present for stay-based bookings; seat-only checkouts carry no interval.
    pub interval: Option<StayInterval>,
}
