pub mod models;
pub mod wizard;

pub use models::{BookingPayload, FieldError, GuestRecord, UnitSelection, WizardStep};
pub use wizard::{BookingWizard, WizardError};
