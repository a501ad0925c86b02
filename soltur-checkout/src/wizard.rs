use soltur_cart::SelectionCart;
use soltur_core::StayInterval;
use tracing::{debug, warn};

use crate::models::{BookingPayload, FieldError, GuestRecord, UnitSelection, WizardStep};

/// Step-by-step collection of one [`GuestRecord`] per selected unit instance,
/// ending in a terminal review step.
///
/// The wizard is built already populated with empty record slots, one per
/// unit instance in the cart, and starts at the first record.
#[derive(Debug)]
pub struct BookingWizard {
    records: Vec<GuestRecord>,
    step: WizardStep,
}

impl BookingWizard {
    pub fn from_cart(cart: &SelectionCart) -> Result<Self, WizardError> {
        let records: Vec<GuestRecord> = cart
            .unit_instances()
            .into_iter()
            .map(|unit| GuestRecord::empty(unit.unit_id, unit.label))
            .collect();

        if records.is_empty() {
            return Err(WizardError::Empty);
        }

        Ok(Self {
            records,
            step: WizardStep::Collecting(0),
        })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Record steps plus the terminal review step.
    pub fn total_steps(&self) -> usize {
        self.records.len() + 1
    }

    /// True once every record has been removed; callers treat this as
    /// "selection cleared" and must not try to reach review.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GuestRecord] {
        &self.records
    }

    /// The record the cursor points at, if collecting.
    pub fn current_record(&self) -> Option<&GuestRecord> {
        match self.step {
            WizardStep::Collecting(index) => self.records.get(index),
            WizardStep::Review => None,
        }
    }

    /// Mutable access to the record under the cursor. Records are only ever
    /// edited through the step currently pointing at them.
    pub fn current_record_mut(&mut self) -> Option<&mut GuestRecord> {
        match self.step {
            WizardStep::Collecting(index) => self.records.get_mut(index),
            WizardStep::Review => None,
        }
    }

    /// Validate the current record and move forward.
    ///
    /// On validation failure the cursor stays put and the per-field errors
    /// are returned for the UI to surface. The last record advances into
    /// [`WizardStep::Review`].
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if self.records.is_empty() {
            return Err(WizardError::Empty);
        }

        let index = match self.step {
            WizardStep::Collecting(index) => index,
            WizardStep::Review => return Ok(WizardStep::Review),
        };

        let errors = self.records[index].validate();
        if !errors.is_empty() {
            debug!(step = index, fields = errors.len(), "record failed validation");
            return Err(WizardError::ValidationFailed(errors));
        }

        self.step = if index + 1 == self.records.len() {
            WizardStep::Review
        } else {
            WizardStep::Collecting(index + 1)
        };
        Ok(self.step)
    }

    /// Step backward without validating. From review, returns to the last
    /// record; at the first record this is a no-op.
    pub fn retreat(&mut self) {
        self.step = match self.step {
            WizardStep::Collecting(index) => WizardStep::Collecting(index.saturating_sub(1)),
            WizardStep::Review => WizardStep::Collecting(self.records.len().saturating_sub(1)),
        };
    }

    /// Jump straight to an already-visited record for editing. The record
    /// being left is not validated.
    pub fn jump_to(&mut self, index: usize) -> Result<(), WizardError> {
        if index >= self.records.len() {
            return Err(WizardError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.step = WizardStep::Collecting(index);
        Ok(())
    }

    /// Remove a record and hand its unit instance back to the cart.
    ///
    /// The cursor is rebalanced so it keeps pointing at a valid record:
    /// removing at or before the cursor shifts it one step back (floor 0),
    /// and it never ends up past the shortened record list.
    pub fn remove_record(
        &mut self,
        index: usize,
        cart: &mut SelectionCart,
    ) -> Result<(), WizardError> {
        if index >= self.records.len() {
            return Err(WizardError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }

        let record = self.records.remove(index);
        if let Err(err) = cart.remove_unit(&record.unit_id, Some(1)) {
            warn!(unit_id = %record.unit_id, error = %err, "cart line missing during record removal");
        }

        self.step = match self.step {
            WizardStep::Collecting(current) if current >= index && current > 0 => {
                WizardStep::Collecting(current - 1)
            }
            WizardStep::Collecting(current) => WizardStep::Collecting(current),
            // Review is no longer meaningful once the selection changed
            WizardStep::Review => {
                WizardStep::Collecting(index.min(self.records.len().saturating_sub(1)))
            }
        };
        Ok(())
    }

    /// Build the submission payload. Only valid from the review step; every
    /// record is re-checked so an edited-then-abandoned record cannot slip
    /// through.
    pub fn finalize(&self, interval: Option<StayInterval>) -> Result<BookingPayload, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotReviewable);
        }

        for record in &self.records {
            let errors = record.validate();
            if !errors.is_empty() {
                return Err(WizardError::ValidationFailed(errors));
            }
        }

        // Aggregate per unit id, preserving first-seen order
        let mut unit_selections: Vec<UnitSelection> = Vec::new();
        for record in &self.records {
            match unit_selections
                .iter_mut()
                .find(|selection| selection.unit_id == record.unit_id)
            {
                Some(selection) => selection.quantity += 1,
                None => unit_selections.push(UnitSelection {
                    unit_id: record.unit_id.clone(),
                    quantity: 1,
                }),
            }
        }

        Ok(BookingPayload {
            unit_selections,
            records: self.records.clone(),
            interval,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Record validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("Record index {index} out of range (record count {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("No records to collect: the selection is empty")]
    Empty,

    #[error("Wizard has not reached the review step")]
    NotReviewable,
}
