use chrono::NaiveDate;
use serde::Serialize;
use soltur_cart::{CartError, SelectionCart};
use soltur_checkout::{BookingWizard, GuestRecord, WizardError, WizardStep};
use soltur_core::{
    first_uncovered_night, is_date_selectable, merge_to_ranges, parse_available_dates, CoreError,
    DateRange, StayInterval,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::availability::{AvailabilityState, FetchTicket};
use crate::provider::{AvailabilityProvider, InventorySource, ProviderError, PurchaseGateway};

/// Everything the UI needs to render the current wizard step.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    /// Zero-based; equals `total_steps - 1` on the review step.
    pub step: usize,
    pub total_steps: usize,
    pub review: bool,
    pub record: Option<GuestRecord>,
}

/// One booking flow: the cart, the reconciled availability, the chosen stay
/// and (once checkout starts) the wizard, owned together and discarded when
/// the flow ends.
///
/// There is exactly one instance per flow and it is passed `&mut` to every
/// operation; nothing here is shared across sessions.
#[derive(Debug)]
pub struct BookingSession {
    id: Uuid,
    property_code: String,
    cart: SelectionCart,
    availability: AvailabilityState,
    interval: Option<StayInterval>,
    wizard: Option<BookingWizard>,
}

impl BookingSession {
    pub fn new(property_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_code: property_code.into(),
            cart: SelectionCart::new(),
            availability: AvailabilityState::new(),
            interval: None,
            wizard: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn property_code(&self) -> &str {
        &self.property_code
    }

    pub fn cart(&self) -> &SelectionCart {
        &self.cart
    }

    pub fn ranges(&self) -> &[DateRange] {
        self.availability.ranges()
    }

    pub fn interval(&self) -> Option<StayInterval> {
        self.interval
    }

    pub fn wizard(&self) -> Option<&BookingWizard> {
        self.wizard.as_ref()
    }

    /// Switch the session to another property. Availability for the old one
    /// is meaningless, so any in-flight fetch is invalidated.
    pub fn set_property(&mut self, property_code: impl Into<String>) {
        self.property_code = property_code.into();
        self.availability.begin_refresh();
    }

    // --- availability -----------------------------------------------------

    /// Issue a new availability fetch. Callers driving the fetch themselves
    /// feed the response back through [`apply_availability`]; responses for
    /// tickets older than the latest one are dropped.
    ///
    /// [`apply_availability`]: BookingSession::apply_availability
    pub fn begin_availability_refresh(&mut self) -> FetchTicket {
        self.availability.begin_refresh()
    }

    /// Parse, merge and install a raw availability response, unless a newer
    /// fetch was issued meanwhile. Returns whether it was applied.
    pub fn apply_availability(&mut self, ticket: FetchTicket, raw_dates: &[String]) -> bool {
        let ranges = merge_to_ranges(&parse_available_dates(raw_dates));
        self.availability.apply(ticket, ranges)
    }

    /// Fetch and install availability for the current selection in one call.
    /// Call again whenever the selected units or the property change.
    pub async fn refresh_availability(
        &mut self,
        provider: &dyn AvailabilityProvider,
    ) -> Result<bool, SessionError> {
        let ticket = self.begin_availability_refresh();
        let unit_ids: Vec<String> = self
            .cart
            .lines()
            .iter()
            .map(|line| line.unit_id.clone())
            .collect();
        let raw = provider
            .fetch_available_dates(&self.property_code, &unit_ids)
            .await
            .map_err(SessionError::Provider)?;
        Ok(self.apply_availability(ticket, &raw))
    }

    /// Calendar query for the UI: may this day be rendered as selectable?
    pub fn date_selectable(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        chosen_start: Option<NaiveDate>,
    ) -> bool {
        is_date_selectable(date, self.availability.ranges(), today, chosen_start)
    }

    /// Pick the stay. Rejects zero-night intervals and any stay with a night
    /// not covered by the current availability.
    pub fn choose_interval(
        &mut self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<(), SessionError> {
        let interval = StayInterval::new(check_in, check_out)?;
        if let Some(night) = first_uncovered_night(&interval, self.availability.ranges()) {
            return Err(SessionError::AvailabilityMismatch { night });
        }
        self.interval = Some(interval);
        Ok(())
    }

    // --- selection --------------------------------------------------------

    /// Select a unit: price and label come from the inventory backend, then
    /// the cart enforces the session cap.
    pub async fn select_unit(
        &mut self,
        unit_id: &str,
        quantity: u32,
        source: &dyn InventorySource,
    ) -> Result<(), SessionError> {
        let info = source
            .unit_info(unit_id)
            .await
            .map_err(SessionError::Provider)?;
        self.cart
            .add_unit(unit_id, &info.label, info.unit_price, quantity)?;
        // Availability is per unit set, so any fetch in flight is now stale
        self.availability.begin_refresh();
        Ok(())
    }

    pub fn deselect_unit(
        &mut self,
        unit_id: &str,
        quantity: Option<u32>,
    ) -> Result<(), SessionError> {
        self.cart.remove_unit(unit_id, quantity)?;
        self.availability.begin_refresh();
        Ok(())
    }

    // --- checkout ---------------------------------------------------------

    /// Build the wizard over the current selection, one record per unit
    /// instance, starting at the first record.
    pub fn begin_checkout(&mut self) -> Result<(), SessionError> {
        self.wizard = Some(BookingWizard::from_cart(&self.cart)?);
        Ok(())
    }

    pub fn advance(&mut self) -> Result<WizardStep, SessionError> {
        Ok(self.wizard_mut()?.advance()?)
    }

    pub fn retreat(&mut self) -> Result<(), SessionError> {
        self.wizard_mut()?.retreat();
        Ok(())
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        Ok(self.wizard_mut()?.jump_to(index)?)
    }

    pub fn current_record_mut(&mut self) -> Result<Option<&mut GuestRecord>, SessionError> {
        Ok(self.wizard_mut()?.current_record_mut())
    }

    /// Drop a record and its unit instance. An emptied wizard means the
    /// selection was cleared, so checkout ends.
    pub fn remove_record(&mut self, index: usize) -> Result<(), SessionError> {
        let wizard = self.wizard.as_mut().ok_or(SessionError::NotInCheckout)?;
        wizard.remove_record(index, &mut self.cart)?;
        if wizard.is_empty() {
            info!(session = %self.id, "last record removed, leaving checkout");
            self.wizard = None;
        }
        Ok(())
    }

    pub fn wizard_view(&self) -> Result<WizardView, SessionError> {
        let wizard = self.wizard.as_ref().ok_or(SessionError::NotInCheckout)?;
        let (step, review) = match wizard.step() {
            WizardStep::Collecting(index) => (index, false),
            WizardStep::Review => (wizard.record_count(), true),
        };
        Ok(WizardView {
            step,
            total_steps: wizard.total_steps(),
            review,
            record: wizard.current_record().cloned(),
        })
    }

    // --- submission -------------------------------------------------------

    /// Finalize and hand the order to the purchase endpoint.
    ///
    /// The chosen interval is re-checked against availability right before
    /// submission; a stay that is no longer covered blocks here. A gateway
    /// failure leaves the whole session untouched so the user can retry.
    pub async fn submit(&mut self, gateway: &dyn PurchaseGateway) -> Result<(), SessionError> {
        let wizard = self.wizard.as_ref().ok_or(SessionError::NotInCheckout)?;

        if let Some(interval) = &self.interval {
            if let Some(night) = first_uncovered_night(interval, self.availability.ranges()) {
                warn!(session = %self.id, %night, "chosen stay no longer covered at submission");
                return Err(SessionError::AvailabilityMismatch { night });
            }
        }

        let payload = wizard.finalize(self.interval)?;
        gateway
            .submit(&payload)
            .await
            .map_err(SessionError::Gateway)?;

        info!(
            session = %self.id,
            units = payload.unit_selections.len(),
            records = payload.records.len(),
            "booking submitted"
        );
        Ok(())
    }

    fn wizard_mut(&mut self) -> Result<&mut BookingWizard, SessionError> {
        self.wizard.as_mut().ok_or(SessionError::NotInCheckout)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("Stay not fully available: night {night} is not covered")]
    AvailabilityMismatch { night: NaiveDate },

    #[error("Checkout has not been started")]
    NotInCheckout,

    #[error("Availability fetch failed: {0}")]
    Provider(ProviderError),

    #[error("Purchase submission failed: {0}")]
    Gateway(ProviderError),
}
