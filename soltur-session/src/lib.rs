pub mod availability;
pub mod provider;
pub mod session;

pub use availability::{AvailabilityState, FetchTicket};
pub use provider::{AvailabilityProvider, InventorySource, ProviderError, PurchaseGateway, UnitInfo};
pub use session::{BookingSession, SessionError, WizardView};
