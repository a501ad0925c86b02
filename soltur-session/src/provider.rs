use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use soltur_checkout::BookingPayload;

/// Label and nightly price for one selectable unit, as the backend knows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitInfo {
    pub label: String,
    /// Minor currency units per night.
    pub unit_price: i64,
}

/// Failures from the external collaborators. Opaque to the engine: they are
/// surfaced to the user as a retryable notification and never corrupt
/// session state.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

/// Backend returning the raw availability calendar for a property.
///
/// The returned date strings may be unsorted, duplicated or malformed; the
/// session parses and reconciles them.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    async fn fetch_available_dates(
        &self,
        property_code: &str,
        unit_ids: &[String],
    ) -> Result<Vec<String>, ProviderError>;
}

/// Backend lookup used to populate a cart line when a unit is selected.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn unit_info(&self, unit_id: &str) -> Result<UnitInfo, ProviderError>;
}

/// The external purchase endpoint the finalized payload is handed to.
#[async_trait]
pub trait PurchaseGateway: Send + Sync {
    async fn submit(&self, payload: &BookingPayload) -> Result<(), ProviderError>;
}
