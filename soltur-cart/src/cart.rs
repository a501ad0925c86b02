use serde::{Deserialize, Serialize};
use tracing::warn;

/// Hard cap on the total number of units selectable in one booking session.
pub const MAX_UNITS: u32 = 10;

/// One selectable unit in the cart: a room type with a quantity, or a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLine {
    pub unit_id: String,
    /// Class or type shown to the user ("Double room", "Business").
    pub label: String,
    /// Price per unit per night, in minor currency units. Arithmetic on this
    /// stays exact; any rounding for display happens in the UI layer.
    pub unit_price: i64,
    pub quantity: u32,
}

/// The flattened per-instance view of a line: one entry per physical unit.
/// This is the granularity the checkout wizard collects records at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInstance {
    pub unit_id: String,
    pub label: String,
}

/// Ordered collection of selected units, owned by a single booking session.
///
/// Invariant: the sum of quantities over all lines never exceeds
/// [`MAX_UNITS`]; mutations that would break it are rejected without
/// touching state.
#[derive(Debug, Default)]
pub struct SelectionCart {
    lines: Vec<InventoryLine>,
}

impl SelectionCart {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add units to the selection.
    ///
    /// A line with the same `unit_id` grows instead of duplicating. Exceeding
    /// the session cap rejects the whole add and leaves the cart unchanged.
    pub fn add_unit(
        &mut self,
        unit_id: &str,
        label: &str,
        unit_price: i64,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }

        let available = MAX_UNITS - self.total_quantity();
        if quantity > available {
            warn!(
                unit_id,
                requested = quantity,
                available,
                "selection cap reached, rejecting add"
            );
            return Err(CartError::CapacityExceeded {
                requested: quantity,
                available,
            });
        }

        match self.lines.iter_mut().find(|line| line.unit_id == unit_id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(InventoryLine {
                unit_id: unit_id.to_string(),
                label: label.to_string(),
                unit_price,
                quantity,
            }),
        }

        Ok(())
    }

    /// Remove units from the selection.
    ///
    /// `quantity: None` drops the whole line; a line whose quantity reaches 0
    /// is removed entirely.
    pub fn remove_unit(&mut self, unit_id: &str, quantity: Option<u32>) -> Result<(), CartError> {
        let pos = self
            .lines
            .iter()
            .position(|line| line.unit_id == unit_id)
            .ok_or_else(|| CartError::UnknownUnit(unit_id.to_string()))?;

        match quantity {
            Some(q) if q < self.lines[pos].quantity => self.lines[pos].quantity -= q,
            _ => {
                self.lines.remove(pos);
            }
        }

        Ok(())
    }

    pub fn lines(&self) -> &[InventoryLine] {
        &self.lines
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One entry per selected unit instance, in line order.
    pub fn unit_instances(&self) -> Vec<UnitInstance> {
        self.lines
            .iter()
            .flat_map(|line| {
                (0..line.quantity).map(move |_| UnitInstance {
                    unit_id: line.unit_id.clone(),
                    label: line.label.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Selection cap exceeded: requested {requested}, available {available}")]
    CapacityExceeded { requested: u32, available: u32 },

    #[error("Unit not in cart: {0}")]
    UnknownUnit(String),
}
