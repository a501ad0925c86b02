use soltur_core::StayInterval;

use crate::cart::{InventoryLine, SelectionCart};

/// Number of billable nights in a stay. Intervals are validated at
/// construction, so this is always >= 1.
pub fn nights_between(interval: &StayInterval) -> i64 {
    interval.nights()
}

/// Total for one line over the stay, in minor currency units.
pub fn line_total(line: &InventoryLine, nights: i64) -> i64 {
    line.unit_price * i64::from(line.quantity) * nights
}

/// Total for the whole selection over the stay. Exact integer arithmetic;
/// display rounding is a presentation concern.
pub fn cart_total(cart: &SelectionCart, nights: i64) -> i64 {
    cart.lines().iter().map(|line| line_total(line, nights)).sum()
}
