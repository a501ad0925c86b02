pub mod cart;
pub mod pricing;

pub use cart::{CartError, InventoryLine, SelectionCart, UnitInstance, MAX_UNITS};
pub use pricing::{cart_total, line_total, nights_between};
