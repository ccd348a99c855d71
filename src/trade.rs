use serde::{Deserialize, Serialize};

use crate::orders::{OrderId, Price, Quantity};

/// One side's leg of a trade: the resting price it executed at is preserved even
/// when the incoming aggressor's limit was more generous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

/// A matched pair of fills produced by crossing a resting bid against a resting ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub bid: Fill,
    pub ask: Fill,
}

/// Aggregated depth at one price: the sum of `remaining_qty` across every order resting there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}
