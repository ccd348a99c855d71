//! The order record: the only mutable piece of state the matching engine owns.

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Tick-denominated price. Negative prices are permitted (e.g. funding-adjusted books).
pub type Price = i32;
/// Resting or incoming size, always non-negative.
pub type Quantity = u32;
/// Caller-assigned, globally unique within a single book.
pub type OrderId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Rests in the book until fully filled or explicitly cancelled.
    GoodTillCancel,
    /// Executes whatever it can immediately; any remainder is discarded.
    FillAndKill,
}

/// A resting or incoming order. Identity (`id`, `side`, `price`, `tif`) is fixed at
/// construction; only `remaining_qty` ever changes, and only through [`Order::fill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    side: Side,
    price: Price,
    tif: TimeInForce,
    initial_qty: Quantity,
    remaining_qty: Quantity,
}

impl Order {
    pub fn new(id: OrderId, side: Side, price: Price, tif: TimeInForce, quantity: Quantity) -> Self {
        Self {
            id,
            side,
            price,
            tif,
            initial_qty: quantity,
            remaining_qty: quantity,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn tif(&self) -> TimeInForce {
        self.tif
    }

    pub fn initial_qty(&self) -> Quantity {
        self.initial_qty
    }

    pub fn remaining_qty(&self) -> Quantity {
        self.remaining_qty
    }

    pub fn filled_qty(&self) -> Quantity {
        self.initial_qty - self.remaining_qty
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_qty == 0
    }

    /// Reduces `remaining_qty` by `qty`. The only mutation an `Order` permits.
    pub(crate) fn fill(&mut self, qty: Quantity) -> Result<(), EngineError> {
        if qty > self.remaining_qty {
            return Err(EngineError::FillOverflow {
                order_id: self.id,
                remaining: self.remaining_qty,
                requested: qty,
            });
        }
        self.remaining_qty -= qty;
        Ok(())
    }
}

/// A cancel-replace request: same semantics as a fresh `Add`, but the engine carries
/// the original order's time-in-force forward (see [`crate::orderbook::OrderBook::modify`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderModify {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}
