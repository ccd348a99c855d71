use thiserror::Error;

use crate::orders::{OrderId, Quantity};

/// The only error the engine can raise. Every other invalid input (duplicate id,
/// unknown id, an unfillable FillAndKill) is handled as an empty, idempotent result
/// rather than an exception — see the book facade in `orderbook.rs`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("order {order_id} cannot fill {requested} unit(s), only {remaining} remain")]
    FillOverflow {
        order_id: OrderId,
        remaining: Quantity,
        requested: Quantity,
    },
}
