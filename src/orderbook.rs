//! The book facade and matcher: the two heaviest components by spec weight.
//!
//! An [`OrderBook`] owns one [`Ladder`] per side plus an order index mapping
//! [`OrderId`] to the handle needed to erase it in O(1). Every mutating method
//! (`add`, `cancel`, `modify`) goes through this index first, then the ladders,
//! then — for `add` — the matcher.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::errors::EngineError;
use crate::ladder::{Handle, Ladder};
use crate::orders::{Order, OrderId, OrderModify, Price, Side, TimeInForce};
use crate::trade::{Fill, LevelInfo, Trade};

struct IndexEntry {
    side: Side,
    price: Price,
    handle: Handle,
}

/// A single symbol's matching engine: two ladders plus the index tying them together.
pub struct OrderBook {
    bids: Ladder,
    asks: Ladder,
    index: HashMap<OrderId, IndexEntry>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: Ladder::new(true),
            asks: Ladder::new(false),
            index: HashMap::new(),
        }
    }

    fn ladder(&self, side: Side) -> &Ladder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut Ladder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn opposite(side: Side) -> Side {
        match side {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Whether `order` could immediately cross into the opposite side at submission
    /// time. Used only to pre-empt hopeless FillAndKill orders before they're indexed.
    fn can_match(&self, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.asks.best_price().is_some_and(|best_ask| price >= best_ask),
            Side::Sell => self.bids.best_price().is_some_and(|best_bid| price <= best_bid),
        }
    }

    /// Inserts `order` and runs the matcher. Returns the trade log; empty means the
    /// order was rejected (duplicate id, unfillable FAK) or simply rested without crossing.
    pub fn add(&mut self, order: Order) -> Result<Vec<Trade>, EngineError> {
        if self.index.contains_key(&order.id()) {
            debug!(order_id = order.id(), "duplicate order id, rejecting");
            return Ok(Vec::new());
        }

        if order.tif() == TimeInForce::FillAndKill && !self.can_match(order.side(), order.price()) {
            debug!(order_id = order.id(), "FillAndKill with no cross, discarding");
            return Ok(Vec::new());
        }

        let side = order.side();
        let price = order.price();
        let id = order.id();
        let handle = self.ladder_mut(side).push_back(order);
        self.index.insert(id, IndexEntry { side, price, handle });

        self.match_orders()
    }

    /// Removes `id` from the index and its ladder, idempotently.
    pub fn cancel(&mut self, id: OrderId) {
        if let Some(entry) = self.index.remove(&id) {
            self.ladder_mut(entry.side).erase(entry.handle);
        }
    }

    /// Cancel-replace: carries the original time-in-force forward onto a fresh order
    /// with the modification's id/side/price/quantity, losing time priority.
    pub fn modify(&mut self, modification: OrderModify) -> Result<Vec<Trade>, EngineError> {
        let Some(entry) = self.index.get(&modification.id) else {
            return Ok(Vec::new());
        };
        let tif = self.ladder(entry.side).get(entry.handle).tif();
        self.cancel(modification.id);
        let replacement = Order::new(
            modification.id,
            modification.side,
            modification.price,
            tif,
            modification.quantity,
        );
        self.add(replacement)
    }

    /// Number of live orders currently indexed.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Whether `id` currently resolves to a live order.
    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    /// Aggregated depth per side, each in that side's priority order.
    pub fn depth(&self) -> (Vec<LevelInfo>, Vec<LevelInfo>) {
        (self.bids.depth(), self.asks.depth())
    }

    /// Crosses the tops of both ladders until no cross remains.
    fn match_orders(&mut self) -> Result<Vec<Trade>, EngineError> {
        let mut trades = Vec::new();

        loop {
            let (Some(best_bid), Some(best_ask)) = (self.bids.best_price(), self.asks.best_price())
            else {
                break;
            };
            if best_bid < best_ask {
                break;
            }

            while self.bids.has_level(best_bid) && self.asks.has_level(best_ask) {
                let bid_qty = self.bids.front(best_bid).unwrap().remaining_qty();
                let ask_qty = self.asks.front(best_ask).unwrap().remaining_qty();
                let qty = bid_qty.min(ask_qty);

                let bid = self.bids.front_mut(best_bid).unwrap();
                bid.fill(qty)?;
                let bid_id = bid.id();
                let bid_filled = bid.is_filled();

                let ask = self.asks.front_mut(best_ask).unwrap();
                ask.fill(qty)?;
                let ask_id = ask.id();
                let ask_filled = ask.is_filled();

                trace!(bid_id, ask_id, qty, "crossed");
                trades.push(Trade {
                    bid: Fill { order_id: bid_id, price: best_bid, quantity: qty },
                    ask: Fill { order_id: ask_id, price: best_ask, quantity: qty },
                });

                if bid_filled {
                    self.bids.pop_front(best_bid);
                    self.index.remove(&bid_id);
                }
                if ask_filled {
                    self.asks.pop_front(best_ask);
                    self.index.remove(&ask_id);
                }
            }
        }

        self.sweep_fak(Side::Buy);
        self.sweep_fak(Side::Sell);

        Ok(trades)
    }

    /// Cancels the resting front order at the book's current best price on `side` if
    /// it is a partially-filled FillAndKill. Safe to call after `match_orders` returns
    /// because no further matching is in progress.
    fn sweep_fak(&mut self, side: Side) {
        let Some(price) = self.ladder(side).best_price() else {
            return;
        };
        let Some(front) = self.ladder(side).front(price) else {
            return;
        };
        if front.tif() == TimeInForce::FillAndKill {
            let id = front.id();
            self.cancel(id);
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{Side::*, TimeInForce::*};

    fn order(id: OrderId, side: Side, price: Price, qty: u32, tif: crate::orders::TimeInForce) -> Order {
        Order::new(id, side, price, tif, qty)
    }

    #[test]
    fn simple_cross() {
        let mut book = OrderBook::new();
        let trades = book.add(order(1, Buy, 100, 10, GoodTillCancel)).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.size(), 1);

        let trades = book.add(order(2, Sell, 100, 10, GoodTillCancel)).unwrap();
        assert_eq!(trades, vec![Trade {
            bid: Fill { order_id: 1, price: 100, quantity: 10 },
            ask: Fill { order_id: 2, price: 100, quantity: 10 },
        }]);
        assert_eq!(book.size(), 0);
    }

    #[test]
    fn partial_fill_leaves_resting_remainder() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 100, 10, GoodTillCancel)).unwrap();
        let trades = book.add(order(2, Sell, 100, 4, GoodTillCancel)).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].bid.quantity, 4);
        assert_eq!(book.size(), 1);
        assert_eq!(book.depth().0, vec![LevelInfo { price: 100, quantity: 6 }]);
    }

    #[test]
    fn fifo_across_two_resting_bids() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 100, 5, GoodTillCancel)).unwrap();
        book.add(order(2, Buy, 100, 5, GoodTillCancel)).unwrap();
        let trades = book.add(order(3, Sell, 100, 6, GoodTillCancel)).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].bid.order_id, 1);
        assert_eq!(trades[0].bid.quantity, 5);
        assert_eq!(trades[1].bid.order_id, 2);
        assert_eq!(trades[1].bid.quantity, 1);
        assert_eq!(book.size(), 1);
        assert_eq!(book.depth().0, vec![LevelInfo { price: 100, quantity: 4 }]);
    }

    #[test]
    fn fill_and_kill_with_no_cross_is_discarded() {
        let mut book = OrderBook::new();
        let trades = book.add(order(1, Buy, 100, 10, FillAndKill)).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.size(), 0);
    }

    #[test]
    fn fill_and_kill_with_partial_cross_discards_remainder() {
        let mut book = OrderBook::new();
        book.add(order(1, Sell, 100, 10, GoodTillCancel)).unwrap();
        let trades = book.add(order(2, Buy, 100, 25, FillAndKill)).unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ask.quantity, 10);
        assert_eq!(book.size(), 0);
    }

    #[test]
    fn modify_loses_time_priority() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 100, 5, GoodTillCancel)).unwrap();
        book.add(order(2, Buy, 100, 5, GoodTillCancel)).unwrap();
        book.modify(OrderModify { id: 1, side: Buy, price: 100, quantity: 5 }).unwrap();
        let trades = book.add(order(3, Sell, 100, 6, GoodTillCancel)).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].bid.order_id, 2);
        assert_eq!(trades[0].bid.quantity, 5);
        assert_eq!(trades[1].bid.order_id, 1);
        assert_eq!(trades[1].bid.quantity, 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 100, 5, GoodTillCancel)).unwrap();
        book.cancel(1);
        book.cancel(1);
        assert_eq!(book.size(), 0);
        assert!(book.depth().0.is_empty());
    }

    #[test]
    fn add_duplicate_id_is_noop() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 100, 5, GoodTillCancel)).unwrap();
        let trades = book.add(order(1, Buy, 100, 5, GoodTillCancel)).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.size(), 1);
        assert_eq!(book.depth().0, vec![LevelInfo { price: 100, quantity: 5 }]);
    }

    #[test]
    fn execution_price_is_stamped_from_each_resting_side() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 105, 5, GoodTillCancel)).unwrap();
        let trades = book.add(order(2, Sell, 100, 5, GoodTillCancel)).unwrap();

        assert_eq!(trades[0].bid.price, 105);
        assert_eq!(trades[0].ask.price, 100);
    }

    #[test]
    fn best_bid_never_exceeds_best_ask_after_matching() {
        let mut book = OrderBook::new();
        book.add(order(1, Buy, 100, 5, GoodTillCancel)).unwrap();
        book.add(order(2, Sell, 102, 5, GoodTillCancel)).unwrap();
        assert!(book.bids.best_price().unwrap() < book.asks.best_price().unwrap());
    }
}
