//! Local, single-process commands that exercise the facade directly against an
//! ephemeral book, for manual testing without standing up a server.

use crate::{
    orderbook::OrderBook,
    orders::{Order, OrderModify, Side, TimeInForce},
};

pub fn parse_side(raw: &str) -> Option<Side> {
    match raw {
        "buy" => Some(Side::Buy),
        "sell" => Some(Side::Sell),
        _ => None,
    }
}

pub fn parse_tif(raw: &str) -> Option<TimeInForce> {
    match raw {
        "gtc" => Some(TimeInForce::GoodTillCancel),
        "fak" => Some(TimeInForce::FillAndKill),
        _ => None,
    }
}

pub fn handle_add(book: &mut OrderBook, id: u64, side: Side, price: i32, quantity: u32, tif: TimeInForce) {
    let order = Order::new(id, side, price, tif, quantity);
    match book.add(order) {
        Ok(trades) if trades.is_empty() => println!("order {id} added, no trades"),
        Ok(trades) => {
            println!("order {id} added, {} trade(s):", trades.len());
            for trade in trades {
                println!("{trade:?}");
            }
        }
        Err(e) => println!("order {id} rejected: {e}"),
    }
}

pub fn handle_cancel(book: &mut OrderBook, id: u64) {
    if book.contains(id) {
        book.cancel(id);
        println!("order {id} cancelled");
    } else {
        println!("order {id} not found");
    }
}

pub fn handle_modify(book: &mut OrderBook, id: u64, side: Side, price: i32, quantity: u32) {
    match book.modify(OrderModify { id, side, price, quantity }) {
        Ok(trades) => println!("order {id} modified, {} trade(s)", trades.len()),
        Err(e) => println!("modify of {id} rejected: {e}"),
    }
}

pub fn print_book(book: &OrderBook) {
    let (bids, asks) = book.depth();
    println!("------ bids (best first) ------");
    for level in bids {
        println!("{:>8}  {:>8}", level.price, level.quantity);
    }
    println!("------ asks (best first) ------");
    for level in asks {
        println!("{:>8}  {:>8}", level.price, level.quantity);
    }
}

pub fn print_size(book: &OrderBook) {
    println!("size: {}", book.size());
}
