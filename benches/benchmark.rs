use criterion::{Criterion, criterion_group, criterion_main};
use lob_engine::orderbook::OrderBook;
use lob_engine::orders::{Order, Side, TimeInForce};

/// Asks rest on the positive side of the price axis, bids on the negative side, so
/// populating the book never itself triggers a cross.
fn setup_order_book(depth: i32, orders_per_level: u64) -> OrderBook {
    let mut book = OrderBook::new();
    for price in 1..=depth {
        for i in 0..orders_per_level {
            book.add(Order::new(
                (price as u64) * 1_000 + i,
                Side::Sell,
                price,
                TimeInForce::GoodTillCancel,
                1,
            ))
            .unwrap();
            book.add(Order::new(
                (depth as u64 + price as u64) * 1_000 + i,
                Side::Buy,
                -price,
                TimeInForce::GoodTillCancel,
                1,
            ))
            .unwrap();
        }
    }
    book
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("cross a resting ladder with one aggressive buy", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut book| {
                book.add(Order::new(
                    0,
                    Side::Buy,
                    depth,
                    TimeInForce::GoodTillCancel,
                    (depth as u32) * (orders_per_level as u32) / 2,
                ))
                .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("cancel from a deep resting ladder", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut book| {
                book.cancel(1_000);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);
