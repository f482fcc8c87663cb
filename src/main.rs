//! Dense Book - demo binary
//!
//! Builds a small crossed book, prints every view, runs the analytics and
//! compacts the result into a transfer snapshot.
//!
//! Logging is controlled through `RUST_LOG` (default `dense_book=info`).

use dense_book::{Analytics, BookConfig, BookRead, Level, OrderBook, Side, View};
use tracing_subscriber::EnvFilter;

fn main() -> dense_book::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dense_book=info")),
        )
        .init();

    println!("===========================================");
    println!("  Dense Book");
    println!("===========================================");
    println!();

    // Prices in cents
    let mut book = OrderBook::with_config(BookConfig::new(8).with_price_scale(2))?;
    book.insert(Side::Bid, Level::new(10_100, 10, 1, 1))?;
    book.insert(Side::Bid, Level::new(10_000, 10, 2, 2))?;
    book.insert(Side::Bid, Level::new(10_000, 5, 3, 3))?;
    book.insert(Side::Bid, Level::new(9_900, 20, 4, 4))?;
    book.insert(Side::Ask, Level::new(10_050, 7, 5, 5))?;
    book.insert(Side::Ask, Level::new(10_200, 12, 6, 6))?;
    book.uncross();

    for view in View::ALL {
        for side in Side::BOTH {
            print!("{}", book.dump(side, view));
        }
        println!();
    }

    println!("Analytics:");
    for view in View::ALL {
        println!(
            "  {:<9} mid={:?} spread={:?} imbalance={:?} crossed={}",
            view.label(),
            book.midpoint(view),
            book.spread(view),
            book.imbalance(view),
            book.is_crossed(view)
        );
    }
    println!();

    let snapshot = book.snapshot()?;
    let bytes = snapshot.to_bytes()?;
    println!("Snapshot:");
    println!("  Capacity: {} -> {}", book.capacity(), snapshot.capacity);
    println!(
        "  Cells:    {} -> {}",
        book.cells().len(),
        snapshot.cells.len()
    );
    println!("  Bytes:    {}", bytes.len());
    println!("  Digest:   {}", snapshot.digest_hex());

    Ok(())
}
