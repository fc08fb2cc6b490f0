//! # Matching Core
//!
//! An in-memory, multi-symbol equity matching engine: price-time priority
//! limit order books, optimistic lock-free commits, and a trade journal.
//!
//! ## Design
//!
//! - **Price-time priority.** Bids are kept `(price DESC, arrival ASC)`,
//!   asks `(price ASC, arrival ASC)`. Each price level is its own FIFO, so
//!   matching never has to re-sort a level on insert.
//! - **Optimistic concurrency.** A matching pass reads a consistent
//!   snapshot of both book heads, plans its fills without mutating
//!   anything, then publishes them in one step behind a single
//!   compare-and-swap on the book's version counter. A lost race is not an
//!   error: the caller's matching pass simply retries against a fresh
//!   snapshot.
//! - **Multi-symbol.** One [`Engine`] owns one book per symbol; symbols are
//!   assigned a dense index on first use and never reassigned.
//!
//! ## Example
//!
//! ```
//! use matching_core::prelude::*;
//!
//! let engine = Engine::new(EngineConfig::default());
//! engine.submit(Side::Sell, "AAPL", 10, 100).unwrap();
//! let order_id = engine.submit(Side::Buy, "AAPL", 10, 100).unwrap();
//! assert_eq!(engine.journal_snapshot().len(), 1);
//! let _ = order_id;
//! ```

pub mod engine;
pub mod prelude;
mod utils;

pub use engine::{Engine, EngineConfig, EngineError, Order, OrderId, Price, Side, SymbolIndex, Trade};
