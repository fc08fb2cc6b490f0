//! The engine's public entry point.

use crate::engine::book::OrderBook;
use crate::engine::error::EngineError;
use crate::engine::id_generator::IdGenerator;
use crate::engine::journal::TradeJournal;
use crate::engine::order::{Order, OrderId, Price, Side, SymbolIndex};
use crate::engine::symbol_registry::SymbolRegistry;
use crate::engine::trade::Trade;
use crate::utils::MonotonicClock;

/// Bounds and tunables for one [`Engine`] instance.
///
/// Constructed explicitly by the caller rather than read from a global:
/// engine-wide configuration (symbol table size, retry budget) is a
/// constructor parameter, not ambient state reached for via a
/// `lazy_static!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on the number of distinct symbols the engine will ever
    /// assign an index to. `submit` fails with [`EngineError::CapacityExceeded`]
    /// once this is exhausted.
    pub max_symbols: u32,
    /// How many times a single matching pass will retry a lost version-CAS
    /// race before giving up silently.
    pub max_match_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_symbols: 1024,
            max_match_retries: 10,
        }
    }
}

/// A complete in-memory, multi-symbol matching engine.
///
/// One `Engine` owns one symbol table and one order book per symbol slot;
/// all of its public methods are safe to call concurrently from any number
/// of threads.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    symbols: SymbolRegistry,
    ids: IdGenerator,
    clock: MonotonicClock,
    journal: TradeJournal,
    books: Box<[OrderBook]>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let books = (0..config.max_symbols)
            .map(|_| OrderBook::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            config,
            symbols: SymbolRegistry::new(config.max_symbols),
            ids: IdGenerator::new(),
            clock: MonotonicClock::new(),
            journal: TradeJournal::new(),
            books,
        }
    }

    /// Validates and inserts a new limit order, then runs one matching pass
    /// against the book it landed in.
    ///
    /// Returns the id assigned to the order. The order may have been fully
    /// or partially filled by the time this returns; whatever is left rests
    /// in the book. Trades produced, if any, are appended to the journal
    /// before this returns: matching happens synchronously with
    /// submission.
    pub fn submit(&self, side: Side, symbol: &str, qty: u64, price: u64) -> Result<OrderId, EngineError> {
        if symbol.trim().is_empty() {
            return Err(EngineError::invalid("symbol must not be empty"));
        }
        if qty == 0 {
            return Err(EngineError::invalid("quantity must be strictly positive"));
        }
        let price = Price::new(price)?;

        let symbol_index = self.symbols.index_of(symbol)?;
        let order = Order {
            id: self.ids.next_id(),
            side,
            symbol: symbol_index,
            price,
            arrival_ts: self.clock.tick(),
        };
        tracing::trace!(
            id = order.id,
            side = %side,
            symbol,
            qty,
            price = price.ticks(),
            "order accepted"
        );
        let book = &self.books[symbol_index.value() as usize];
        book.insert(order, qty);

        self.run_match(symbol_index);
        Ok(order.id)
    }

    /// Re-runs the matching pass for a symbol without submitting a new
    /// order. Exposed so a caller can force a match attempt after, e.g.,
    /// cancelling an order that was blocking the spread: a matching pass
    /// can be triggered by any book-crossing event, not submission alone.
    pub fn match_symbol(&self, symbol_index: SymbolIndex) -> Vec<Trade> {
        self.run_match(symbol_index)
    }

    fn run_match(&self, symbol_index: SymbolIndex) -> Vec<Trade> {
        let book = &self.books[symbol_index.value() as usize];
        let trades = book.match_orders(symbol_index, &self.clock, self.config.max_match_retries);
        self.journal.append(&trades);
        trades
    }

    /// Every trade the engine has ever committed, across all symbols, in
    /// commit order.
    pub fn journal_snapshot(&self) -> Vec<Trade> {
        self.journal.snapshot()
    }

    pub fn symbol_of(&self, index: SymbolIndex) -> Result<String, EngineError> {
        self.symbols.symbol_of(index)
    }

    pub fn index_of(&self, symbol: &str) -> Result<SymbolIndex, EngineError> {
        self.symbols.index_of(symbol)
    }
}
