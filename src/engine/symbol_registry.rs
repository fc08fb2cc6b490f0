//! Ticker-symbol to dense-index assignment.
//!
//! Two concurrent maps rather than one `DashMap<String, (SymbolIndex,
//! String)>`, since the reverse direction (index to symbol) is keyed
//! completely differently from the forward one.

use dashmap::DashMap;
use std::sync::Mutex;

use crate::engine::error::EngineError;
use crate::engine::order::SymbolIndex;
use crate::utils::lock_or_abort;

/// Assigns each distinct ticker symbol a stable `[0, max_symbols)` index on
/// first submission, grows no further once full, and never reassigns or
/// frees an index once given out.
#[derive(Debug)]
pub(crate) struct SymbolRegistry {
    forward: DashMap<String, SymbolIndex>,
    reverse: DashMap<u32, String>,
    next_free: Mutex<u32>,
    max_symbols: u32,
}

impl SymbolRegistry {
    pub(crate) fn new(max_symbols: u32) -> Self {
        Self {
            forward: DashMap::new(),
            reverse: DashMap::new(),
            next_free: Mutex::new(0),
            max_symbols,
        }
    }

    /// Returns the symbol's index, assigning the next free one the first
    /// time this symbol is seen. Concurrent first-sightings of the same
    /// symbol all converge on one index: the slow path re-checks `forward`
    /// under the cursor lock before consuming a slot.
    pub(crate) fn index_of(&self, symbol: &str) -> Result<SymbolIndex, EngineError> {
        if let Some(index) = self.forward.get(symbol) {
            return Ok(*index);
        }

        let mut next_free = lock_or_abort(&self.next_free);
        if let Some(index) = self.forward.get(symbol) {
            return Ok(*index);
        }
        if *next_free >= self.max_symbols {
            return Err(EngineError::CapacityExceeded);
        }
        let index = SymbolIndex::new(*next_free);
        *next_free += 1;
        self.forward.insert(symbol.to_string(), index);
        self.reverse.insert(index.value(), symbol.to_string());
        tracing::debug!(symbol, index = index.value(), "symbol registered");
        Ok(index)
    }

    /// The symbol assigned to `index`, or `UnknownSymbol` if none was ever
    /// assigned.
    pub(crate) fn symbol_of(&self, index: SymbolIndex) -> Result<String, EngineError> {
        self.reverse
            .get(&index.value())
            .map(|entry| entry.clone())
            .ok_or(EngineError::UnknownSymbol { index })
    }
}
