//! Engine error types.
//!
//! A hand-written enum with a manual `Display` implementation rather than
//! a `thiserror` derive.

use std::fmt;

use crate::engine::order::SymbolIndex;

/// Errors surfaced by the public engine operations.
///
/// `VersionStale`, the matching engine's internal optimistic-concurrency
/// signal, is deliberately not a variant here: it never escalates past
/// the matching loop that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// One of `submit`'s preconditions failed. No state was mutated.
    InvalidInput {
        /// Human-readable description of which precondition failed.
        reason: String,
    },

    /// The symbol registry has no free slot left for a new symbol.
    CapacityExceeded,

    /// A reverse lookup (`symbol_of`) was given an index with no assigned
    /// symbol. Never returned by `submit`, which auto-assigns.
    UnknownSymbol {
        /// The index that had no associated symbol.
        index: SymbolIndex,
    },
}

impl EngineError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            EngineError::CapacityExceeded => {
                write!(f, "symbol registry capacity exceeded: no free slot")
            }
            EngineError::UnknownSymbol { index } => {
                write!(f, "no symbol assigned to index {}", index.value())
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Internal optimistic-concurrency signal: the book's version changed
/// between snapshot and commit. Never surfaced to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VersionStale;
