//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the matching-core crate. Instead of importing each type
//! individually, you can use:
//!
//! ```rust
//! use matching_core::prelude::*;
//! ```

// Engine entry point and its configuration
pub use crate::engine::{Engine, EngineConfig};

// Error type
pub use crate::engine::EngineError;

// Order and trade types
pub use crate::engine::{Order, OrderId, Price, Side, SymbolIndex, Trade};
