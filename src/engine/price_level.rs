//! A single price's FIFO of resting orders.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::order::Order;
use crate::utils::lock_or_abort;

/// An order resident in a book, with the mutable state a matching commit
/// publishes.
///
/// `remaining_qty` and `active` are atomics so that a reader (e.g. another
/// thread's matching pass building a snapshot) never needs to take a lock
/// to observe them, while the *write* to either only ever happens from
/// inside a successful [`OrderBook::commit_match`](crate::engine::book::OrderBook::commit_match) —
/// that method's own `commit_lock` is what serializes writers, not these
/// fields themselves.
#[derive(Debug)]
pub(crate) struct OrderSlot {
    pub(crate) order: Order,
    remaining_qty: AtomicU64,
    active: AtomicBool,
}

impl OrderSlot {
    pub(crate) fn new(order: Order, qty: u64) -> Arc<Self> {
        debug_assert!(qty > 0, "a slot is only ever created with a positive qty");
        Arc::new(Self {
            order,
            remaining_qty: AtomicU64::new(qty),
            active: AtomicBool::new(true),
        })
    }

    pub(crate) fn remaining_qty(&self) -> u64 {
        self.remaining_qty.load(Ordering::Acquire)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Publishes a fill decided by a committed matching pass.
    ///
    /// Only ever called from inside the owning book's `commit_lock`
    /// critical section, after the version check has already passed, so
    /// the `qty` here is guaranteed to match what was read when the
    /// matching pass computed it — no other writer could have intervened.
    pub(crate) fn apply_fill(&self, qty: u64) {
        let previous = self.remaining_qty.fetch_sub(qty, Ordering::AcqRel);
        debug_assert!(
            previous >= qty,
            "fill exceeds an order's remaining quantity"
        );
        if previous == qty {
            self.active.store(false, Ordering::Release);
        }
    }
}

/// All resting orders at one exact price on one side of a book, held in
/// arrival order. The `Mutex` guards only the FIFO's shape (push/pop),
/// never the order's quantity/active state above.
#[derive(Debug, Default)]
pub(crate) struct PriceLevel {
    orders: Mutex<VecDeque<Arc<OrderSlot>>>,
}

impl PriceLevel {
    pub(crate) fn new() -> Self {
        Self {
            orders: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push_back(&self, slot: Arc<OrderSlot>) {
        lock_or_abort(&self.orders).push_back(slot);
    }

    /// A cheap, consistent-at-this-instant copy of the resting orders
    /// (`Arc` clones only), used by the matching engine to walk a level
    /// without holding its lock across the whole pass.
    pub(crate) fn snapshot_orders(&self) -> Vec<Arc<OrderSlot>> {
        lock_or_abort(&self.orders).iter().cloned().collect()
    }

    /// Drops every inactive order from the FIFO: leading inactive orders
    /// are removed, and any inactive interior entries the matching pass
    /// encountered are spliced out too. Returns `true` if
    /// the level is now empty, so the caller can drop it from the book's
    /// skip list entirely.
    pub(crate) fn cleanup(&self) -> bool {
        let mut orders = lock_or_abort(&self.orders);
        orders.retain(|slot| slot.is_active());
        orders.is_empty()
    }
}
