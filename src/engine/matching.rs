//! The cross-book matching algorithm.

use std::collections::HashMap;
use std::sync::Arc;

use crossbeam_skiplist::map::Entry;

use crate::engine::book::{Mutation, OrderBook};
use crate::engine::order::{OrderId, Price, Side, SymbolIndex};
use crate::engine::price_level::{OrderSlot, PriceLevel};
use crate::engine::trade::Trade;
use crate::utils::MonotonicClock;

/// Walks one side of the book level by level, lazily cloning each level's
/// resting orders into a small local buffer as it's reached. Bounded to
/// the levels the matching pass actually visits — it never scans the
/// whole book. Generic over the
/// underlying map iterator so the same cursor drives both the ascending
/// ask walk and the reversed (descending) bid walk.
struct SideCursor<'a, I: Iterator<Item = Entry<'a, Price, Arc<PriceLevel>>>> {
    levels: I,
    current_price: Option<Price>,
    current_orders: Vec<Arc<OrderSlot>>,
    pos: usize,
}

impl<'a, I: Iterator<Item = Entry<'a, Price, Arc<PriceLevel>>>> SideCursor<'a, I> {
    fn new(levels: I) -> Self {
        Self {
            levels,
            current_price: None,
            current_orders: Vec::new(),
            pos: 0,
        }
    }

    /// The next order that still has quantity left after accounting for
    /// fills already planned earlier in this same pass, or `None` if the
    /// side is exhausted.
    fn current(&mut self, planned: &HashMap<OrderId, u64>) -> Option<(Price, Arc<OrderSlot>)> {
        loop {
            if self.pos < self.current_orders.len() {
                let slot = self.current_orders[self.pos].clone();
                let already_planned = planned.get(&slot.order.id).copied().unwrap_or(0);
                let effective_remaining = slot.remaining_qty().saturating_sub(already_planned);
                if effective_remaining == 0 || !slot.is_active() {
                    self.pos += 1;
                    continue;
                }
                return Some((self.current_price.expect("set alongside current_orders"), slot));
            }
            match self.levels.next() {
                Some(entry) => {
                    self.current_price = Some(*entry.key());
                    self.current_orders = entry.value().snapshot_orders();
                    self.pos = 0;
                }
                None => return None,
            }
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

fn effective_remaining(slot: &OrderSlot, planned: &HashMap<OrderId, u64>) -> u64 {
    let already_planned = planned.get(&slot.order.id).copied().unwrap_or(0);
    slot.remaining_qty().saturating_sub(already_planned)
}

/// One attempt at crossing a book: walk both tops while they cross,
/// accumulating trades and per-order fills without mutating anything.
fn plan_matches(book: &OrderBook, symbol: SymbolIndex, ts_source: &MonotonicClock) -> (Vec<Trade>, Vec<Mutation>) {
    let mut bid_cursor = SideCursor::new(book.bids.iter().rev());
    let mut ask_cursor = SideCursor::new(book.asks.iter());
    let mut planned: HashMap<OrderId, u64> = HashMap::new();
    let mut trades = Vec::new();
    let mut fills: HashMap<OrderId, Mutation> = HashMap::new();

    loop {
        let Some((bid_price, bid_slot)) = bid_cursor.current(&planned) else {
            break;
        };
        let Some((ask_price, ask_slot)) = ask_cursor.current(&planned) else {
            break;
        };
        if bid_price < ask_price {
            break;
        }

        let bid_remaining = effective_remaining(&bid_slot, &planned);
        let ask_remaining = effective_remaining(&ask_slot, &planned);
        let qty = bid_remaining.min(ask_remaining);

        // The resting counterparty is whichever side arrived first; this
        // generalizes "use the resting order's price" (see DESIGN.md) to
        // the case where neither book head is known in advance to be
        // "the" resting side.
        let trade_price = if bid_slot.order.arrival_ts <= ask_slot.order.arrival_ts {
            bid_slot.order.price
        } else {
            ask_slot.order.price
        };

        trades.push(Trade {
            buy_id: bid_slot.order.id,
            sell_id: ask_slot.order.id,
            symbol,
            qty,
            price: trade_price,
            ts: ts_source.tick(),
        });

        *planned.entry(bid_slot.order.id).or_insert(0) += qty;
        *planned.entry(ask_slot.order.id).or_insert(0) += qty;

        record_fill(&mut fills, &bid_slot, qty, Side::Buy, bid_price);
        record_fill(&mut fills, &ask_slot, qty, Side::Sell, ask_price);

        if bid_remaining == qty {
            bid_cursor.advance();
        }
        if ask_remaining == qty {
            ask_cursor.advance();
        }
    }

    (trades, fills.into_values().collect())
}

fn record_fill(
    fills: &mut HashMap<OrderId, Mutation>,
    slot: &Arc<OrderSlot>,
    qty: u64,
    side: Side,
    price: Price,
) {
    fills
        .entry(slot.order.id)
        .and_modify(|m| m.fill_qty += qty)
        .or_insert_with(|| Mutation {
            slot: slot.clone(),
            fill_qty: qty,
            side,
            price,
        });
}

impl OrderBook {
    /// Repeatedly crosses the best bid against the best ask until the
    /// spread opens, committing atomically via the version counter.
    /// Retries on a lost commit race up to `max_retries` times; exhausting
    /// the retry budget is not an error — it simply
    /// returns whatever was committed on prior iterations of *this* call,
    /// which in practice means an empty list if nothing ever committed.
    pub(crate) fn match_orders(
        &self,
        symbol: SymbolIndex,
        ts_source: &MonotonicClock,
        max_retries: u32,
    ) -> Vec<Trade> {
        for attempt in 0..max_retries {
            let heads = self.snapshot_heads();
            let (Some(_), Some(_)) = (heads.best_bid, heads.best_ask) else {
                return Vec::new();
            };

            let (trades, mutations) = plan_matches(self, symbol, ts_source);
            if trades.is_empty() {
                return Vec::new();
            }

            match self.commit_match(heads.version, &mutations) {
                Ok(()) => {
                    tracing::debug!(
                        symbol = symbol.value(),
                        trades = trades.len(),
                        attempt,
                        "matching pass committed"
                    );
                    return trades;
                }
                Err(_stale) => {
                    tracing::trace!(symbol = symbol.value(), attempt, "matching commit lost race, retrying");
                    continue;
                }
            }
        }

        tracing::warn!(
            symbol = symbol.value(),
            max_retries,
            "matching retry budget exhausted without a commit"
        );
        Vec::new()
    }
}
