//! The quote book
//!
//! Owns both ordered sides, a capped trade-tick history, a capped ring of
//! recently removed entries, per-side volume counters, and last-received
//! tracking. Implements the exchange modification rules: reducing size at the
//! same price keeps queue position, raising size or changing price forfeits
//! it, and a zero-quantity re-issue removes the resting entry.

use std::collections::VecDeque;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;
use types::ids::EntryId;
use types::quote::{BookEntry, Side, TradeTick};

use super::side::OrderedBookSide;

const MAX_TRADE_TICKS: usize = 50;
const MAX_REMOVED_ENTRIES: usize = 50;

/// Best resting entry on each side; either may be absent
#[derive(Debug, Clone, Default)]
pub struct TopOfBook {
    pub bid: Option<BookEntry>,
    pub ask: Option<BookEntry>,
}

#[derive(Debug, Clone)]
pub struct QuoteBook {
    bids: OrderedBookSide,
    asks: OrderedBookSide,
    ticks: VecDeque<TradeTick>,
    removed: VecDeque<BookEntry>,
    bid_volume: i64,
    ask_volume: i64,
    last_bid: Option<BookEntry>,
    last_ask: Option<BookEntry>,
    last_non_simulated: Option<BookEntry>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self {
            bids: OrderedBookSide::new(Side::Bid),
            asks: OrderedBookSide::new(Side::Ask),
            ticks: VecDeque::new(),
            removed: VecDeque::new(),
            bid_volume: 0,
            ask_volume: 0,
            last_bid: None,
            last_ask: None,
            last_non_simulated: None,
        }
    }

    pub fn add_bid(&mut self, bid: BookEntry) {
        debug_assert_eq!(bid.side, Side::Bid);
        self.add_entry(bid);
    }

    pub fn add_ask(&mut self, ask: BookEntry) {
        debug_assert_eq!(ask.side, Side::Ask);
        self.add_entry(ask);
    }

    fn add_entry(&mut self, entry: BookEntry) {
        // Last-received pointers only advance; an out-of-order (older) event
        // must never retroactively rewrite them.
        let last = match entry.side {
            Side::Bid => &mut self.last_bid,
            Side::Ask => &mut self.last_ask,
        };
        if last.as_ref().map_or(true, |prev| entry.timestamp >= prev.timestamp) {
            *last = Some(entry.clone());
            if !entry.simulated {
                self.last_non_simulated = Some(entry.clone());
            }
        }

        let mut evicted = None;
        {
            let (book, volume) = match entry.side {
                Side::Bid => (&mut self.bids, &mut self.bid_volume),
                Side::Ask => (&mut self.asks, &mut self.ask_volume),
            };

            if entry.remaining_quantity == 0 {
                match book.remove(&entry.id) {
                    Some(removed) => {
                        *volume -= removed.remaining_quantity;
                        evicted = Some(removed);
                    }
                    None => warn!(
                        "Failed to remove {:?} with id {} (simulated: {})",
                        entry.side, entry.id, entry.simulated
                    ),
                }
            } else if let Some(existing) = book.get(&entry.id).cloned() {
                *volume += entry.remaining_quantity - existing.remaining_quantity;
                // A price change or a size increase re-times the entry; any
                // other modification keeps its place in the queue.
                let keeps_priority = existing.price == entry.price
                    && entry.original_quantity <= existing.original_quantity;
                let effective_time = if keeps_priority {
                    book.effective_time(&entry.id).unwrap_or(existing.timestamp)
                } else {
                    entry.timestamp
                };
                book.upsert(entry, effective_time);
            } else {
                *volume += entry.remaining_quantity;
                let effective_time = entry.insertion_timestamp.unwrap_or(entry.timestamp);
                book.upsert(entry, effective_time);
            }
        }

        if let Some(removed) = evicted {
            self.push_removed(removed);
        }
    }

    fn push_removed(&mut self, entry: BookEntry) {
        if self.removed.len() == MAX_REMOVED_ENTRIES {
            self.removed.pop_front();
        }
        self.removed.push_back(entry);
    }

    /// Find a removed entry in the bounded ring
    ///
    /// A miss is a diagnostic, not an error: the ring is bounded and old
    /// entries are silently evicted.
    pub fn removed_entry(&self, id: &EntryId) -> Option<&BookEntry> {
        let found = self.removed.iter().find(|entry| &entry.id == id);
        if found.is_none() {
            warn!("Cannot find entry id {id} in the removed-entry ring");
        }
        found
    }

    pub fn add_trade_tick(&mut self, tick: TradeTick) {
        self.ticks.push_back(tick);
        if self.ticks.len() > MAX_TRADE_TICKS {
            self.ticks.pop_front();
        }
    }

    pub fn trades(&self) -> impl Iterator<Item = &TradeTick> {
        self.ticks.iter()
    }

    pub fn top_of_book(&self) -> TopOfBook {
        TopOfBook {
            bid: self.bids.first().cloned(),
            ask: self.asks.first().cloned(),
        }
    }

    /// Best ask minus best bid; absent when either side is empty
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.bids.first()?;
        let ask = self.asks.first()?;
        Some(ask.price.as_decimal() - bid.price.as_decimal())
    }

    /// Best bid plus half the spread, the half-spread rounded up at 4 dp;
    /// absent when either side is empty
    pub fn midpoint(&self) -> Option<Decimal> {
        let bid = self.bids.first()?.price.as_decimal();
        let half_spread = (self.spread()? / Decimal::TWO)
            .round_dp_with_strategy(4, RoundingStrategy::ToPositiveInfinity);
        Some(bid + half_spread)
    }

    pub fn bid_volume(&self) -> i64 {
        self.bid_volume
    }

    pub fn ask_volume(&self) -> i64 {
        self.ask_volume
    }

    /// Look up a resting entry by identity on either side
    pub fn entry_by_id(&self, id: &EntryId) -> Option<&BookEntry> {
        self.bids.get(id).or_else(|| self.asks.get(id))
    }

    /// The ranking time in force for a resting entry
    pub fn effective_time(&self, side: Side, id: &EntryId) -> Option<i64> {
        match side {
            Side::Bid => self.bids.effective_time(id),
            Side::Ask => self.asks.effective_time(id),
        }
    }

    /// Top of the side opposite an incoming entry's side
    pub fn opposite_top(&self, side: Side) -> Option<&BookEntry> {
        match side {
            Side::Ask => self.bids.first(),
            Side::Bid => self.asks.first(),
        }
    }

    /// Top of the same side as an incoming entry's side
    pub fn same_side_top(&self, side: Side) -> Option<&BookEntry> {
        match side {
            Side::Ask => self.asks.first(),
            Side::Bid => self.bids.first(),
        }
    }

    /// All bids in rank order (best first)
    pub fn bids(&self) -> Vec<BookEntry> {
        self.bids.iter().cloned().collect()
    }

    /// All asks in rank order (best first)
    pub fn asks(&self) -> Vec<BookEntry> {
        self.asks.iter().cloned().collect()
    }

    pub fn simulated_bids(&self) -> Vec<BookEntry> {
        self.bids.iter().filter(|e| e.simulated).cloned().collect()
    }

    pub fn simulated_asks(&self) -> Vec<BookEntry> {
        self.asks.iter().filter(|e| e.simulated).cloned().collect()
    }

    /// Bump a resting real entry's consumed (dirty) quantity in place
    pub fn mark_dirty(&mut self, side: Side, id: &EntryId, delta: i64) -> bool {
        let marked = match side {
            Side::Bid => self.bids.mark_dirty(id, delta),
            Side::Ask => self.asks.mark_dirty(id, delta),
        };
        if !marked {
            warn!("Cannot mark dirty quantity, no {side:?} entry with id {id}");
        }
        marked
    }

    /// The most recent non-simulated entry on either side
    pub fn last_received_non_simulated(&self) -> Option<&BookEntry> {
        self.last_non_simulated.as_ref()
    }

    pub fn last_received_bid(&self) -> Option<&BookEntry> {
        self.last_bid.as_ref()
    }

    pub fn last_received_ask(&self) -> Option<&BookEntry> {
        self.last_ask.as_ref()
    }

    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.ticks.clear();
        self.removed.clear();
        self.bid_volume = 0;
        self.ask_volume = 0;
        self.last_bid = None;
        self.last_ask = None;
        self.last_non_simulated = None;
    }
}

impl Default for QuoteBook {
    fn default() -> Self {
        Self::new()
    }
}
