//! One ordered side of the quote book
//!
//! An id→entry association ranked by the side's comparator. Bids rank by
//! price descending, asks by price ascending; within a price level the
//! effective time decides, and among equal times the insertion sequence.
//! Re-inserting under an existing identity reuses the original sequence, so
//! an update can never shuffle equal-ranked peers.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use types::ids::EntryId;
use types::numeric::Price;
use types::quote::{BookEntry, Side};

/// Ranking key for one resting entry
///
/// `price_key` is the price negated on the bid side so that the BTreeMap's
/// ascending order yields highest-bid/lowest-ask first on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    price_key: Decimal,
    effective_time: i64,
    sequence: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    rank: RankKey,
    entry: BookEntry,
}

/// One side of the book, ordered by (price direction, time, sequence)
#[derive(Debug, Clone)]
pub struct OrderedBookSide {
    side: Side,
    slots: HashMap<EntryId, Slot>,
    ranked: BTreeMap<RankKey, EntryId>,
    next_sequence: u64,
}

impl OrderedBookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            slots: HashMap::new(),
            ranked: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    fn price_key(&self, price: Price) -> Decimal {
        match self.side {
            Side::Bid => -price.as_decimal(),
            Side::Ask => price.as_decimal(),
        }
    }

    /// Insert or replace the entry stored under its identity
    ///
    /// `effective_time` is the ranking time, which the quote book may pin to
    /// an earlier value than the entry's own timestamp to retain priority.
    /// An update keeps the identity's original insertion sequence.
    pub fn upsert(&mut self, entry: BookEntry, effective_time: i64) {
        let sequence = match self.slots.remove(&entry.id) {
            Some(old) => {
                self.ranked.remove(&old.rank);
                old.rank.sequence
            }
            None => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                sequence
            }
        };
        let rank = RankKey {
            price_key: self.price_key(entry.price),
            effective_time,
            sequence,
        };
        self.ranked.insert(rank, entry.id.clone());
        self.slots.insert(entry.id.clone(), Slot { rank, entry });
    }

    /// Remove and return the entry stored under `id`
    pub fn remove(&mut self, id: &EntryId) -> Option<BookEntry> {
        let slot = self.slots.remove(id)?;
        self.ranked.remove(&slot.rank);
        Some(slot.entry)
    }

    pub fn get(&self, id: &EntryId) -> Option<&BookEntry> {
        self.slots.get(id).map(|slot| &slot.entry)
    }

    /// The ranking time currently in force for `id`
    pub fn effective_time(&self, id: &EntryId) -> Option<i64> {
        self.slots.get(id).map(|slot| slot.rank.effective_time)
    }

    /// Bump the stored entry's dirty quantity without re-ranking
    pub fn mark_dirty(&mut self, id: &EntryId, delta: i64) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => {
                slot.entry.dirty_quantity += delta;
                true
            }
            None => false,
        }
    }

    /// The comparator-first entry (best price, earliest time)
    pub fn first(&self) -> Option<&BookEntry> {
        self.ranked
            .values()
            .next()
            .map(|id| &self.slots[id].entry)
    }

    /// All entries in rank order
    pub fn iter(&self) -> impl Iterator<Item = &BookEntry> {
        self.ranked.values().map(|id| &self.slots[id].entry)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.ranked.clear();
        self.next_sequence = 0;
    }
}
