//! Book entries and trade ticks
//!
//! A `BookEntry` is a value snapshot of one resting order on one side of the
//! book. The book is only ever updated by re-issuing a new snapshot under the
//! same identity; stored snapshots never change price or identity in place.

use crate::ids::{ClOrdId, EntryId, OrderId};
use crate::numeric::Price;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the book an entry rests on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// A snapshot of one order resting on the book
///
/// Real market entries carry `cl_ord_id: None` (ownership unknown) and a
/// source-assigned `EntryId::Market` tag. Simulated entries carry the owning
/// client order identity and an `EntryId::Simulated` id.
///
/// `dirty_quantity` is the portion of a real entry's displayed size already
/// consumed by earlier simulated fills, kept so the same displayed shares are
/// never filled twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    pub side: Side,
    pub id: EntryId,
    pub cl_ord_id: Option<ClOrdId>,
    pub symbol: String,
    pub remaining_quantity: i64,
    pub original_quantity: i64,
    pub price: Price,
    /// Arrival time of this snapshot, millis
    pub timestamp: i64,
    /// Explicit ranking time carried across a cancel-replace that retains
    /// time priority; honored only when the entry is first inserted
    pub insertion_timestamp: Option<i64>,
    pub simulated: bool,
    pub dirty_quantity: i64,
}

impl BookEntry {
    /// Create a real market entry (original quantity = displayed quantity)
    pub fn market(
        side: Side,
        id: impl Into<String>,
        symbol: impl Into<String>,
        quantity: i64,
        price: Price,
        timestamp: i64,
    ) -> Self {
        Self::market_with_original(side, id, symbol, quantity, price, timestamp, quantity)
    }

    /// Create a real market entry with an explicit original quantity
    pub fn market_with_original(
        side: Side,
        id: impl Into<String>,
        symbol: impl Into<String>,
        quantity: i64,
        price: Price,
        timestamp: i64,
        original_quantity: i64,
    ) -> Self {
        assert!(
            quantity >= 0 && original_quantity >= 0,
            "Quantity cannot be negative"
        );
        Self {
            side,
            id: EntryId::market(id),
            cl_ord_id: None,
            symbol: symbol.into(),
            remaining_quantity: quantity,
            original_quantity,
            price,
            timestamp,
            insertion_timestamp: None,
            simulated: false,
            dirty_quantity: 0,
        }
    }

    /// Create a simulated entry for a strategy order
    #[allow(clippy::too_many_arguments)]
    pub fn simulated(
        side: Side,
        cl_ord_id: ClOrdId,
        order_id: OrderId,
        symbol: impl Into<String>,
        quantity: i64,
        price: Price,
        timestamp: i64,
        original_quantity: i64,
    ) -> Self {
        assert!(
            quantity >= 0 && original_quantity >= 0,
            "Quantity cannot be negative"
        );
        Self {
            side,
            id: EntryId::Simulated(order_id),
            cl_ord_id: Some(cl_ord_id),
            symbol: symbol.into(),
            remaining_quantity: quantity,
            original_quantity,
            price,
            timestamp,
            insertion_timestamp: None,
            simulated: true,
            dirty_quantity: 0,
        }
    }

    /// Create the zero-quantity entry that removes a resting order
    pub fn cancel(
        side: Side,
        cl_ord_id: ClOrdId,
        id: EntryId,
        symbol: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            side,
            id,
            cl_ord_id: Some(cl_ord_id),
            symbol: symbol.into(),
            remaining_quantity: 0,
            original_quantity: 0,
            price: Price::ZERO,
            timestamp,
            insertion_timestamp: None,
            simulated: true,
            dirty_quantity: 0,
        }
    }

    /// Quantity filled so far
    pub fn filled_quantity(&self) -> i64 {
        self.original_quantity - self.remaining_quantity
    }

    /// Price zero marks a market order
    pub fn is_market_order(&self) -> bool {
        self.price.is_zero()
    }
}

impl fmt::Display for BookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} [id={}, simulated={}, price={}, size={}, dirty={}, symbol={}, ts={}]",
            self.side,
            self.id,
            self.simulated,
            self.price,
            self.remaining_quantity,
            self.dirty_quantity,
            self.symbol,
            self.timestamp,
        )
    }
}

/// An anonymous trade print from the quote source
///
/// Ticks carry no identity; they correlate to book entries only through
/// price, timestamp, and book-emptying heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTick {
    pub symbol: String,
    pub size: i64,
    pub price: Price,
    /// Event time, millis
    pub timestamp: i64,
}

impl TradeTick {
    pub fn new(symbol: impl Into<String>, size: i64, price: Price, timestamp: i64) -> Self {
        Self {
            symbol: symbol.into(),
            size,
            price,
            timestamp,
        }
    }

    /// Header matching the `Display` record form
    pub fn csv_header() -> &'static str {
        "Date,Time,Price,Volume"
    }
}

impl fmt::Display for TradeTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_millis(self.timestamp) {
            Some(dt) => write!(
                f,
                "{},{},{},{}",
                dt.format("%Y%m%d"),
                dt.format("%H:%M:%S"),
                self.price,
                self.size
            ),
            None => write!(f, "?,?,{},{}", self.price, self.size),
        }
    }
}
