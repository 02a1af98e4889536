//! Order specification and lifecycle types

use crate::quote::Side;
use crate::trade::Fill;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a strategy order
///
/// SELL closes long inventory; SHORT opens negative inventory. The long-sale
/// validation in the market distinguishes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
    Cover,
    Short,
}

impl TradeSide {
    /// The side of the book an order with this direction rests on
    pub fn book_side(&self) -> Side {
        match self {
            TradeSide::Buy | TradeSide::Cover => Side::Bid,
            TradeSide::Sell | TradeSide::Short => Side::Ask,
        }
    }

    pub fn is_on_same_side_of_book(&self, side: Side) -> bool {
        self.book_side() == side
    }
}

/// Order lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted, no fills yet
    New,
    /// Some quantity filled, some open
    PartiallyFilled,
    /// Fully filled (terminal)
    Completed,
    /// Canceled by the strategy (terminal)
    Canceled,
    /// Superseded by a cancel-replace (terminal)
    Replaced,
    /// Failed validation (terminal)
    Rejected,
}

impl OrderStatus {
    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Canceled
                | OrderStatus::Replaced
                | OrderStatus::Rejected
        )
    }
}

/// A strategy order as handed to the market
///
/// Tracks the running amount filled and the fill history so the strategy's
/// bookkeeping can reconcile partial fills across a cancel-replace (the
/// replacement carries the original's amount filled forward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpecification {
    pub symbol: String,
    /// Raw strategy-supplied price; the market validates sign. Zero is a
    /// market order.
    pub price: Decimal,
    pub quantity: i64,
    pub trade_side: TradeSide,
    pub amount_filled: i64,
    pub status: OrderStatus,
    pub fill_history: Vec<Fill>,
}

impl OrderSpecification {
    pub fn new(symbol: impl Into<String>, price: Decimal, quantity: i64, trade_side: TradeSide) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity,
            trade_side,
            amount_filled: 0,
            status: OrderStatus::New,
            fill_history: Vec::new(),
        }
    }

    /// The side of the book this order rests on
    pub fn book_side(&self) -> Side {
        self.trade_side.book_side()
    }

    /// Open quantity not yet filled
    pub fn open_quantity(&self) -> i64 {
        self.quantity - self.amount_filled
    }

    /// Seed the amount filled (used when a replacement carries forward the
    /// original order's fills)
    pub fn set_amount_filled(&mut self, amount_filled: i64) {
        self.amount_filled = amount_filled;
    }

    /// Record a fill against this specification and advance the status
    pub fn apply_fill(&mut self, fill: &Fill) {
        self.amount_filled += fill.quantity.abs();
        self.fill_history.push(fill.clone());
        self.status = if self.amount_filled >= self.quantity {
            OrderStatus::Completed
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    pub fn mark_canceled(&mut self) {
        self.status = OrderStatus::Canceled;
    }

    pub fn mark_replaced(&mut self) {
        self.status = OrderStatus::Replaced;
    }

    pub fn mark_rejected(&mut self) {
        self.status = OrderStatus::Rejected;
    }
}
