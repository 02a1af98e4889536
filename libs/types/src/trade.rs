//! Fill and transaction-cost types

use crate::ids::{ClOrdId, OrderId};
use crate::numeric::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the filled order added or removed liquidity
///
/// A resting order that gets hit added liquidity and earns the rebate; the
/// order that crossed the spread removed liquidity and pays the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LiquidityFlag {
    Added,
    Removed,
}

/// An execution against a simulated order
///
/// Quantity is signed: negative for the sell side, positive for the buy side.
/// Fills are immutable and append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub cl_ord_id: ClOrdId,
    pub order_id: OrderId,
    pub symbol: String,
    pub quantity: i64,
    pub price: Price,
    /// Quantity still open on the simulated order after this fill
    pub remaining: i64,
    /// Execution time, millis
    pub timestamp: i64,
    pub liquidity_flag: LiquidityFlag,
}

impl Fill {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cl_ord_id: ClOrdId,
        order_id: OrderId,
        symbol: impl Into<String>,
        quantity: i64,
        price: Price,
        remaining: i64,
        timestamp: i64,
        liquidity_flag: LiquidityFlag,
    ) -> Self {
        Self {
            cl_ord_id,
            order_id,
            symbol: symbol.into(),
            quantity,
            price,
            remaining,
            timestamp,
            liquidity_flag,
        }
    }
}

/// Cost charged for one fill
///
/// Negative cost is a rebate paid to the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionCost {
    pub cost: Decimal,
}

impl TransactionCost {
    pub fn new(cost: Decimal) -> Self {
        Self { cost }
    }

    pub fn is_rebate(&self) -> bool {
        self.cost < Decimal::ZERO
    }
}
