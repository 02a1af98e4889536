//! Position tracking
//!
//! A position is mutated only by applying fills. Closing fills realize P&L
//! against the average price; opening fills build cost basis. Average price
//! is always derived, never stored.

use crate::errors::TypesError;
use crate::trade::Fill;
use rust_decimal::prelude::Signed;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Signed share position with cost basis and realized P&L
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    symbol: String,
    shares: Decimal,
    total_cost: Decimal,
    closed_pl: Decimal,
}

impl Position {
    /// A flat position with no history
    pub fn new() -> Self {
        Self {
            symbol: String::new(),
            shares: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            closed_pl: Decimal::ZERO,
        }
    }

    /// Reconstruct a position from persisted state
    ///
    /// Share counts must be integral; fractional shares are rejected.
    pub fn with_state(
        symbol: impl Into<String>,
        shares: Decimal,
        total_cost: Decimal,
        closed_pl: Decimal,
    ) -> Result<Self, TypesError> {
        if !shares.fract().is_zero() {
            return Err(TypesError::FractionalShares(shares));
        }
        Ok(Self {
            symbol: symbol.into(),
            shares,
            total_cost,
            closed_pl,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn shares(&self) -> Decimal {
        self.shares
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn closed_pl(&self) -> Decimal {
        self.closed_pl
    }

    /// Cost basis per share; zero when flat
    pub fn average_price(&self) -> Decimal {
        if self.shares.is_zero() {
            Decimal::ZERO
        } else {
            (self.total_cost / self.shares)
                .round_dp_with_strategy(16, RoundingStrategy::MidpointNearestEven)
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares.is_zero()
    }

    /// Portion of a fill that closes existing inventory (always positive)
    fn amount_closed(&self, fill_qty: Decimal) -> Decimal {
        if fill_qty.signum() == self.shares.signum() {
            return Decimal::ZERO;
        }
        self.shares.abs().min(fill_qty.abs())
    }

    /// Apply one fill to this position
    pub fn apply_fill(&mut self, fill: &Fill) {
        let fill_qty = Decimal::from(fill.quantity);
        let fill_sign = fill_qty.signum();

        let amount_closed = self.amount_closed(fill_qty);
        let amount_opened = fill_qty.abs() - amount_closed;
        let average_price = self.average_price();

        // Realize P&L on the closed portion against the average price
        let rate_differential = fill.price.as_decimal() - average_price;
        self.closed_pl += amount_closed * rate_differential * self.shares.signum();

        // Rebuild or extend the cost basis on the opened portion
        if (amount_opened > Decimal::ZERO && amount_closed > Decimal::ZERO)
            || self.shares.is_zero()
        {
            // Position flipped through flat: basis restarts at the fill price
            self.total_cost = fill.price.as_decimal() * amount_opened * fill_sign;
        } else if amount_opened > Decimal::ZERO {
            self.total_cost += fill.price.as_decimal() * amount_opened * fill_sign;
        } else if amount_closed > Decimal::ZERO {
            let cost_of_closed_shares = -(average_price * amount_closed * fill_sign);
            self.total_cost -= cost_of_closed_shares;
        }

        self.shares += fill_qty;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
