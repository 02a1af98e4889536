//! Per-share liquidity fee schedule

use crate::trade::TransactionCost;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-share economics of adding vs. removing liquidity
///
/// The rebate is expressed as a negative cost so both sides of the schedule
/// flow through `TransactionCost` with the same sign convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Cost per share for a liquidity-added fill (negative = rebate)
    pub added_rebate_per_share: Decimal,
    /// Cost per share for a liquidity-removed fill
    pub removed_fee_per_share: Decimal,
}

impl FeeSchedule {
    /// The BATS schedule: $0.0027/share rebate for adding, $0.0028/share fee
    /// for removing
    pub fn bats() -> Self {
        Self {
            added_rebate_per_share: Decimal::from_str_exact("-0.0027").unwrap(),
            removed_fee_per_share: Decimal::from_str_exact("0.0028").unwrap(),
        }
    }

    /// A schedule that charges nothing either way
    pub fn free() -> Self {
        Self {
            added_rebate_per_share: Decimal::ZERO,
            removed_fee_per_share: Decimal::ZERO,
        }
    }

    /// Cost of a liquidity-added fill of `quantity` shares
    pub fn added_cost(&self, quantity: i64) -> TransactionCost {
        TransactionCost::new(self.added_rebate_per_share * Decimal::from(quantity))
    }

    /// Cost of a liquidity-removed fill of `quantity` shares
    pub fn removed_cost(&self, quantity: i64) -> TransactionCost {
        TransactionCost::new(self.removed_fee_per_share * Decimal::from(quantity))
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::bats()
    }
}
