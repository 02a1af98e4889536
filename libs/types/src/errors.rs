//! Error taxonomy
//!
//! Public simulator operations never surface these as panics or thrown
//! control flow: validation and lookup failures reach the strategy as reject
//! callbacks. These values exist for internal `Result` plumbing and for
//! collaborators that persist positions between sessions.

use crate::ids::ClOrdId;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesError {
    #[error("Fractional share count not allowed: {0}")]
    FractionalShares(Decimal),

    #[error("No order id mapped for client order id {0}")]
    UnknownClOrdId(ClOrdId),
}
