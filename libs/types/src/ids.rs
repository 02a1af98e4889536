//! Unique identifier types for simulator entities
//!
//! All simulator-assigned identifiers are counter-allocated numeric newtypes:
//! replay determinism requires that the same input stream always produces the
//! same identifiers, so nothing here derives from the wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client order identity, assigned by the strategy
///
/// One specification exists per `ClOrdId`; a cancel-replace introduces a new
/// identity linked to the old one through the accept callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClOrdId(u64);

impl ClOrdId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClOrdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clord-{}", self.0)
    }
}

/// Internal order identity, assigned by the simulation market
///
/// Allocated from a monotonic counter so identical replays assign identical
/// identities. Lower ids were assigned earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order-{}", self.0)
    }
}

/// Identity of a book entry
///
/// Real market entries carry the opaque tag assigned by the quote source;
/// simulated entries carry the simulator's own `OrderId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryId {
    /// Entry synthesized for a simulated order
    Simulated(OrderId),
    /// Entry replayed from recorded market data
    Market(String),
}

impl EntryId {
    /// Create a market entry id from a source-assigned tag
    pub fn market(tag: impl Into<String>) -> Self {
        Self::Market(tag.into())
    }

    /// The simulated order id, if this entry is simulated
    pub fn order_id(&self) -> Option<OrderId> {
        match self {
            EntryId::Simulated(id) => Some(*id),
            EntryId::Market(_) => None,
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Simulated(id) => write!(f, "{id}"),
            EntryId::Market(tag) => write!(f, "{tag}"),
        }
    }
}

impl From<OrderId> for EntryId {
    fn from(id: OrderId) -> Self {
        Self::Simulated(id)
    }
}
