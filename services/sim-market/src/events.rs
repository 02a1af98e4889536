//! Events emitted by the simulation market
//!
//! Every callback the market owes its listeners is materialized as an event
//! in the market's outbound buffer. The latency scheduler drains the buffer
//! and delivers each event at the right virtual time; tests drain it
//! directly.

use types::ids::ClOrdId;
use types::order::OrderSpecification;
use types::quote::{BookEntry, TradeTick};
use types::trade::{Fill, TransactionCost};

/// Book updates and trade prints bound for the quote listener
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteEvent {
    Bid(BookEntry),
    Ask(BookEntry),
    TradeTick(TradeTick),
}

/// Executions and order notifications bound for the trade listener
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Fill(Fill),
    TransactionCost(TransactionCost),
    NewOrderAccepted {
        cl_ord_id: ClOrdId,
        order: OrderSpecification,
    },
    NewOrderRejected {
        cl_ord_id: ClOrdId,
    },
    CancelAccepted {
        cl_ord_id: ClOrdId,
        orig_cl_ord_id: ClOrdId,
    },
    CancelRejected {
        cl_ord_id: ClOrdId,
    },
    CancelReplaceAccepted {
        cl_ord_id: ClOrdId,
        order: OrderSpecification,
        orig_cl_ord_id: ClOrdId,
    },
    CancelReplaceRejected {
        cl_ord_id: ClOrdId,
    },
}

/// One outbound event, tagged by destination boundary
#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    Quote(QuoteEvent),
    Trade(TradeEvent),
}
