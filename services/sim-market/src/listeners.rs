//! Strategy-facing callback boundaries
//!
//! The market talks to the outside world through exactly two seams: book
//! updates go to the `QuoteListener`, executions and order notifications go
//! to the `TradeListener`. The latency scheduler sits between the market and
//! both.

use types::ids::ClOrdId;
use types::order::OrderSpecification;
use types::quote::{BookEntry, TradeTick};
use types::trade::{Fill, TransactionCost};

/// Receives every book update and trade print
pub trait QuoteListener {
    fn on_bid(&mut self, bid: &BookEntry);
    fn on_ask(&mut self, ask: &BookEntry);
    fn on_trade_tick(&mut self, tick: &TradeTick);
}

/// Receives fills, transaction costs, and order notifications
pub trait TradeListener {
    fn on_fill(&mut self, fill: &Fill);
    fn on_transaction_cost(&mut self, cost: &TransactionCost);
    fn on_new_order_accepted(&mut self, cl_ord_id: ClOrdId, order: &OrderSpecification);
    fn on_new_order_rejected(&mut self, cl_ord_id: ClOrdId);
    fn on_cancel_accepted(&mut self, cl_ord_id: ClOrdId, orig_cl_ord_id: ClOrdId);
    fn on_cancel_rejected(&mut self, cl_ord_id: ClOrdId);
    fn on_cancel_replace_accepted(
        &mut self,
        cl_ord_id: ClOrdId,
        order: &OrderSpecification,
        orig_cl_ord_id: ClOrdId,
    );
    fn on_cancel_replace_rejected(&mut self, cl_ord_id: ClOrdId);
}

/// Quote listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullQuoteListener;

impl QuoteListener for NullQuoteListener {
    fn on_bid(&mut self, _bid: &BookEntry) {}
    fn on_ask(&mut self, _ask: &BookEntry) {}
    fn on_trade_tick(&mut self, _tick: &TradeTick) {}
}

/// Trade listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTradeListener;

impl TradeListener for NullTradeListener {
    fn on_fill(&mut self, _fill: &Fill) {}
    fn on_transaction_cost(&mut self, _cost: &TransactionCost) {}
    fn on_new_order_accepted(&mut self, _cl_ord_id: ClOrdId, _order: &OrderSpecification) {}
    fn on_new_order_rejected(&mut self, _cl_ord_id: ClOrdId) {}
    fn on_cancel_accepted(&mut self, _cl_ord_id: ClOrdId, _orig_cl_ord_id: ClOrdId) {}
    fn on_cancel_rejected(&mut self, _cl_ord_id: ClOrdId) {}
    fn on_cancel_replace_accepted(
        &mut self,
        _cl_ord_id: ClOrdId,
        _order: &OrderSpecification,
        _orig_cl_ord_id: ClOrdId,
    ) {
    }
    fn on_cancel_replace_rejected(&mut self, _cl_ord_id: ClOrdId) {}
}
