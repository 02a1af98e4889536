//! Per-operation latency tables
//!
//! Each call crossing the market↔listener boundary is identified by a typed
//! operation tag; the profile maps tags to fixed delays in simulated millis.
//! Unmapped operations have zero delay.

use std::collections::HashMap;

/// Strategy→market operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketOp {
    PlaceOrder,
    CancelOrder,
    CancelReplaceOrder,
    CancelAll,
}

/// Market→quote-listener operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteOp {
    OnBid,
    OnAsk,
    OnTradeTick,
}

/// Market→trade-listener operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeOp {
    OnFill,
    OnTransactionCost,
    OnNewOrderAccepted,
    OnNewOrderRejected,
    OnCancelAccepted,
    OnCancelRejected,
    OnCancelReplaceAccepted,
    OnCancelReplaceRejected,
}

/// Fixed per-operation delays in simulated milliseconds
#[derive(Debug, Clone)]
pub struct LatencyProfile {
    market: HashMap<MarketOp, i64>,
    quote: HashMap<QuoteOp, i64>,
    trade: HashMap<TradeOp, i64>,
}

/// One-way link delay between strategy and market
pub const LINK_LATENCY_MS: i64 = 4;
/// Strategy-side processing delay added to outbound orders
pub const STRATEGY_PROCESSING_LATENCY_MS: i64 = 1;
/// Total delay on the order path
pub const ORDER_LATENCY_MS: i64 = LINK_LATENCY_MS + STRATEGY_PROCESSING_LATENCY_MS;

impl LatencyProfile {
    /// The profile of a general market: orders pay link plus processing
    /// latency, callbacks pay link latency
    pub fn market_link() -> Self {
        let market = [
            (MarketOp::PlaceOrder, ORDER_LATENCY_MS),
            (MarketOp::CancelOrder, ORDER_LATENCY_MS),
            (MarketOp::CancelReplaceOrder, ORDER_LATENCY_MS),
            (MarketOp::CancelAll, ORDER_LATENCY_MS),
        ]
        .into();
        let quote = [
            (QuoteOp::OnBid, LINK_LATENCY_MS),
            (QuoteOp::OnAsk, LINK_LATENCY_MS),
            (QuoteOp::OnTradeTick, LINK_LATENCY_MS),
        ]
        .into();
        let trade = [
            (TradeOp::OnFill, LINK_LATENCY_MS),
            (TradeOp::OnTransactionCost, LINK_LATENCY_MS),
            (TradeOp::OnNewOrderAccepted, LINK_LATENCY_MS),
            (TradeOp::OnNewOrderRejected, LINK_LATENCY_MS),
            (TradeOp::OnCancelAccepted, LINK_LATENCY_MS),
            (TradeOp::OnCancelRejected, LINK_LATENCY_MS),
            (TradeOp::OnCancelReplaceAccepted, LINK_LATENCY_MS),
            (TradeOp::OnCancelReplaceRejected, LINK_LATENCY_MS),
        ]
        .into();
        Self { market, quote, trade }
    }

    /// The profile that delays nothing; every call is synchronous
    pub fn zero() -> Self {
        Self {
            market: HashMap::new(),
            quote: HashMap::new(),
            trade: HashMap::new(),
        }
    }

    pub fn set_market(&mut self, op: MarketOp, latency_ms: i64) -> &mut Self {
        self.market.insert(op, latency_ms);
        self
    }

    pub fn set_quote(&mut self, op: QuoteOp, latency_ms: i64) -> &mut Self {
        self.quote.insert(op, latency_ms);
        self
    }

    pub fn set_trade(&mut self, op: TradeOp, latency_ms: i64) -> &mut Self {
        self.trade.insert(op, latency_ms);
        self
    }

    pub fn market_latency(&self, op: MarketOp) -> i64 {
        self.market.get(&op).copied().unwrap_or(0)
    }

    pub fn quote_latency(&self, op: QuoteOp) -> i64 {
        self.quote.get(&op).copied().unwrap_or(0)
    }

    pub fn trade_latency(&self, op: TradeOp) -> i64 {
        self.trade.get(&op).copied().unwrap_or(0)
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::market_link()
    }
}
