//! The latency scheduler
//!
//! Owns the market, both listeners, the virtual clock, and the pending
//! queue. Calls with zero resolved latency execute synchronously; everything
//! else is stamped with (execution time, sequence) and drained in that order
//! whenever time advances. The sequence number keeps delivery FIFO among
//! equal execution times even when the calls were scheduled with different
//! latencies.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use types::ids::ClOrdId;
use types::order::OrderSpecification;
use types::quote::{BookEntry, Side, TradeTick};

use crate::engine::SimMarket;
use crate::events::{MarketEvent, QuoteEvent, TradeEvent};
use crate::listeners::{QuoteListener, TradeListener};

use super::clock::SimClock;
use super::profile::{LatencyProfile, MarketOp, QuoteOp, TradeOp};

/// A strategy→market call held until its delivery time
#[derive(Debug, Clone)]
enum MarketCall {
    PlaceOrder {
        cl_ord_id: ClOrdId,
        order: OrderSpecification,
    },
    CancelOrder {
        cl_ord_id: ClOrdId,
        orig_cl_ord_id: ClOrdId,
    },
    CancelReplaceOrder {
        cl_ord_id: ClOrdId,
        orig_cl_ord_id: ClOrdId,
        order: OrderSpecification,
    },
    CancelAll {
        cl_ord_id: ClOrdId,
    },
}

/// Any call held in the pending queue
#[derive(Debug, Clone)]
enum DeferredCall {
    Market(MarketCall),
    Quote(QuoteEvent),
    Trade(TradeEvent),
}

#[derive(Debug, Clone)]
struct Deferred {
    execution_time: i64,
    sequence: u64,
    call: DeferredCall,
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        self.execution_time == other.execution_time && self.sequence == other.sequence
    }
}

impl Eq for Deferred {}

impl PartialOrd for Deferred {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deferred {
    fn cmp(&self, other: &Self) -> Ordering {
        // Sequence alone is not enough: a call scheduled later with a smaller
        // latency may be due earlier
        (self.execution_time, self.sequence).cmp(&(other.execution_time, other.sequence))
    }
}

/// The market behind a virtual-latency boundary
pub struct LatencyScheduler<Q: QuoteListener, T: TradeListener> {
    market: SimMarket,
    quote_listener: Q,
    trade_listener: T,
    profile: LatencyProfile,
    clock: SimClock,
    queue: BinaryHeap<Reverse<Deferred>>,
    next_sequence: u64,
}

impl<Q: QuoteListener, T: TradeListener> LatencyScheduler<Q, T> {
    pub fn new(
        market: SimMarket,
        profile: LatencyProfile,
        quote_listener: Q,
        trade_listener: T,
    ) -> Self {
        Self {
            market,
            quote_listener,
            trade_listener,
            profile,
            clock: SimClock::new(),
            queue: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn market(&self) -> &SimMarket {
        &self.market
    }

    pub fn market_mut(&mut self) -> &mut SimMarket {
        &mut self.market
    }

    pub fn quote_listener(&self) -> &Q {
        &self.quote_listener
    }

    pub fn trade_listener(&self) -> &T {
        &self.trade_listener
    }

    /// Current simulated time, millis
    pub fn current_time(&self) -> i64 {
        self.clock.now()
    }

    // -- strategy → market ---------------------------------------------------

    pub fn place_order(&mut self, cl_ord_id: ClOrdId, order: OrderSpecification) {
        self.market_call(
            MarketOp::PlaceOrder,
            MarketCall::PlaceOrder { cl_ord_id, order },
        );
    }

    pub fn cancel_order(&mut self, cl_ord_id: ClOrdId, orig_cl_ord_id: ClOrdId) {
        self.market_call(
            MarketOp::CancelOrder,
            MarketCall::CancelOrder {
                cl_ord_id,
                orig_cl_ord_id,
            },
        );
    }

    pub fn cancel_replace_order(
        &mut self,
        cl_ord_id: ClOrdId,
        orig_cl_ord_id: ClOrdId,
        order: OrderSpecification,
    ) {
        self.market_call(
            MarketOp::CancelReplaceOrder,
            MarketCall::CancelReplaceOrder {
                cl_ord_id,
                orig_cl_ord_id,
                order,
            },
        );
    }

    pub fn cancel_all(&mut self, cl_ord_id: ClOrdId) {
        self.market_call(MarketOp::CancelAll, MarketCall::CancelAll { cl_ord_id });
    }

    // -- quote source → market ----------------------------------------------

    /// Deliver a replayed bid; its timestamp advances the clock first
    pub fn on_bid(&mut self, bid: BookEntry) {
        debug_assert_eq!(bid.side, Side::Bid);
        self.advance_time(bid.timestamp);
        self.market.on_bid(bid);
        self.route_market_events();
    }

    /// Deliver a replayed ask; its timestamp advances the clock first
    pub fn on_ask(&mut self, ask: BookEntry) {
        debug_assert_eq!(ask.side, Side::Ask);
        self.advance_time(ask.timestamp);
        self.market.on_ask(ask);
        self.route_market_events();
    }

    /// Deliver a replayed trade print; its timestamp advances the clock first
    pub fn on_trade_tick(&mut self, tick: TradeTick) {
        self.advance_time(tick.timestamp);
        self.market.on_trade_tick(tick);
        self.route_market_events();
    }

    /// Advance the clock, firing every queued invocation that comes due
    ///
    /// The clock follows each invocation to its execution time as it fires,
    /// then settles at `new_time`.
    pub fn advance_time(&mut self, new_time: i64) {
        loop {
            let due = matches!(
                self.queue.peek(),
                Some(Reverse(deferred)) if deferred.execution_time <= new_time
            );
            if !due {
                break;
            }
            let Reverse(deferred) = self.queue.pop().expect("peeked entry is present");
            self.clock.set(deferred.execution_time);
            self.dispatch(deferred.call);
        }
        self.clock.set(new_time);
    }

    /// Clear the queue, rewind the clock, and reset the market
    pub fn reset(&mut self) {
        self.queue.clear();
        self.next_sequence = 0;
        self.clock.reset();
        self.market.reset();
    }

    // -- internals -----------------------------------------------------------

    fn market_call(&mut self, op: MarketOp, call: MarketCall) {
        let latency = self.profile.market_latency(op);
        if latency == 0 {
            self.execute_market_call(call);
        } else {
            self.enqueue(self.clock.now() + latency, DeferredCall::Market(call));
        }
    }

    fn execute_market_call(&mut self, call: MarketCall) {
        let now = self.clock.now();
        match call {
            MarketCall::PlaceOrder { cl_ord_id, order } => {
                self.market.place_order(now, cl_ord_id, order)
            }
            MarketCall::CancelOrder {
                cl_ord_id,
                orig_cl_ord_id,
            } => self.market.cancel_order(now, cl_ord_id, orig_cl_ord_id),
            MarketCall::CancelReplaceOrder {
                cl_ord_id,
                orig_cl_ord_id,
                order,
            } => self
                .market
                .cancel_replace_order(now, cl_ord_id, orig_cl_ord_id, order),
            MarketCall::CancelAll { cl_ord_id } => self.market.cancel_all(now, cl_ord_id),
        }
        self.route_market_events();
    }

    fn dispatch(&mut self, call: DeferredCall) {
        match call {
            DeferredCall::Market(call) => self.execute_market_call(call),
            DeferredCall::Quote(event) => Self::deliver_quote(&mut self.quote_listener, event),
            DeferredCall::Trade(event) => Self::deliver_trade(&mut self.trade_listener, event),
        }
    }

    /// Route everything the market emitted to the listeners, delayed per the
    /// profile
    fn route_market_events(&mut self) {
        for event in self.market.drain_events() {
            match event {
                MarketEvent::Quote(event) => {
                    let latency = self.profile.quote_latency(quote_op(&event));
                    if latency == 0 {
                        Self::deliver_quote(&mut self.quote_listener, event);
                    } else {
                        self.enqueue(self.clock.now() + latency, DeferredCall::Quote(event));
                    }
                }
                MarketEvent::Trade(event) => {
                    let latency = self.profile.trade_latency(trade_op(&event));
                    if latency == 0 {
                        Self::deliver_trade(&mut self.trade_listener, event);
                    } else {
                        self.enqueue(self.clock.now() + latency, DeferredCall::Trade(event));
                    }
                }
            }
        }
    }

    fn enqueue(&mut self, execution_time: i64, call: DeferredCall) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Reverse(Deferred {
            execution_time,
            sequence,
            call,
        }));
    }

    fn deliver_quote(listener: &mut Q, event: QuoteEvent) {
        match event {
            QuoteEvent::Bid(bid) => listener.on_bid(&bid),
            QuoteEvent::Ask(ask) => listener.on_ask(&ask),
            QuoteEvent::TradeTick(tick) => listener.on_trade_tick(&tick),
        }
    }

    fn deliver_trade(listener: &mut T, event: TradeEvent) {
        match event {
            TradeEvent::Fill(fill) => listener.on_fill(&fill),
            TradeEvent::TransactionCost(cost) => listener.on_transaction_cost(&cost),
            TradeEvent::NewOrderAccepted { cl_ord_id, order } => {
                listener.on_new_order_accepted(cl_ord_id, &order)
            }
            TradeEvent::NewOrderRejected { cl_ord_id } => {
                listener.on_new_order_rejected(cl_ord_id)
            }
            TradeEvent::CancelAccepted {
                cl_ord_id,
                orig_cl_ord_id,
            } => listener.on_cancel_accepted(cl_ord_id, orig_cl_ord_id),
            TradeEvent::CancelRejected { cl_ord_id } => listener.on_cancel_rejected(cl_ord_id),
            TradeEvent::CancelReplaceAccepted {
                cl_ord_id,
                order,
                orig_cl_ord_id,
            } => listener.on_cancel_replace_accepted(cl_ord_id, &order, orig_cl_ord_id),
            TradeEvent::CancelReplaceRejected { cl_ord_id } => {
                listener.on_cancel_replace_rejected(cl_ord_id)
            }
        }
    }
}

fn quote_op(event: &QuoteEvent) -> QuoteOp {
    match event {
        QuoteEvent::Bid(_) => QuoteOp::OnBid,
        QuoteEvent::Ask(_) => QuoteOp::OnAsk,
        QuoteEvent::TradeTick(_) => QuoteOp::OnTradeTick,
    }
}

fn trade_op(event: &TradeEvent) -> TradeOp {
    match event {
        TradeEvent::Fill(_) => TradeOp::OnFill,
        TradeEvent::TransactionCost(_) => TradeOp::OnTransactionCost,
        TradeEvent::NewOrderAccepted { .. } => TradeOp::OnNewOrderAccepted,
        TradeEvent::NewOrderRejected { .. } => TradeOp::OnNewOrderRejected,
        TradeEvent::CancelAccepted { .. } => TradeOp::OnCancelAccepted,
        TradeEvent::CancelRejected { .. } => TradeOp::OnCancelRejected,
        TradeEvent::CancelReplaceAccepted { .. } => TradeOp::OnCancelReplaceAccepted,
        TradeEvent::CancelReplaceRejected { .. } => TradeOp::OnCancelReplaceRejected,
    }
}
