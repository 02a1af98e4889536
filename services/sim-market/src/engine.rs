//! The simulation market
//!
//! Accepts strategy orders, consumes replayed market data, and produces
//! fills, transaction costs, and accept/reject notifications. All outcomes
//! are reported through the event buffer; nothing here throws for control
//! flow. The engine carries no clock — order operations take the current
//! virtual time explicitly, market data carries its own.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use types::errors::TypesError;
use types::fee::FeeSchedule;
use types::ids::{ClOrdId, EntryId, OrderId};
use types::numeric::Price;
use types::order::{OrderSpecification, TradeSide};
use types::position::Position;
use types::quote::{BookEntry, Side, TradeTick};
use types::trade::Fill;

use crate::book::QuoteBook;
use crate::events::{MarketEvent, QuoteEvent, TradeEvent};

/// Behavior knobs for the simulation market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Reject plain SELLs that would take the position short
    pub long_sale_validation: bool,
    /// Probability that a resting simulated order at exactly the incoming
    /// price gets filled; models queue-position uncertainty at the touch.
    /// 0.0 always fills, 1.0 never fills.
    pub equal_price_fill_probability: f64,
    /// Seed for the tie-break RNG; identical seeds replay identically
    pub seed: u64,
    pub fees: FeeSchedule,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            long_sale_validation: true,
            equal_price_fill_probability: 0.5,
            seed: 0,
            fees: FeeSchedule::default(),
        }
    }
}

/// The matching engine for one simulation run
pub struct SimMarket {
    book: QuoteBook,
    order_ids: HashMap<ClOrdId, OrderId>,
    next_order_id: u64,
    position: Position,
    config: MarketConfig,
    rng: ChaCha8Rng,
    events: Vec<MarketEvent>,
}

impl SimMarket {
    pub fn new(config: MarketConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            book: QuoteBook::new(),
            order_ids: HashMap::new(),
            next_order_id: 0,
            position: Position::new(),
            config,
            rng,
            events: Vec::new(),
        }
    }

    /// Start a new session carrying a prior session's position
    pub fn with_position(config: MarketConfig, position: Position) -> Self {
        let mut market = Self::new(config);
        market.position = position;
        market
    }

    pub fn book(&self) -> &QuoteBook {
        &self.book
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Signed share count of the current position
    pub fn position_shares(&self) -> i64 {
        // Positions built from fills hold integral share counts
        self.position.shares().to_i64().unwrap_or(0)
    }

    /// Take every event emitted since the last drain, in emission order
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place a new simulated order
    pub fn place_order(&mut self, now: i64, cl_ord_id: ClOrdId, order: OrderSpecification) {
        if self.config.long_sale_validation
            && order.trade_side == TradeSide::Sell
            && Decimal::from(order.quantity) > self.position.shares()
        {
            warn!("New order rejected, long sale would go short (must short instead): {cl_ord_id}");
            self.emit_trade(TradeEvent::NewOrderRejected { cl_ord_id });
            return;
        }
        if order.quantity <= 0 {
            warn!("New order rejected, quantity must be greater than zero: {cl_ord_id}");
            self.emit_trade(TradeEvent::NewOrderRejected { cl_ord_id });
            return;
        }
        if order.price < Decimal::ZERO {
            warn!("New order rejected, price must be zero or greater: {cl_ord_id}");
            self.emit_trade(TradeEvent::NewOrderRejected { cl_ord_id });
            return;
        }

        self.emit_trade(TradeEvent::NewOrderAccepted {
            cl_ord_id,
            order: order.clone(),
        });
        self.internal_place_order(now, cl_ord_id, order, None);
    }

    fn internal_place_order(
        &mut self,
        now: i64,
        cl_ord_id: ClOrdId,
        order: OrderSpecification,
        insertion_timestamp: Option<i64>,
    ) {
        let order_id = OrderId::new(self.next_order_id);
        self.next_order_id += 1;

        let mut entry = BookEntry::simulated(
            order.book_side(),
            cl_ord_id,
            order_id,
            &order.symbol,
            order.open_quantity(),
            Price::new(order.price),
            now,
            order.quantity,
        );
        entry.insertion_timestamp = insertion_timestamp;

        let entry = self.sweep_liquidity_removal(now, entry);

        if entry.remaining_quantity > 0 {
            // Removal check is done; only the remainder rests on the book
            self.add_entry_with_callback(entry);
            self.order_ids.insert(cl_ord_id, order_id);
        }
    }

    /// Cancel a resting simulated order
    pub fn cancel_order(&mut self, now: i64, cl_ord_id: ClOrdId, orig_cl_ord_id: ClOrdId) {
        let entry = match self.lookup_entry(orig_cl_ord_id) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cancel rejected: {err}");
                self.emit_trade(TradeEvent::CancelRejected { cl_ord_id });
                return;
            }
        };

        self.internal_cancel_order(now, &entry);
        self.emit_trade(TradeEvent::CancelAccepted {
            cl_ord_id,
            orig_cl_ord_id,
        });
    }

    fn internal_cancel_order(&mut self, now: i64, entry: &BookEntry) {
        let Some(owner) = entry.cl_ord_id else {
            warn!("Refusing to cancel entry {} with no owning order", entry.id);
            return;
        };
        let synthesized =
            BookEntry::cancel(entry.side, owner, entry.id.clone(), &entry.symbol, now);
        self.add_entry_with_callback(synthesized);
        self.order_ids.remove(&owner);
    }

    /// Replace a resting simulated order under a new identity
    pub fn cancel_replace_order(
        &mut self,
        now: i64,
        cl_ord_id: ClOrdId,
        orig_cl_ord_id: ClOrdId,
        mut new_order: OrderSpecification,
    ) {
        if new_order.quantity <= 0 {
            warn!("Cancel-replace rejected, quantity must be greater than zero: {cl_ord_id}");
            self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
            return;
        }
        if new_order.price < Decimal::ZERO {
            warn!("Cancel-replace rejected, price must be zero or greater: {cl_ord_id}");
            self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
            return;
        }
        let entry = match self.lookup_entry(orig_cl_ord_id) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cancel-replace rejected: {err}");
                self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
                return;
            }
        };
        if !entry.simulated {
            warn!("Cancel-replace rejected, cannot replace a non-simulated order: {cl_ord_id}");
            self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
            return;
        }
        if entry.symbol != new_order.symbol {
            warn!("Cancel-replace rejected, cannot change symbol: {cl_ord_id}");
            self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
            return;
        }
        if entry.side != new_order.book_side() {
            warn!("Cancel-replace rejected, cannot change trade side: {cl_ord_id}");
            self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
            return;
        }
        if new_order.quantity <= entry.filled_quantity() {
            warn!(
                "Cancel-replace rejected, replacement quantity {} not above filled quantity {}: {cl_ord_id}",
                new_order.quantity,
                entry.filled_quantity()
            );
            self.emit_trade(TradeEvent::CancelReplaceRejected { cl_ord_id });
            return;
        }

        // BATS rule 11.9(e): only a size decrease keeps the order's place in
        // the queue; a price change or size increase re-times it.
        let insertion_timestamp = if entry.price.as_decimal() == new_order.price
            && new_order.quantity <= entry.original_quantity
        {
            self.book.effective_time(entry.side, &entry.id)
        } else {
            None
        };

        let filled_quantity = entry.filled_quantity();
        self.internal_cancel_order(now, &entry);
        self.emit_trade(TradeEvent::CancelReplaceAccepted {
            cl_ord_id,
            order: new_order.clone(),
            orig_cl_ord_id,
        });
        new_order.set_amount_filled(filled_quantity);
        self.internal_place_order(now, cl_ord_id, new_order, insertion_timestamp);
    }

    /// Cancel every resting simulated order, both sides
    pub fn cancel_all(&mut self, now: i64, cl_ord_id: ClOrdId) {
        let mut to_cancel = Vec::new();
        for ask in self.book.simulated_asks() {
            to_cancel.extend(ask.cl_ord_id);
        }
        for bid in self.book.simulated_bids() {
            to_cancel.extend(bid.cl_ord_id);
        }
        for orig_cl_ord_id in to_cancel {
            self.cancel_order(now, cl_ord_id, orig_cl_ord_id);
        }
    }

    /// Consume a replayed bid
    pub fn on_bid(&mut self, bid: BookEntry) {
        debug_assert_eq!(bid.side, Side::Bid);
        self.add_entry_with_callback(bid.clone());
        self.sweep_incoming_fills(bid);
    }

    /// Consume a replayed ask
    pub fn on_ask(&mut self, ask: BookEntry) {
        debug_assert_eq!(ask.side, Side::Ask);
        self.add_entry_with_callback(ask.clone());
        self.sweep_incoming_fills(ask);
    }

    /// Consume a replayed trade print
    pub fn on_trade_tick(&mut self, tick: TradeTick) {
        self.book.add_trade_tick(tick.clone());
        self.emit_quote(QuoteEvent::TradeTick(tick.clone()));

        // A fully depleted real entry at the tick price identifies the trade:
        // replay the removed entry against our same-side resting orders.
        let Some(last) = self.book.last_received_non_simulated().cloned() else {
            return;
        };
        if last.remaining_quantity == 0 && last.price == tick.price {
            if let Some(removed) = self.book.removed_entry(&last.id).cloned() {
                self.sweep_trade_tick_fills(tick.timestamp, removed);
            }
        }
    }

    pub fn reset(&mut self) {
        self.book.reset();
        self.order_ids.clear();
        self.next_order_id = 0;
        self.events.clear();
    }

    fn lookup_order_id(&self, cl_ord_id: ClOrdId) -> Result<OrderId, TypesError> {
        self.order_ids
            .get(&cl_ord_id)
            .copied()
            .ok_or(TypesError::UnknownClOrdId(cl_ord_id))
    }

    /// Resolve a client order identity to its resting book entry
    fn lookup_entry(&self, cl_ord_id: ClOrdId) -> Result<BookEntry, TypesError> {
        let order_id = self.lookup_order_id(cl_ord_id)?;
        self.book
            .entry_by_id(&EntryId::Simulated(order_id))
            .cloned()
            .ok_or(TypesError::UnknownClOrdId(cl_ord_id))
    }

    /// Add an entry to the book and queue the matching quote callback
    pub(crate) fn add_entry_with_callback(&mut self, entry: BookEntry) {
        match entry.side {
            Side::Bid => {
                self.book.add_bid(entry.clone());
                self.emit_quote(QuoteEvent::Bid(entry));
            }
            Side::Ask => {
                self.book.add_ask(entry.clone());
                self.emit_quote(QuoteEvent::Ask(entry));
            }
        }
    }

    /// Update the position and queue the fill callback
    pub(crate) fn apply_fill(&mut self, fill: &Fill) {
        self.position.apply_fill(fill);
        self.emit_trade(TradeEvent::Fill(fill.clone()));
    }

    pub(crate) fn fees(&self) -> &FeeSchedule {
        &self.config.fees
    }

    pub(crate) fn book_mut(&mut self) -> &mut QuoteBook {
        &mut self.book
    }

    /// Roll the tie-break for a resting order at exactly the incoming price
    pub(crate) fn equal_price_fill(&mut self) -> bool {
        self.rng.gen::<f64>() >= self.config.equal_price_fill_probability
    }

    pub(crate) fn emit_quote(&mut self, event: QuoteEvent) {
        self.events.push(MarketEvent::Quote(event));
    }

    pub(crate) fn emit_trade(&mut self, event: TradeEvent) {
        self.events.push(MarketEvent::Trade(event));
    }
}
