//! Fill generation
//!
//! Three sweeps produce every fill in the simulator:
//! - the liquidity-removal sweep, run when a simulated order is placed,
//!   before it rests;
//! - the liquidity-added sweep, run when a real bid/ask arrives and the
//!   opposite top of book is a simulated order;
//! - the trade-tick sweep, run when an anonymous print identifies a depleted
//!   real entry and replays it against same-side simulated orders.
//!
//! All fills print at the resting order's price: the side that crossed pays
//! up (or receives price improvement) and the resting side keeps its quote.

use std::cmp::Ordering;

use tracing::warn;
use types::ids::{ClOrdId, OrderId};
use types::numeric::Price;
use types::quote::{BookEntry, Side};
use types::trade::{Fill, LiquidityFlag};

use crate::engine::SimMarket;
use crate::events::TradeEvent;

/// Three-way price comparison as a sign
fn price_sign(a: Price, b: Price) -> i64 {
    match a.cmp(&b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Owning identities of a simulated entry; logged and skipped when absent
fn simulated_identity(entry: &BookEntry) -> Option<(ClOrdId, OrderId)> {
    match (entry.cl_ord_id, entry.id.order_id()) {
        (Some(owner), Some(order_id)) => Some((owner, order_id)),
        _ => {
            warn!("Simulated entry {} is missing its owning identity", entry.id);
            None
        }
    }
}

impl SimMarket {
    /// Match a newly placed simulated order against the opposing side
    ///
    /// Walks the full opposing book; every opposing entry priced at or better
    /// than the new order (or any entry, for a market order) fills at the
    /// *opposing* price. Consumed real entries are marked dirty in place.
    /// Returns the entry with whatever quantity is left to rest.
    pub(crate) fn sweep_liquidity_removal(
        &mut self,
        now: i64,
        mut entry: BookEntry,
    ) -> BookEntry {
        debug_assert!(entry.simulated, "only simulated entries remove liquidity");
        let Some((owner, order_id)) = simulated_identity(&entry) else {
            return entry;
        };
        let direction: i64 = match entry.side {
            Side::Ask => -1,
            Side::Bid => 1,
        };

        let Some(best_opposing) = self.book().opposite_top(entry.side).cloned() else {
            return entry;
        };
        if !entry.is_market_order()
            && price_sign(best_opposing.price, entry.price) * direction > 0
        {
            // The entire opposing side is outside the new order's limit
            return entry;
        }

        let opposing = match entry.side {
            Side::Ask => self.book().bids(),
            Side::Bid => self.book().asks(),
        };
        for opposing_entry in opposing {
            let marketable = entry.is_market_order()
                || price_sign(opposing_entry.price, entry.price) * direction <= 0;
            if !marketable {
                continue;
            }

            let fill_quantity = if opposing_entry.simulated {
                opposing_entry.remaining_quantity.min(entry.remaining_quantity)
            } else {
                (opposing_entry.remaining_quantity - opposing_entry.dirty_quantity)
                    .min(entry.remaining_quantity)
            };
            if fill_quantity <= 0 {
                continue;
            }

            if !opposing_entry.simulated {
                self.book_mut()
                    .mark_dirty(opposing_entry.side, &opposing_entry.id, fill_quantity);
            }

            let remaining_after = entry.remaining_quantity - fill_quantity;
            // The order removing liquidity receives price improvement: the
            // fill prints at the opposing entry's price.
            let fill = Fill::new(
                owner,
                order_id,
                &entry.symbol,
                direction * fill_quantity,
                opposing_entry.price,
                remaining_after,
                now,
                LiquidityFlag::Removed,
            );
            self.apply_fill(&fill);
            let cost = self.fees().removed_cost(fill_quantity);
            self.emit_trade(TradeEvent::TransactionCost(cost));

            let insertion_timestamp = entry.insertion_timestamp;
            entry = BookEntry::simulated(
                entry.side,
                owner,
                order_id,
                &entry.symbol,
                remaining_after,
                entry.price,
                now,
                entry.original_quantity,
            );
            entry.insertion_timestamp = insertion_timestamp;

            if remaining_after == 0 {
                break;
            }
        }

        entry
    }

    /// Match an incoming real entry against simulated orders at the opposite
    /// top of book
    ///
    /// Fills repeat only while the resting order is completely consumed: a
    /// partially filled top keeps its place and ends the sweep.
    pub(crate) fn sweep_incoming_fills(&mut self, incoming: BookEntry) {
        if incoming.remaining_quantity == 0 || incoming.simulated {
            return;
        }
        let now = incoming.timestamp;
        let direction: i64 = match incoming.side {
            Side::Ask => 1,
            Side::Bid => -1,
        };

        let mut incoming = incoming;
        loop {
            let Some(resting) = self.book().opposite_top(incoming.side).cloned() else {
                return;
            };
            if !resting.simulated {
                return;
            }
            // Resting market orders are always marketable
            let comparison = if resting.is_market_order() {
                -1
            } else {
                price_sign(incoming.price, resting.price) * direction
            };
            if comparison > 0 {
                return;
            }
            if comparison == 0 && !self.equal_price_fill() {
                return;
            }

            let fill_quantity = self.fill_against_resting(now, &incoming, &resting, direction, true);
            if fill_quantity == 0 || fill_quantity != resting.remaining_quantity {
                return;
            }
            // Track consumed capacity on this event's snapshot so deeper
            // resting orders cannot double-fill the same displayed shares
            incoming.dirty_quantity += fill_quantity;
        }
    }

    /// Replay a depleted real entry, identified by a trade print, against
    /// same-side simulated orders
    pub(crate) fn sweep_trade_tick_fills(&mut self, now: i64, removed: BookEntry) {
        let direction: i64 = match removed.side {
            Side::Ask => -1,
            Side::Bid => 1,
        };

        let mut incoming = removed;
        loop {
            let Some(resting) = self.book().same_side_top(incoming.side).cloned() else {
                return;
            };
            if !resting.simulated {
                return;
            }
            let comparison = price_sign(incoming.price, resting.price) * direction;
            if comparison > 0 {
                return;
            }
            if comparison == 0 && !self.equal_price_fill() {
                return;
            }

            let fill_quantity =
                self.fill_against_resting(now, &incoming, &resting, direction, false);
            if fill_quantity == 0 || fill_quantity != resting.remaining_quantity {
                return;
            }
            incoming.dirty_quantity += fill_quantity;
        }
    }

    /// Construct one liquidity-added fill of a resting simulated order
    ///
    /// Re-issues the resting entry with the fill applied; when
    /// `mark_incoming_dirty` is set the incoming real entry is re-issued with
    /// the consumed size marked dirty. Returns the filled quantity.
    fn fill_against_resting(
        &mut self,
        now: i64,
        incoming: &BookEntry,
        resting: &BookEntry,
        direction: i64,
        mark_incoming_dirty: bool,
    ) -> i64 {
        let fill_quantity = (incoming.remaining_quantity - incoming.dirty_quantity)
            .min(resting.remaining_quantity);
        if fill_quantity <= 0 {
            return 0;
        }
        let Some((owner, order_id)) = simulated_identity(resting) else {
            return 0;
        };

        let remaining_after = resting.remaining_quantity - fill_quantity;
        let fill = Fill::new(
            owner,
            order_id,
            &resting.symbol,
            direction * fill_quantity,
            resting.price,
            remaining_after,
            now,
            LiquidityFlag::Added,
        );
        self.apply_fill(&fill);

        let updated_resting = BookEntry::simulated(
            resting.side,
            owner,
            order_id,
            &resting.symbol,
            remaining_after,
            resting.price,
            now,
            resting.original_quantity,
        );
        self.add_entry_with_callback(updated_resting);

        if mark_incoming_dirty {
            let mut updated_incoming = incoming.clone();
            updated_incoming.timestamp = now;
            updated_incoming.dirty_quantity = incoming.dirty_quantity + fill_quantity;
            self.add_entry_with_callback(updated_incoming);
        }

        let cost = self.fees().added_cost(fill_quantity);
        self.emit_trade(TradeEvent::TransactionCost(cost));

        fill_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MarketConfig;
    use crate::events::MarketEvent;
    use rust_decimal::Decimal;
    use types::order::{OrderSpecification, TradeSide};
    use types::quote::TradeTick;
    use types::trade::TransactionCost;

    const SYMBOL: &str = "TEST";

    fn market() -> SimMarket {
        SimMarket::new(MarketConfig {
            long_sale_validation: false,
            ..MarketConfig::default()
        })
    }

    fn market_with_probability(probability: f64) -> SimMarket {
        SimMarket::new(MarketConfig {
            long_sale_validation: false,
            equal_price_fill_probability: probability,
            ..MarketConfig::default()
        })
    }

    fn buy(price: u64, quantity: i64) -> OrderSpecification {
        OrderSpecification::new(SYMBOL, Decimal::from(price), quantity, TradeSide::Buy)
    }

    fn sell(price: u64, quantity: i64) -> OrderSpecification {
        OrderSpecification::new(SYMBOL, Decimal::from(price), quantity, TradeSide::Sell)
    }

    fn ask(tag: &str, quantity: i64, price: u64, timestamp: i64) -> BookEntry {
        BookEntry::market(Side::Ask, tag, SYMBOL, quantity, Price::from_u64(price), timestamp)
    }

    fn bid(tag: &str, quantity: i64, price: u64, timestamp: i64) -> BookEntry {
        BookEntry::market(Side::Bid, tag, SYMBOL, quantity, Price::from_u64(price), timestamp)
    }

    fn fills(market: &mut SimMarket) -> Vec<Fill> {
        market
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                MarketEvent::Trade(TradeEvent::Fill(fill)) => Some(fill),
                _ => None,
            })
            .collect()
    }

    fn costs(market: &mut SimMarket) -> Vec<TransactionCost> {
        market
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                MarketEvent::Trade(TradeEvent::TransactionCost(cost)) => Some(cost),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_resting_bid_filled_by_incoming_ask() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(10, 10));
        market.on_ask(ask("FillingAsk", 10, 9, 20));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, 10);
        assert_eq!(fills[0].price, Price::from_u64(10));
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(1));
        assert_eq!(fills[0].remaining, 0);
        assert_eq!(fills[0].liquidity_flag, LiquidityFlag::Added);
        assert_eq!(market.position_shares(), 10);
    }

    #[test]
    fn test_sequential_asks_fill_resting_bid() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(10, 100));

        market.on_ask(ask("Ask1", 30, 9, 20));
        market.on_ask(ask("Ask2", 20, 8, 30));
        market.on_ask(ask("Ask3", 10, 7, 40));
        market.on_ask(ask("Ask4", 40, 6, 50));
        // The bid is exhausted; this one must not fill
        market.on_ask(ask("Ask5", 1, 6, 60));

        let fills = fills(&mut market);
        let quantities: Vec<i64> = fills.iter().map(|f| f.quantity).collect();
        assert_eq!(quantities, vec![30, 20, 10, 40]);
        assert!(fills.iter().all(|f| f.price == Price::from_u64(10)));
        assert!(fills.iter().all(|f| f.cl_ord_id == ClOrdId::new(1)));
        assert_eq!(market.position_shares(), 100);
    }

    #[test]
    fn test_large_incoming_ask_fills_only_open_quantity() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(10, 100));
        market.on_ask(ask("Ask1", 3000, 9, 20));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, 100);
        assert_eq!(market.position_shares(), 100);
    }

    #[test]
    fn test_resting_ask_filled_by_incoming_bid() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), sell(10, 10));
        market.on_bid(bid("FillingBid", 10, 11, 20));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, -10);
        assert_eq!(fills[0].price, Price::from_u64(10));
        assert_eq!(market.position_shares(), -10);
    }

    #[test]
    fn test_real_entry_at_better_price_shields_simulated_order() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(10, 100));

        market.on_ask(ask("Ask1", 50, 9, 20));
        // A better real bid arrives; it now owns the top of book
        market.on_bid(bid("BetterBid", 10, 11, 30));
        market.on_ask(ask("Ask2", 50, 9, 40));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, 50);
        assert_eq!(market.position_shares(), 50);
    }

    #[test]
    fn test_incoming_ask_fills_multiple_simulated_bids() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(9, 50));
        market.place_order(11, ClOrdId::new(2), buy(9, 50));
        market.on_ask(ask("Ask1", 120, 7, 20));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(1));
        assert_eq!(fills[1].cl_ord_id, ClOrdId::new(2));
        assert_eq!(fills[0].quantity, 50);
        assert_eq!(fills[1].quantity, 50);
        assert_eq!(market.position_shares(), 100);
    }

    #[test]
    fn test_incoming_capacity_is_not_oversubscribed() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(9, 60));
        market.place_order(11, ClOrdId::new(2), buy(9, 60));
        market.on_ask(ask("Ask1", 100, 7, 20));

        let fills = fills(&mut market);
        let quantities: Vec<i64> = fills.iter().map(|f| f.quantity).collect();
        // 100 displayed shares cannot produce 120 filled shares
        assert_eq!(quantities, vec![60, 40]);
        assert_eq!(market.position_shares(), 100);
    }

    #[test]
    fn test_partially_filled_top_ends_the_sweep() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(9, 100));
        market.place_order(11, ClOrdId::new(2), buy(9, 50));
        market.on_ask(ask("Ask1", 30, 7, 20));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(1));
        assert_eq!(fills[0].quantity, 30);
        assert_eq!(fills[0].remaining, 70);
    }

    #[test]
    fn test_place_order_removes_liquidity_at_opposing_price() {
        let mut market = market();
        market.on_ask(ask("Ask1", 100, 10, 10));
        market.place_order(20, ClOrdId::new(1), buy(11, 100));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        // Price improvement: the fill prints at the ask, not the bid
        assert_eq!(fills[0].price, Price::from_u64(10));
        assert_eq!(fills[0].quantity, 100);
        assert_eq!(fills[0].liquidity_flag, LiquidityFlag::Removed);
        assert_eq!(market.position_shares(), 100);
        // Fully consumed on placement: nothing rests
        assert!(market.book().simulated_bids().is_empty());
    }

    #[test]
    fn test_liquidity_removal_charges_fee_and_add_pays_rebate() {
        let mut market = market();
        market.on_ask(ask("Ask1", 100, 10, 10));
        market.place_order(20, ClOrdId::new(1), buy(11, 100));
        let removal_costs = costs(&mut market);
        assert_eq!(removal_costs.len(), 1);
        assert!(!removal_costs[0].is_rebate());

        market.place_order(30, ClOrdId::new(2), buy(9, 50));
        market.on_ask(ask("Ask2", 50, 8, 40));
        let add_costs = costs(&mut market);
        assert_eq!(add_costs.len(), 1);
        assert!(add_costs[0].is_rebate());
    }

    #[test]
    fn test_dirty_quantity_prevents_double_fill_on_placement() {
        let mut market = market();
        market.on_ask(ask("Ask1", 100, 10, 10));

        market.place_order(20, ClOrdId::new(1), buy(11, 60));
        let first = fills(&mut market);
        assert_eq!(first[0].quantity, 60);

        // Only 40 undirtied shares remain on Ask1
        market.place_order(30, ClOrdId::new(2), buy(11, 60));
        let second = fills(&mut market);
        assert_eq!(second[0].quantity, 40);
        assert_eq!(second[0].remaining, 20);
        assert_eq!(market.position_shares(), 100);

        // The rest of the second order sits on the book
        let resting = market.book().simulated_bids();
        assert_eq!(resting[0].remaining_quantity, 20);
    }

    #[test]
    fn test_market_order_removes_liquidity_unconditionally() {
        let mut market = market();
        market.on_bid(bid("Bid1", 50, 8, 10));
        let order = OrderSpecification::new(SYMBOL, Decimal::ZERO, 50, TradeSide::Sell);
        market.place_order(20, ClOrdId::new(1), order);

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, -50);
        assert_eq!(fills[0].price, Price::from_u64(8));
        assert_eq!(market.position_shares(), -50);
    }

    #[test]
    fn test_resting_market_order_fills_incoming_flow() {
        let mut market = market();
        let order = OrderSpecification::new(SYMBOL, Decimal::ZERO, 100, TradeSide::Sell);
        market.place_order(10, ClOrdId::new(1), order);

        market.on_bid(bid("Bid1", 50, 8, 20));
        market.on_bid(bid("Bid2", 50, 1, 30));

        let fills = fills(&mut market);
        let quantities: Vec<i64> = fills.iter().map(|f| f.quantity).collect();
        assert_eq!(quantities, vec![-50, -50]);
        assert_eq!(market.position_shares(), -100);
    }

    #[test]
    fn test_simulated_cross_fills_only_the_taker() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), sell(10, 50));
        market.place_order(20, ClOrdId::new(2), buy(10, 50));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(2));
        assert_eq!(fills[0].liquidity_flag, LiquidityFlag::Removed);
        // The resting simulated ask is not consumed by its own side's model
        assert_eq!(
            market.book().simulated_asks()[0].remaining_quantity,
            50
        );
    }

    #[test]
    fn test_equal_price_always_fills_at_probability_zero() {
        let mut market = market_with_probability(0.0);
        market.place_order(10, ClOrdId::new(1), buy(10, 50));
        market.on_ask(ask("Ask1", 50, 10, 20));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, 50);
    }

    #[test]
    fn test_equal_price_never_fills_at_probability_one() {
        let mut market = market_with_probability(1.0);
        market.place_order(10, ClOrdId::new(1), buy(10, 50));
        market.on_ask(ask("Ask1", 50, 10, 20));

        assert!(fills(&mut market).is_empty());
        assert_eq!(
            market.book().simulated_bids()[0].remaining_quantity,
            50
        );
    }

    #[test]
    fn test_trade_tick_correlation_fills_same_side_order() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(10, 50));

        market.on_bid(bid("Bid1", 50, 9, 20));
        market.on_bid(bid("Bid1", 0, 9, 30));
        market.on_trade_tick(TradeTick::new(SYMBOL, 50, Price::from_u64(9), 40));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, 50);
        assert_eq!(fills[0].price, Price::from_u64(10));
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(1));
        assert_eq!(market.position_shares(), 50);
    }

    #[test]
    fn test_trade_tick_at_other_price_does_not_fill() {
        let mut market = market();
        market.on_bid(bid("Bid1", 50, 9, 10));
        market.place_order(20, ClOrdId::new(1), buy(9, 50));
        market.on_bid(bid("Bid1", 0, 9, 30));

        // Print at a different price than the depleted entry: no correlation
        market.on_trade_tick(TradeTick::new(SYMBOL, 50, Price::from_u64(10), 40));

        assert!(fills(&mut market).is_empty());
        assert_eq!(market.position_shares(), 0);
    }

    #[test]
    fn test_trade_tick_fills_multiple_simulated_bids() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), buy(9, 50));
        market.place_order(11, ClOrdId::new(2), buy(9, 50));

        market.on_bid(bid("Bid1", 120, 8, 20));
        market.on_bid(bid("Bid1", 0, 8, 30));
        market.on_trade_tick(TradeTick::new(SYMBOL, 120, Price::from_u64(8), 40));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(1));
        assert_eq!(fills[1].cl_ord_id, ClOrdId::new(2));
        assert_eq!(market.position_shares(), 100);
    }

    #[test]
    fn test_replace_partially_filled_bid_then_filling_more() {
        let mut market = market();
        let cl_ord_id = ClOrdId::new(1);
        market.place_order(10, cl_ord_id, buy(9, 50));
        market.on_ask(ask("Ask1", 49, 7, 20));

        let replacement_id = ClOrdId::new(2);
        market.cancel_replace_order(30, replacement_id, cl_ord_id, buy(9, 100));
        // 51 shares remain open on the replacement (100 - 49 filled)
        market.on_ask(ask("Ask2", 25, 7, 40));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].quantity, 49);
        assert_eq!(fills[0].remaining, 1);
        assert_eq!(fills[0].cl_ord_id, cl_ord_id);
        assert_eq!(fills[1].quantity, 25);
        assert_eq!(fills[1].remaining, 26);
        assert_eq!(fills[1].cl_ord_id, replacement_id);
        assert_eq!(market.position_shares(), 74);
    }

    #[test]
    fn test_replace_partially_filled_bid_then_completing() {
        let mut market = market();
        let cl_ord_id = ClOrdId::new(1);
        market.place_order(10, cl_ord_id, buy(9, 50));
        market.on_ask(ask("Ask1", 49, 7, 20));

        let replacement_id = ClOrdId::new(2);
        market.cancel_replace_order(30, replacement_id, cl_ord_id, buy(9, 52));
        // 3 shares remain open on the replacement (52 - 49 filled)
        market.on_ask(ask("Ask2", 25, 7, 40));

        let fills = fills(&mut market);
        assert_eq!(fills[1].quantity, 3);
        assert_eq!(fills[1].remaining, 0);
        assert_eq!(fills[1].cl_ord_id, replacement_id);
        assert_eq!(market.position_shares(), 52);
    }

    #[test]
    fn test_replace_below_filled_quantity_rejected() {
        let mut market = market();
        let cl_ord_id = ClOrdId::new(1);
        market.place_order(10, cl_ord_id, buy(9, 50));
        market.on_ask(ask("Ask1", 25, 7, 20));

        market.cancel_replace_order(30, ClOrdId::new(2), cl_ord_id, buy(9, 24));

        let rejected = market.drain_events().into_iter().any(|event| {
            matches!(
                event,
                MarketEvent::Trade(TradeEvent::CancelReplaceRejected { cl_ord_id })
                    if cl_ord_id == ClOrdId::new(2)
            )
        });
        assert!(rejected);
        assert_eq!(market.position_shares(), 25);
    }

    #[test]
    fn test_cancel_replace_smaller_quantity_retains_priority() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), sell(10, 50));
        market.place_order(20, ClOrdId::new(2), sell(10, 50));

        let replacement_id = ClOrdId::new(3);
        market.cancel_replace_order(30, replacement_id, ClOrdId::new(1), sell(10, 49));
        market.on_bid(bid("Bid1", 20, 11, 40));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, -20);
        assert_eq!(fills[0].cl_ord_id, replacement_id);
    }

    #[test]
    fn test_cancel_replace_larger_quantity_loses_priority() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), sell(10, 50));
        market.place_order(20, ClOrdId::new(2), sell(10, 50));

        market.cancel_replace_order(30, ClOrdId::new(3), ClOrdId::new(1), sell(10, 60));
        market.on_bid(bid("Bid1", 20, 11, 40));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].cl_ord_id, ClOrdId::new(2));
    }

    #[test]
    fn test_cancel_replace_smaller_quantity_does_not_overfill() {
        let mut market = market();
        market.place_order(10, ClOrdId::new(1), sell(10, 50));
        market.cancel_replace_order(20, ClOrdId::new(2), ClOrdId::new(1), sell(10, 49));
        market.on_bid(bid("Bid1", 150, 11, 30));

        let fills = fills(&mut market);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, -49);
        assert_eq!(market.position_shares(), -49);
    }
}
