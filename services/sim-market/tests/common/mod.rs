//! Shared helpers for the integration suites

use sim_market::events::TradeEvent;
use sim_market::listeners::TradeListener;
use types::ids::ClOrdId;
use types::order::OrderSpecification;
use types::trade::{Fill, TransactionCost};

/// Initialize test logging once; repeat calls are no-ops
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Trade listener that records every callback in delivery order
#[derive(Debug, Default)]
pub struct RecordingTradeListener {
    pub events: Vec<TradeEvent>,
}

#[allow(dead_code)]
impl RecordingTradeListener {
    pub fn fills(&self) -> Vec<&Fill> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TradeEvent::Fill(fill) => Some(fill),
                _ => None,
            })
            .collect()
    }

    pub fn accepted_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    TradeEvent::NewOrderAccepted { .. } | TradeEvent::CancelReplaceAccepted { .. }
                )
            })
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    TradeEvent::NewOrderRejected { .. }
                        | TradeEvent::CancelRejected { .. }
                        | TradeEvent::CancelReplaceRejected { .. }
                )
            })
            .count()
    }

    pub fn costs(&self) -> Vec<&TransactionCost> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TradeEvent::TransactionCost(cost) => Some(cost),
                _ => None,
            })
            .collect()
    }
}

impl TradeListener for RecordingTradeListener {
    fn on_fill(&mut self, fill: &Fill) {
        self.events.push(TradeEvent::Fill(fill.clone()));
    }

    fn on_transaction_cost(&mut self, cost: &TransactionCost) {
        self.events.push(TradeEvent::TransactionCost(*cost));
    }

    fn on_new_order_accepted(&mut self, cl_ord_id: ClOrdId, order: &OrderSpecification) {
        self.events.push(TradeEvent::NewOrderAccepted {
            cl_ord_id,
            order: order.clone(),
        });
    }

    fn on_new_order_rejected(&mut self, cl_ord_id: ClOrdId) {
        self.events.push(TradeEvent::NewOrderRejected { cl_ord_id });
    }

    fn on_cancel_accepted(&mut self, cl_ord_id: ClOrdId, orig_cl_ord_id: ClOrdId) {
        self.events.push(TradeEvent::CancelAccepted {
            cl_ord_id,
            orig_cl_ord_id,
        });
    }

    fn on_cancel_rejected(&mut self, cl_ord_id: ClOrdId) {
        self.events.push(TradeEvent::CancelRejected { cl_ord_id });
    }

    fn on_cancel_replace_accepted(
        &mut self,
        cl_ord_id: ClOrdId,
        order: &OrderSpecification,
        orig_cl_ord_id: ClOrdId,
    ) {
        self.events.push(TradeEvent::CancelReplaceAccepted {
            cl_ord_id,
            order: order.clone(),
            orig_cl_ord_id,
        });
    }

    fn on_cancel_replace_rejected(&mut self, cl_ord_id: ClOrdId) {
        self.events.push(TradeEvent::CancelReplaceRejected { cl_ord_id });
    }
}
