//! Tracks card payments that are waiting for the gateway.
//!
//! When a card order or appointment payment is created, its id is registered
//! as `Pendiente`. The gateway callback (`POST /api/pagos/{id}/confirmar`)
//! sends a `PaymentUpdate` over the channel and `start_payment_updater`
//! applies it, so the status endpoint polled by the frontend sees the change.
//!
//! The map is a cache of the `estado` column: after a restart, or once a
//! settled entry has been pruned, the status endpoint falls back to the
//! stored row. Settled entries are dropped whenever the map grows past
//! `MAX_TRACKED`; pending ones are kept.

use common::payments::PaymentStatus;
use log::{debug, info};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

pub(crate) const MAX_TRACKED: usize = 1_000;

/// Shared payment state, injected into the Actix application as `web::Data`.
#[derive(Clone)]
pub struct PaymentsState {
    /// Payment status per order id (`ventas.id` or `pago_e_cita.id`).
    pub payments: Arc<RwLock<HashMap<String, PaymentStatus>>>,

    /// Sender side of the update channel drained by `start_payment_updater`.
    pub tx: mpsc::Sender<PaymentUpdate>,
}

#[derive(Debug)]
pub struct PaymentUpdate {
    pub(crate) order_id: String,
    pub(crate) status: PaymentStatus,
}

impl PaymentsState {
    /// Creates the state and the receiver to hand to `start_payment_updater`.
    pub fn new() -> (Self, mpsc::Receiver<PaymentUpdate>) {
        let (tx, rx) = mpsc::channel(100);
        let state = Self {
            payments: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    pub async fn register_pending(&self, order_id: &str) {
        self.payments
            .write()
            .await
            .insert(order_id.to_string(), PaymentStatus::Pendiente);
    }

    pub async fn status(&self, order_id: &str) -> Option<PaymentStatus> {
        self.payments.read().await.get(order_id).cloned()
    }

    /// Queues a status change. Returns `false` when the updater has stopped.
    pub async fn send(&self, order_id: &str, status: PaymentStatus) -> bool {
        self.tx
            .send(PaymentUpdate {
                order_id: order_id.to_string(),
                status,
            })
            .await
            .is_ok()
    }
}

/// Applies queued `PaymentUpdate`s until every sender is dropped.
pub async fn start_payment_updater(state: PaymentsState, mut rx: mpsc::Receiver<PaymentUpdate>) {
    while let Some(update) = rx.recv().await {
        info!("Payment {} is now {:?}", update.order_id, update.status);
        let mut payments = state.payments.write().await;
        apply(&mut payments, update);
    }
}

fn apply(payments: &mut HashMap<String, PaymentStatus>, update: PaymentUpdate) {
    payments.insert(update.order_id, update.status);
    if payments.len() > MAX_TRACKED {
        let before = payments.len();
        payments.retain(|_, status| !status.is_final());
        debug!("Pruned {} settled payments", before - payments.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn updates_reach_the_map() {
        let (state, rx) = PaymentsState::new();
        let updater = state.clone();
        tokio::spawn(async move { start_payment_updater(updater, rx).await });

        state.register_pending("v1").await;
        assert_eq!(state.status("v1").await, Some(PaymentStatus::Pendiente));

        assert!(state.send("v1", PaymentStatus::Confirmado("R-1".into())).await);
        for _ in 0..50 {
            if state.status("v1").await.is_some_and(|s| s.is_final()) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(
            state.status("v1").await,
            Some(PaymentStatus::Confirmado("R-1".into()))
        );
    }

    #[test]
    fn settled_payments_are_pruned_past_the_cap() {
        let mut payments = HashMap::new();
        payments.insert("pendiente".to_string(), PaymentStatus::Pendiente);
        for i in 0..MAX_TRACKED {
            apply(
                &mut payments,
                PaymentUpdate {
                    order_id: format!("v{i}"),
                    status: PaymentStatus::Confirmado(format!("R-{i}")),
                },
            );
        }

        assert_eq!(payments.len(), 1);
        assert_eq!(payments.get("pendiente"), Some(&PaymentStatus::Pendiente));
    }
}
