use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, SettlementUpdate},
    helpers::verify_checksum,
    traits::{PaymentGatewayDatabase, PaymentGatewayError},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: creating orders, fetching them, and applying
/// checksum-authenticated payment notifications.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

/// How a payment notification was resolved against the order's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnTransition {
    /// The outcome was written to the order.
    Applied,
    /// The order was already `Paid`; nothing was written.
    AlreadyPaid,
}

/// The result of processing a payment notification: the authoritative post-processing order record and what
/// happened to it.
#[derive(Debug, Clone)]
pub struct IpnResolution {
    pub order: Order,
    pub transition: IpnTransition,
}

impl IpnResolution {
    /// True when this notification settled the order as `Paid` and the Fusion system must be notified. A repeated
    /// notification for an already-paid order never relays again.
    pub fn requires_relay(&self) -> bool {
        self.transition == IpnTransition::Applied && self.order.status == OrderStatusType::Paid
    }

    /// Where the payment provider should redirect the customer, per the settled outcome.
    pub fn redirect_url(&self) -> &str {
        if self.order.status == OrderStatusType::Paid {
            &self.order.success_url
        } else {
            &self.order.fail_url
        }
    }
}

impl<B> OrderFlowApi<B>
where B: PaymentGatewayDatabase
{
    /// Persist a brand-new order. The backend assigns the `order_id`; the returned record is the row as stored,
    /// with status `Pending` and empty settlement fields.
    pub async fn process_new_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError> {
        let order = self.db.insert_order(order).await?;
        debug!("🔄️📦️ Order [{}] created for Fusion order {}", order.order_id, order.custom_id);
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: OrderId) -> Result<Option<Order>, PaymentGatewayError> {
        self.db.fetch_order_by_id(order_id).await
    }

    /// Apply a payment-outcome notification to an order.
    ///
    /// The sequence is fixed:
    /// 1. The order is loaded ([`PaymentGatewayError::OrderNotFound`] if missing).
    /// 2. The supplied token is checked against the checksum recomputed from the *stored* immutable fields
    ///    ([`PaymentGatewayError::InvalidChecksum`] on any mismatch; the order is never touched).
    /// 3. An order that is already `Paid` short-circuits: no write, [`IpnTransition::AlreadyPaid`].
    /// 4. Otherwise the outcome is applied through the backend's guarded conditional write. Losing a race against a
    ///    concurrent notification is reported as `AlreadyPaid` too, so retried provider callbacks are absorbed
    ///    without a second write.
    pub async fn process_payment_notification(
        &self,
        order_id: OrderId,
        checksum: &str,
        update: SettlementUpdate,
    ) -> Result<IpnResolution, PaymentGatewayError> {
        let order =
            self.db.fetch_order_by_id(order_id).await?.ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
        if !verify_checksum(checksum, order.order_id, &order.ipn_url, order.order_date) {
            warn!("🔄️🚫️ Invalid checksum supplied for order [{order_id}]. The notification is rejected.");
            return Err(PaymentGatewayError::InvalidChecksum);
        }
        if order.status == OrderStatusType::Paid {
            info!("🔄️📦️ Order [{order_id}] is already Paid. Ignoring repeated notification.");
            return Ok(IpnResolution { order, transition: IpnTransition::AlreadyPaid });
        }
        if update.status == OrderStatusType::Pending {
            return Err(PaymentGatewayError::InvalidPaymentStatus(update.status.to_string()));
        }
        let new_status = update.status;
        match self.db.settle_order(order_id, update).await? {
            Some(order) => {
                info!("🔄️💰️ Order [{order_id}] settled with status {new_status}.");
                Ok(IpnResolution { order, transition: IpnTransition::Applied })
            },
            None => {
                // A concurrent notification won the conditional write. Re-read for the authoritative state.
                debug!("🔄️📦️ Order [{order_id}] was settled concurrently. Reporting existing state.");
                let order =
                    self.db.fetch_order_by_id(order_id).await?.ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
                Ok(IpnResolution { order, transition: IpnTransition::AlreadyPaid })
            },
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
