//! Domain events emitted by the engine.
//!
//! Events are accumulated on aggregates during a command, drained by the
//! application layer after a successful commit, and handed to the event
//! publisher port for external subscribers (notifications, analytics).

use serde::{Deserialize, Serialize};

use crate::domain::shared::{
    MerchantId, Money, OrderId, OrderNumber, PaymentId, Points, ReferralId, Timestamp, UserId,
};

/// Everything the engine announces to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SettlementEvent {
    /// A cart was converted into an order.
    OrderCreated {
        /// The new order.
        order_id: OrderId,
        /// Human-facing order number.
        order_number: OrderNumber,
        /// The buyer.
        user_id: UserId,
        /// Amount due.
        total: Money,
        /// When the order was created.
        at: Timestamp,
    },

    /// A payment reached `completed`.
    PaymentCompleted {
        /// The paid order.
        order_id: OrderId,
        /// The payment that completed.
        payment_id: PaymentId,
        /// Amount captured.
        amount: Money,
        /// When the payment completed.
        at: Timestamp,
    },

    /// An order reached `delivered`.
    OrderDelivered {
        /// The delivered order.
        order_id: OrderId,
        /// The buyer.
        user_id: UserId,
        /// Points credited on delivery.
        points_earned: Points,
        /// When delivery was recorded.
        at: Timestamp,
    },

    /// An order was cancelled.
    OrderCancelled {
        /// The cancelled order.
        order_id: OrderId,
        /// Free-text reason, when one was given.
        reason: Option<String>,
        /// When the cancellation was recorded.
        at: Timestamp,
    },

    /// A referral converted on a first purchase.
    ReferralConverted {
        /// The converted referral.
        referral_id: ReferralId,
        /// The merchant credited.
        merchant_id: MerchantId,
        /// The order that triggered conversion.
        order_id: OrderId,
        /// Commission credited to the merchant.
        commission: Money,
        /// When the conversion happened.
        at: Timestamp,
    },
}
