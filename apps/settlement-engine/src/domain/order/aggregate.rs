//! The order aggregate.

use serde::{Deserialize, Serialize};

use super::payment::{Payment, PaymentMethod};
use super::state_machine::OrderStateMachine;
use super::status::OrderStatus;
use crate::domain::catalog::ItemKey;
use crate::domain::events::SettlementEvent;
use crate::domain::pricing::{PriceBreakdown, ShippingMethod};
use crate::domain::shared::{
    CouponCode, DomainError, Money, OrderId, OrderNumber, PaymentId, Points, Timestamp, UserId,
};

/// Postal address snapshot frozen onto the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street address.
    pub line1: String,
    /// Additional address detail.
    pub line2: Option<String>,
    /// City or town.
    pub city: String,
    /// Postal code, where applicable.
    pub postal_code: Option<String>,
    /// ISO country code.
    pub country: String,
}

/// A frozen snapshot of one ordered item.
///
/// Independent of later catalog changes; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product, optionally narrowed to a variant.
    pub key: ItemKey,
    /// Display name at order time.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price at order time.
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub line_total: Money,
    /// Digital goods never incur shipping.
    pub is_digital: bool,
}

impl OrderLine {
    /// Build a line, computing the line total.
    #[must_use]
    pub fn new(
        key: ItemKey,
        name: String,
        quantity: u32,
        unit_price: Money,
        is_digital: bool,
    ) -> Self {
        Self {
            line_total: unit_price * quantity,
            key,
            name,
            quantity,
            unit_price,
            is_digital,
        }
    }
}

/// Everything needed to create an order.
#[derive(Debug, Clone)]
pub struct NewOrderParams {
    /// The buyer.
    pub user_id: UserId,
    /// Pre-generated unique order number.
    pub number: OrderNumber,
    /// Frozen lines, at least one.
    pub lines: Vec<OrderLine>,
    /// Computed price breakdown.
    pub breakdown: PriceBreakdown,
    /// Chosen delivery method.
    pub shipping_method: ShippingMethod,
    /// Where to ship.
    pub shipping_address: Address,
    /// Billing address, defaults to the shipping address when absent.
    pub billing_address: Option<Address>,
    /// Applied coupon, if any.
    pub coupon_code: Option<CouponCode>,
    /// Points to credit when the order is delivered.
    pub points_earned: Points,
    /// Creation time.
    pub now: Timestamp,
}

/// An immutable order.
///
/// Lines, addresses, and the breakdown never change after creation; only
/// status, tracking stamps, and payments do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    number: OrderNumber,
    user_id: UserId,
    lines: Vec<OrderLine>,
    breakdown: PriceBreakdown,
    shipping_method: ShippingMethod,
    shipping_address: Address,
    billing_address: Option<Address>,
    coupon_code: Option<CouponCode>,
    status: OrderStatus,
    points_earned: Points,
    points_used: Points,
    cancellation_reason: Option<String>,
    payments: Vec<Payment>,
    created_at: Timestamp,
    updated_at: Timestamp,
    shipped_at: Option<Timestamp>,
    delivered_at: Option<Timestamp>,
    cancelled_at: Option<Timestamp>,
    #[serde(skip)]
    events: Vec<SettlementEvent>,
}

impl Order {
    /// Create a pending order and record the `OrderCreated` event.
    #[must_use]
    pub fn create(params: NewOrderParams) -> Self {
        let id = OrderId::generate();
        let points_used = params.breakdown.points_used;
        let mut order = Self {
            id: id.clone(),
            number: params.number.clone(),
            user_id: params.user_id.clone(),
            lines: params.lines,
            breakdown: params.breakdown,
            shipping_method: params.shipping_method,
            shipping_address: params.shipping_address,
            billing_address: params.billing_address,
            coupon_code: params.coupon_code,
            status: OrderStatus::Pending,
            points_earned: params.points_earned,
            points_used,
            cancellation_reason: None,
            payments: Vec::new(),
            created_at: params.now,
            updated_at: params.now,
            shipped_at: None,
            delivered_at: None,
            cancelled_at: None,
            events: Vec::new(),
        };
        order.events.push(SettlementEvent::OrderCreated {
            order_id: id,
            order_number: params.number,
            user_id: params.user_id,
            total: order.breakdown.total,
            at: params.now,
        });
        order
    }

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Human-facing order number.
    #[must_use]
    pub const fn number(&self) -> &OrderNumber {
        &self.number
    }

    /// The buyer.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Frozen order lines.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// The price breakdown.
    #[must_use]
    pub const fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    /// Amount due.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.breakdown.total
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Delivery method.
    #[must_use]
    pub const fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Shipping destination.
    #[must_use]
    pub const fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    /// Coupon applied at checkout.
    #[must_use]
    pub const fn coupon_code(&self) -> Option<&CouponCode> {
        self.coupon_code.as_ref()
    }

    /// Points to credit on delivery.
    #[must_use]
    pub const fn points_earned(&self) -> Points {
        self.points_earned
    }

    /// Points consumed at checkout.
    #[must_use]
    pub const fn points_used(&self) -> Points {
        self.points_used
    }

    /// Why the order was cancelled, when it was.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// All payment attempts.
    #[must_use]
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the order was handed to the carrier.
    #[must_use]
    pub const fn shipped_at(&self) -> Option<Timestamp> {
        self.shipped_at
    }

    /// When delivery was recorded.
    #[must_use]
    pub const fn delivered_at(&self) -> Option<Timestamp> {
        self.delivered_at
    }

    /// (key, quantity) pairs for inventory reservation and release.
    #[must_use]
    pub fn inventory_lines(&self) -> Vec<(ItemKey, u32)> {
        self.lines
            .iter()
            .map(|l| (l.key.clone(), l.quantity))
            .collect()
    }

    /// Sum of completed payment amounts.
    #[must_use]
    pub fn amount_paid(&self) -> Money {
        self.payments
            .iter()
            .filter(|p| p.is_completed())
            .map(Payment::amount)
            .sum()
    }

    /// Derived, never stored: completed payments cover the total.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.amount_paid() >= self.total()
    }

    /// Move the order to a new status, stamping side effects.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] for moves outside
    /// the transition table.
    pub fn transition_to(&mut self, to: OrderStatus, now: Timestamp) -> Result<(), DomainError> {
        OrderStateMachine::validate_transition(self.status, to)?;
        self.status = to;
        self.updated_at = now;
        match to {
            OrderStatus::Shipped => self.shipped_at = Some(now),
            OrderStatus::Delivered => {
                self.delivered_at = Some(now);
                self.events.push(SettlementEvent::OrderDelivered {
                    order_id: self.id.clone(),
                    user_id: self.user_id.clone(),
                    points_earned: self.points_earned,
                    at: now,
                });
            }
            OrderStatus::Cancelled => {
                self.cancelled_at = Some(now);
                self.events.push(SettlementEvent::OrderCancelled {
                    order_id: self.id.clone(),
                    reason: self.cancellation_reason.clone(),
                    at: now,
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// Cancel the order with an optional reason.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] unless the order
    /// is pending or processing.
    pub fn cancel(&mut self, reason: Option<String>, now: Timestamp) -> Result<(), DomainError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Cancelled)?;
        self.cancellation_reason = reason;
        self.transition_to(OrderStatus::Cancelled, now)
    }

    /// Open a pending payment against this order.
    pub fn record_payment(
        &mut self,
        amount: Money,
        method: PaymentMethod,
        now: Timestamp,
    ) -> &Payment {
        let payment = Payment::new(self.id.clone(), amount, method, now);
        self.payments.push(payment);
        self.updated_at = now;
        // Just pushed, cannot be empty.
        &self.payments[self.payments.len() - 1]
    }

    /// Look up a payment attempt by id.
    #[must_use]
    pub fn find_payment(&self, payment_id: &PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id() == payment_id)
    }

    /// Settle a payment as completed and record the event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] for an unknown payment id, or
    /// [`DomainError::InvalidStateTransition`] if the payment was already
    /// settled.
    pub fn complete_payment(
        &mut self,
        payment_id: &PaymentId,
        external_reference: Option<String>,
        now: Timestamp,
    ) -> Result<Money, DomainError> {
        let payment = self
            .payments
            .iter_mut()
            .find(|p| p.id() == payment_id)
            .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;
        payment.complete(external_reference, now)?;
        let amount = payment.amount();
        self.events.push(SettlementEvent::PaymentCompleted {
            order_id: self.id.clone(),
            payment_id: payment_id.clone(),
            amount,
            at: now,
        });
        self.updated_at = now;
        Ok(amount)
    }

    /// Settle a payment as failed, keeping the gateway's reason.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] for an unknown payment id, or
    /// [`DomainError::InvalidStateTransition`] if the payment was already
    /// settled.
    pub fn fail_payment(
        &mut self,
        payment_id: &PaymentId,
        reason: Option<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let payment = self
            .payments
            .iter_mut()
            .find(|p| p.id() == payment_id)
            .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;
        payment.fail(reason, now)?;
        self.updated_at = now;
        Ok(())
    }

    /// Drain accumulated domain events for publishing.
    pub fn drain_events(&mut self) -> Vec<SettlementEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::ProductId;
    use rust_decimal_macros::dec;

    fn now() -> Timestamp {
        Timestamp::parse("2026-06-15T12:00:00Z").unwrap()
    }

    fn address() -> Address {
        Address {
            line1: "12 Biashara St".to_string(),
            line2: None,
            city: "Nairobi".to_string(),
            postal_code: Some("00100".to_string()),
            country: "KE".to_string(),
        }
    }

    fn breakdown(total: i64) -> PriceBreakdown {
        PriceBreakdown {
            subtotal: Money::from_major(total),
            shipping: Money::ZERO,
            tax: Money::ZERO,
            discount: Money::ZERO,
            points_discount: Money::ZERO,
            total: Money::from_major(total),
            points_used: Points::ZERO,
        }
    }

    fn order(total: i64) -> Order {
        Order::create(NewOrderParams {
            user_id: UserId::new("usr-1"),
            number: OrderNumber::new("ORD-20260615-ABCD1234"),
            lines: vec![OrderLine::new(
                ItemKey::product(ProductId::new("prod-1")),
                "Mug".to_string(),
                2,
                Money::from_major(total / 2),
                false,
            )],
            breakdown: breakdown(total),
            shipping_method: ShippingMethod::Pickup,
            shipping_address: address(),
            billing_address: None,
            coupon_code: None,
            points_earned: Points::new(1),
            now: now(),
        })
    }

    #[test]
    fn create_emits_order_created() {
        let mut o = order(200);
        assert_eq!(o.status(), OrderStatus::Pending);

        let events = o.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SettlementEvent::OrderCreated { .. }));
        assert!(o.drain_events().is_empty());
    }

    #[test]
    fn line_total_computed() {
        let line = OrderLine::new(
            ItemKey::product(ProductId::new("prod-1")),
            "Mug".to_string(),
            3,
            Money::new(dec!(9.50)),
            false,
        );
        assert_eq!(line.line_total, Money::new(dec!(28.50)));
    }

    #[test]
    fn happy_path_transitions_stamp_timestamps() {
        let mut o = order(200);
        o.transition_to(OrderStatus::Processing, now()).unwrap();
        o.transition_to(OrderStatus::Shipped, now()).unwrap();
        assert_eq!(o.shipped_at(), Some(now()));

        o.transition_to(OrderStatus::Delivered, now()).unwrap();
        assert_eq!(o.delivered_at(), Some(now()));

        let events = o.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SettlementEvent::OrderDelivered { .. })));
    }

    #[test]
    fn delivered_cannot_regress() {
        let mut o = order(200);
        o.transition_to(OrderStatus::Processing, now()).unwrap();
        o.transition_to(OrderStatus::Shipped, now()).unwrap();
        o.transition_to(OrderStatus::Delivered, now()).unwrap();

        let err = o.transition_to(OrderStatus::Processing, now());
        assert!(err.is_err());
        assert_eq!(o.status(), OrderStatus::Delivered);
    }

    #[test]
    fn cancel_records_reason_and_event() {
        let mut o = order(200);
        o.cancel(Some("out of stock".to_string()), now()).unwrap();

        assert_eq!(o.status(), OrderStatus::Cancelled);
        assert_eq!(o.cancellation_reason(), Some("out of stock"));
        let events = o.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            SettlementEvent::OrderCancelled { reason: Some(r), .. } if r == "out of stock"
        )));
    }

    #[test]
    fn cancel_after_shipment_rejected() {
        let mut o = order(200);
        o.transition_to(OrderStatus::Processing, now()).unwrap();
        o.transition_to(OrderStatus::Shipped, now()).unwrap();

        assert!(o.cancel(None, now()).is_err());
        assert!(o.cancellation_reason().is_none());
        assert_eq!(o.status(), OrderStatus::Shipped);
    }

    #[test]
    fn is_paid_derived_from_completed_payments() {
        let mut o = order(200);
        let id1 = o
            .record_payment(Money::from_major(120), PaymentMethod::Card, now())
            .id()
            .clone();
        let id2 = o
            .record_payment(Money::from_major(80), PaymentMethod::Card, now())
            .id()
            .clone();
        assert!(!o.is_paid());

        o.complete_payment(&id1, Some("tx-1".to_string()), now())
            .unwrap();
        assert!(!o.is_paid());
        assert_eq!(o.amount_paid(), Money::from_major(120));

        o.complete_payment(&id2, Some("tx-2".to_string()), now())
            .unwrap();
        assert!(o.is_paid());
    }

    #[test]
    fn failed_payment_does_not_count() {
        let mut o = order(100);
        let id = o
            .record_payment(Money::from_major(100), PaymentMethod::Card, now())
            .id()
            .clone();
        o.fail_payment(&id, Some("declined".to_string()), now())
            .unwrap();

        assert!(!o.is_paid());
        assert_eq!(o.amount_paid(), Money::ZERO);
        assert_eq!(
            o.find_payment(&id).unwrap().failure_reason(),
            Some("declined")
        );
    }

    #[test]
    fn unknown_payment_rejected() {
        let mut o = order(100);
        let err = o.complete_payment(&PaymentId::new("pay-x"), None, now());
        assert!(matches!(err, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn inventory_lines_mirror_order_lines() {
        let o = order(200);
        let lines = o.inventory_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].1, 2);
    }
}
