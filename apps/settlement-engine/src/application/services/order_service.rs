//! Order service: checkout, status transitions, payment settlement.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::referral_service::convert_referral;
use crate::application::ports::{CatalogPort, EventPublisherPort, ResolvedItem};
use crate::domain::catalog::ItemKey;
use crate::domain::coupon::{CouponUsage, CouponValidator};
use crate::domain::events::SettlementEvent;
use crate::domain::order::{
    Address, NewOrderParams, Order, OrderLine, OrderStatus, Payment, PaymentMethod,
};
use crate::domain::points::{PointsAccount, PointsError, PointsPolicy};
use crate::domain::pricing::{PricingCalculator, PricingInput, ShippingMethod};
use crate::domain::shared::{
    CouponCode, Money, OrderId, OrderNumber, PaymentId, Points, Timestamp, UserId,
};
use crate::error::SettlementError;
use crate::infrastructure::persistence::SettlementStore;

/// Checkout inputs from the request layer.
#[derive(Debug, Clone)]
pub struct CheckoutInput {
    /// Chosen delivery method.
    pub shipping_method: ShippingMethod,
    /// Where to ship.
    pub shipping_address: Address,
    /// Billing address, defaults to shipping when absent.
    pub billing_address: Option<Address>,
    /// Coupon code to apply.
    pub coupon_code: Option<CouponCode>,
    /// Loyalty points the buyer wants to redeem.
    pub points_to_use: u64,
}

/// The gateway's verdict on a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// Funds captured.
    Completed,
    /// Payment rejected.
    Failed,
}

/// Gateway webhook payload for payment settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentWebhook {
    /// Our payment id, echoed back by the gateway.
    pub payment_id: PaymentId,
    /// The gateway's own reference.
    pub external_payment_id: Option<String>,
    /// Verdict.
    pub status: PaymentOutcome,
    /// Opaque gateway detail blob.
    pub provider_details: Option<serde_json::Value>,
}

impl PaymentWebhook {
    /// Failure reason extracted from the provider details, when present.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        self.provider_details
            .as_ref()
            .and_then(|d| d.get("failure_reason"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }
}

/// The order engine: turns carts into orders and drives their lifecycle.
pub struct OrderService {
    store: Arc<SettlementStore>,
    catalog: Arc<dyn CatalogPort>,
    events: Arc<dyn EventPublisherPort>,
    pricing: PricingCalculator,
    points_policy: PointsPolicy,
}

impl OrderService {
    /// Create the service.
    #[must_use]
    pub fn new(
        store: Arc<SettlementStore>,
        catalog: Arc<dyn CatalogPort>,
        events: Arc<dyn EventPublisherPort>,
        pricing: PricingCalculator,
        points_policy: PointsPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            events,
            pricing,
            points_policy,
        }
    }

    /// Convert the user's cart into an immutable order.
    ///
    /// Lines are re-priced against the current catalog, inventory is
    /// reserved all-or-nothing, the coupon and points are validated with
    /// specific errors, and everything commits as one unit of work. The
    /// cart is cleared on success. Points earned are stored on the order
    /// but credited only on delivery.
    ///
    /// # Errors
    ///
    /// Any failing step aborts the whole checkout with no state applied.
    pub async fn create_order(
        &self,
        user_id: &UserId,
        input: CheckoutInput,
    ) -> Result<Order, SettlementError> {
        let items = self
            .store
            .read(|s| {
                s.carts
                    .get(user_id)
                    .map(|c| c.available_items().cloned().collect::<Vec<_>>())
            })
            .unwrap_or_default();
        if items.is_empty() {
            return Err(SettlementError::validation("cart is empty"));
        }

        // Current prices come from the catalog, outside the lock; the
        // cart's cached prices are never trusted.
        let mut resolved: HashMap<ItemKey, ResolvedItem> = HashMap::new();
        for item in &items {
            let entry = self.catalog.resolve(&item.key).await?.ok_or_else(|| {
                SettlementError::validation(format!("item {} is no longer available", item.key))
            })?;
            if !entry.is_sellable {
                return Err(SettlementError::validation(format!(
                    "item {} is no longer available",
                    item.key
                )));
            }
            resolved.insert(item.key.clone(), entry);
        }

        let now = Timestamp::now();
        let (order, events) = self.store.commit(move |state| {
            let cart = state
                .carts
                .get(user_id)
                .ok_or_else(|| SettlementError::validation("cart is empty"))?;

            let lines: Vec<OrderLine> = cart
                .available_items()
                .map(|item| {
                    let entry = resolved.get(&item.key).ok_or_else(|| {
                        SettlementError::validation(format!(
                            "item {} is no longer available",
                            item.key
                        ))
                    })?;
                    Ok(OrderLine::new(
                        item.key.clone(),
                        entry.name.clone(),
                        item.quantity,
                        entry.unit_price,
                        entry.is_digital,
                    ))
                })
                .collect::<Result<_, SettlementError>>()?;
            if lines.is_empty() {
                return Err(SettlementError::validation("cart is empty"));
            }
            for line in &lines {
                if !line.unit_price.is_positive() {
                    return Err(SettlementError::validation(format!(
                        "item {} has no valid price",
                        line.key
                    )));
                }
            }

            let inventory_lines: Vec<(ItemKey, u32)> =
                lines.iter().map(|l| (l.key.clone(), l.quantity)).collect();
            state.inventory.reserve_all(&inventory_lines)?;

            let subtotal: Money = lines.iter().map(|l| l.line_total).sum();
            let all_digital = lines.iter().all(|l| l.is_digital);

            let mut coupon_discount = Money::ZERO;
            let mut redeemed_coupon = None;
            if let Some(code) = &input.coupon_code {
                let coupon = state
                    .coupons
                    .get(code)
                    .ok_or_else(|| SettlementError::not_found("Coupon", code))?;
                let global_uses = state.coupon_uses(&coupon.id);
                let user_uses = state.coupon_uses_by(&coupon.id, user_id);
                coupon_discount =
                    CouponValidator::validate(coupon, subtotal, global_uses, user_uses, now)?;
                redeemed_coupon = Some(coupon.id.clone());
            }

            // The requested points must be covered by the balance before
            // any capping; a capped spend must not hide an over-request.
            let points_requested = Points::new(input.points_to_use);
            let balance = state
                .points
                .get(user_id)
                .map_or(Points::ZERO, PointsAccount::balance);
            if points_requested > balance {
                return Err(PointsError::InsufficientPoints {
                    requested: points_requested,
                    balance,
                }
                .into());
            }

            let breakdown = self.pricing.compute(&PricingInput {
                subtotal,
                shipping_method: input.shipping_method,
                destination_country: input.shipping_address.country.clone(),
                all_digital,
                coupon_discount,
                points_requested,
            });

            state
                .points_account_mut(user_id)
                .spend(breakdown.points_used, now)?;

            let mut number = OrderNumber::generate(now.date());
            while state.order_numbers.contains_key(&number) {
                number = OrderNumber::generate(now.date());
            }

            let points_earned = self.points_policy.points_for_order(breakdown.total);
            let mut order = Order::create(NewOrderParams {
                user_id: user_id.clone(),
                number,
                lines,
                breakdown,
                shipping_method: input.shipping_method,
                shipping_address: input.shipping_address.clone(),
                billing_address: input.billing_address.clone(),
                coupon_code: input.coupon_code.clone(),
                points_earned,
                now,
            });

            if let Some(coupon_id) = redeemed_coupon {
                state.coupon_usage.push(CouponUsage {
                    coupon_id,
                    user_id: user_id.clone(),
                    order_id: order.id().clone(),
                    used_at: now,
                });
            }

            let events = order.drain_events();
            state
                .order_numbers
                .insert(order.number().clone(), order.id().clone());
            state.carts.remove(user_id);
            state.orders.insert(order.id().clone(), order.clone());
            Ok::<_, SettlementError>((order, events))
        })?;

        self.publish(events).await;
        info!(
            order = %order.number(),
            user = %user_id,
            total = %order.total(),
            "order created"
        );
        Ok(order)
    }

    /// Move an order through its state machine, applying side effects.
    ///
    /// Delivery credits the order's earned points and attributes the
    /// buyer's referral best-effort; cancellation restores inventory and
    /// refunds spent points. All of it commits as one unit of work.
    ///
    /// # Errors
    ///
    /// Returns the state machine's rejection for illegal moves; the
    /// order is left untouched.
    pub async fn transition_status(
        &self,
        order_id: &OrderId,
        new_status: OrderStatus,
        reason: Option<String>,
    ) -> Result<Order, SettlementError> {
        let now = Timestamp::now();
        let (order, events) = self.store.commit(move |state| {
            let (user_id, lines, points_used, points_earned) = {
                let order = state
                    .orders
                    .get_mut(order_id)
                    .ok_or_else(|| SettlementError::not_found("Order", order_id))?;
                match new_status {
                    OrderStatus::Cancelled => order.cancel(reason.clone(), now)?,
                    status => order.transition_to(status, now)?,
                }
                (
                    order.user_id().clone(),
                    order.inventory_lines(),
                    order.points_used(),
                    order.points_earned(),
                )
            };

            let mut extra_events = Vec::new();
            match new_status {
                OrderStatus::Cancelled => {
                    state.inventory.release_all(&lines);
                    state
                        .points_account_mut(&user_id)
                        .refund(points_used, "order cancelled", now);
                }
                OrderStatus::Delivered => {
                    state
                        .points_account_mut(&user_id)
                        .earn(points_earned, "order delivered", now);
                    // Attribution is best-effort; it never fails delivery.
                    match convert_referral(state, order_id, now) {
                        Ok(Some(event)) => extra_events.push(event),
                        Ok(None) => {}
                        Err(skip_reason) => {
                            warn!(order = %order_id, %skip_reason, "referral conversion skipped");
                        }
                    }
                }
                _ => {}
            }

            let order = state
                .orders
                .get_mut(order_id)
                .ok_or_else(|| SettlementError::not_found("Order", order_id))?;
            let mut events = order.drain_events();
            events.extend(extra_events);
            Ok::<_, SettlementError>((order.clone(), events))
        })?;

        self.publish(events).await;
        info!(order = %order.number(), status = %new_status, "order status changed");
        Ok(order)
    }

    /// Open a pending payment against an order.
    ///
    /// # Errors
    ///
    /// Fails for an unknown order or a non-positive amount.
    pub async fn record_payment(
        &self,
        order_id: &OrderId,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<Payment, SettlementError> {
        if !amount.is_positive() {
            return Err(SettlementError::validation(
                "payment amount must be positive",
            ));
        }
        let now = Timestamp::now();
        let payment = self.store.commit(move |state| {
            let order = state
                .orders
                .get_mut(order_id)
                .ok_or_else(|| SettlementError::not_found("Order", order_id))?;
            let payment = order.record_payment(amount, method, now).clone();
            state
                .payments_index
                .insert(payment.id().clone(), order_id.clone());
            Ok::<_, SettlementError>(payment)
        })?;

        info!(order = %order_id, payment = %payment.id(), %amount, "payment recorded");
        Ok(payment)
    }

    /// Settle a payment from the gateway's webhook.
    ///
    /// A completed payment that fully pays a pending order advances it
    /// to processing. A failure is recorded and returned as `Ok`; the
    /// order is never cancelled automatically, a failed payment is a
    /// recoverable state.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::PaymentProcessing`] for an unknown
    /// payment id or a payment that was already settled.
    pub async fn settle_payment(
        &self,
        webhook: PaymentWebhook,
    ) -> Result<Payment, SettlementError> {
        let now = Timestamp::now();
        let (payment, events) = self.store.commit(|state| {
            let order_id = state
                .payments_index
                .get(&webhook.payment_id)
                .cloned()
                .ok_or_else(|| {
                    SettlementError::payment(format!("unknown payment {}", webhook.payment_id))
                })?;
            let order = state
                .orders
                .get_mut(&order_id)
                .ok_or_else(|| SettlementError::not_found("Order", &order_id))?;

            match webhook.status {
                PaymentOutcome::Completed => {
                    order
                        .complete_payment(
                            &webhook.payment_id,
                            webhook.external_payment_id.clone(),
                            now,
                        )
                        .map_err(|e| SettlementError::payment(e.to_string()))?;
                    if order.is_paid() && order.status() == OrderStatus::Pending {
                        order.transition_to(OrderStatus::Processing, now)?;
                    }
                }
                PaymentOutcome::Failed => {
                    order
                        .fail_payment(&webhook.payment_id, webhook.failure_reason(), now)
                        .map_err(|e| SettlementError::payment(e.to_string()))?;
                }
            }

            let payment = order
                .find_payment(&webhook.payment_id)
                .cloned()
                .ok_or_else(|| {
                    SettlementError::payment(format!("unknown payment {}", webhook.payment_id))
                })?;
            let events = order.drain_events();
            Ok::<_, SettlementError>((payment, events))
        })?;

        self.publish(events).await;
        info!(
            payment = %payment.id(),
            status = %payment.status(),
            "payment settled"
        );
        Ok(payment)
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::NotFound`] for an unknown order.
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, SettlementError> {
        self.store
            .read(|s| s.orders.get(order_id).cloned())
            .ok_or_else(|| SettlementError::not_found("Order", order_id))
    }

    async fn publish(&self, events: Vec<SettlementEvent>) {
        if events.is_empty() {
            return;
        }
        if let Err(publish_err) = self.events.publish_events(events).await {
            warn!(%publish_err, "event publish failed");
        }
    }
}
