//! Order status state machine.

use super::status::OrderStatus;
use crate::domain::shared::DomainError;

/// Guards order status transitions.
///
/// ```text
/// pending -> processing -> shipped -> delivered -> refunded
///    |           |
///    +-----------+--> cancelled
/// ```
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Whether a transition between two statuses is allowed.
    #[must_use]
    pub const fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::{Cancelled, Delivered, Pending, Processing, Refunded, Shipped};
        matches!(
            (from, to),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
                | (Delivered, Refunded)
        )
    }

    /// Validate a transition, with a reason on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] when the move is
    /// not in the transition table.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), DomainError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                entity: "Order".to_string(),
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("allowed next states: {:?}", Self::valid_next_states(from)),
            })
        }
    }

    /// All statuses reachable from the given one.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        use OrderStatus::{Cancelled, Delivered, Pending, Processing, Refunded, Shipped};
        match from {
            Pending => vec![Processing, Cancelled],
            Processing => vec![Shipped, Cancelled],
            Shipped => vec![Delivered],
            Delivered => vec![Refunded],
            Cancelled | Refunded => vec![],
        }
    }
}
