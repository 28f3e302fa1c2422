//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing domain events to external subscribers
//! (notifications, analytics, the excluded request layer).

use async_trait::async_trait;

use crate::domain::events::SettlementEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Connection error.
    #[error("event publish connection error: {message}")]
    ConnectionError {
        /// What went wrong.
        message: String,
    },

    /// Publishing failed.
    #[error("event publish failed: {message}")]
    PublishFailed {
        /// What went wrong.
        message: String,
    },
}

/// Port for publishing settlement events.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish a batch of events, in order.
    async fn publish_events(&self, events: Vec<SettlementEvent>) -> Result<(), EventPublishError>;

    /// Publish a single event.
    async fn publish_event(&self, event: SettlementEvent) -> Result<(), EventPublishError> {
        self.publish_events(vec![event]).await
    }
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_events(&self, _events: Vec<SettlementEvent>) -> Result<(), EventPublishError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{Money, OrderId, OrderNumber, Timestamp, UserId};

    #[tokio::test]
    async fn no_op_publisher_succeeds() {
        let publisher = NoOpEventPublisher;

        let event = SettlementEvent::OrderCreated {
            order_id: OrderId::new("ord-1"),
            order_number: OrderNumber::new("ORD-20260615-ABCD1234"),
            user_id: UserId::new("usr-1"),
            total: Money::from_major(200),
            at: Timestamp::now(),
        };

        assert!(publisher.publish_event(event).await.is_ok());
    }
}
