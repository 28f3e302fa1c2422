//! Application Ports
//!
//! Driven-port interfaces to external collaborators.

mod catalog_port;
mod event_publisher_port;

pub use catalog_port::{CatalogError, CatalogPort, ResolvedItem};
pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
