//! Order Bounded Context
//!
//! The immutable order aggregate and its state machines. Lines and the
//! price breakdown are frozen at creation; only status, tracking stamps,
//! and payment associations change afterwards.

mod aggregate;
mod payment;
mod state_machine;
mod status;

pub use aggregate::{Address, NewOrderParams, Order, OrderLine};
pub use payment::{Payment, PaymentMethod};
pub use state_machine::OrderStateMachine;
pub use status::{OrderStatus, PaymentStatus};
