//! Application Layer
//!
//! Ports to external collaborators and the services that orchestrate
//! domain logic against the store.

pub mod ports;
pub mod services;
