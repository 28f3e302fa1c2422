//! Infrastructure Layer
//!
//! Adapters behind the application ports and the unit-of-work store.

pub mod catalog;
pub mod persistence;
