//! Domain Layer
//!
//! Bounded contexts of the settlement engine. Pure business logic; no
//! I/O, no locks, no clocks (time is always passed in).

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod events;
pub mod inventory;
pub mod merchant;
pub mod order;
pub mod points;
pub mod pricing;
pub mod shared;
