//! Sales domain module.
//!
//! This crate contains the order record and the order-fulfillment decision,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod fulfillment;
pub mod order;

pub use fulfillment::{FulfillmentPlan, plan_order};
pub use order::{Order, OrderPlaced};
