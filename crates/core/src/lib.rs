//! `retailsim-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! validated value primitives, the error taxonomy, aggregate traits and the
//! simulated clock.

pub mod aggregate;
pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use clock::SimulatedClock;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EventId, OrderId};
pub use value_object::{
    CampaignName, Code, Demand, Duration, Price, PriceManipulationLimit, Quantity, Status, Stock,
    TargetSalesCount, ValueObject,
};
