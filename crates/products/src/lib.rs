//! Products domain module.
//!
//! This crate contains the Product aggregate and the demand-driven repricing
//! formula, implemented purely as deterministic domain logic (no IO, no
//! storage).

pub mod pricing;
pub mod product;

pub use pricing::{demand_price, sales_rate};
pub use product::{
    AttachCampaign, CampaignAttached, CampaignDetached, CreateProduct, DemandRecorded,
    DetachCampaign, PriceChanged, Product, ProductCommand, ProductCreated, ProductEvent,
    RecordDemand, Reprice, SellStock, StockSold,
};
