//! Infrastructure layer: keyed storage, repositories and the command
//! execution session.

pub mod engine;
pub mod repository;
pub mod storage;


pub use engine::{
    CAMPAIGN_AGGREGATE, EngineError, EngineResult, EnvelopeBus, ORDER_AGGREGATE,
    PRODUCT_AGGREGATE, RetailEngine,
};
pub use repository::{
    CampaignRepository, InMemoryCampaignRepository, InMemoryOrderRepository,
    InMemoryProductRepository, OrderRepository, ProductRepository,
};
pub use storage::{InMemoryKeyedStore, KeyedStore};
