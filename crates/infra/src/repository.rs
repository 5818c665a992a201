//! Repositories for products, campaigns and orders.
//!
//! Repositories hand out owned copies. Callers mutate the copy and `save` it
//! back; nothing outside a repository holds a live reference to stored state.

use std::sync::Arc;

use retailsim_campaigns::Campaign;
use retailsim_core::{
    AggregateRoot, CampaignName, Code, DomainError, DomainResult, Entity, OrderId,
};
use retailsim_products::Product;
use retailsim_sales::Order;

use crate::storage::{InMemoryKeyedStore, KeyedStore};

pub trait ProductRepository: Send + Sync {
    fn get(&self, code: &Code) -> DomainResult<Product>;

    /// Store a new product. Fails with `AlreadyExists` on a duplicate code.
    fn create(&self, product: Product) -> DomainResult<()>;

    /// Replace a stored product with its updated copy.
    fn save(&self, product: Product) -> DomainResult<()>;
}

pub trait CampaignRepository: Send + Sync {
    fn get(&self, name: &CampaignName) -> DomainResult<Campaign>;

    fn create(&self, campaign: Campaign) -> DomainResult<()>;

    fn save(&self, campaign: Campaign) -> DomainResult<()>;

    fn exists(&self, name: &CampaignName) -> DomainResult<bool>;

    /// Every campaign, in name order.
    fn all(&self) -> DomainResult<Vec<Campaign>>;
}

pub trait OrderRepository: Send + Sync {
    fn create(&self, order: Order) -> DomainResult<()>;

    fn count(&self) -> DomainResult<usize>;
}

impl<R: ProductRepository + ?Sized> ProductRepository for Arc<R> {
    fn get(&self, code: &Code) -> DomainResult<Product> {
        (**self).get(code)
    }

    fn create(&self, product: Product) -> DomainResult<()> {
        (**self).create(product)
    }

    fn save(&self, product: Product) -> DomainResult<()> {
        (**self).save(product)
    }
}

impl<R: CampaignRepository + ?Sized> CampaignRepository for Arc<R> {
    fn get(&self, name: &CampaignName) -> DomainResult<Campaign> {
        (**self).get(name)
    }

    fn create(&self, campaign: Campaign) -> DomainResult<()> {
        (**self).create(campaign)
    }

    fn save(&self, campaign: Campaign) -> DomainResult<()> {
        (**self).save(campaign)
    }

    fn exists(&self, name: &CampaignName) -> DomainResult<bool> {
        (**self).exists(name)
    }

    fn all(&self) -> DomainResult<Vec<Campaign>> {
        (**self).all()
    }
}

impl<R: OrderRepository + ?Sized> OrderRepository for Arc<R> {
    fn create(&self, order: Order) -> DomainResult<()> {
        (**self).create(order)
    }

    fn count(&self) -> DomainResult<usize> {
        (**self).count()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    store: InMemoryKeyedStore<Code, Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn get(&self, code: &Code) -> DomainResult<Product> {
        self.store
            .get(code)?
            .ok_or_else(|| DomainError::not_found("Product not found"))
    }

    fn create(&self, product: Product) -> DomainResult<()> {
        if !self.store.insert_new(product.id().clone(), product)? {
            return Err(DomainError::already_exists("Product already exist"));
        }
        Ok(())
    }

    fn save(&self, product: Product) -> DomainResult<()> {
        if !self.store.contains(product.id())? {
            return Err(DomainError::not_found("Product not found"));
        }
        self.store.upsert(product.id().clone(), product)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCampaignRepository {
    store: InMemoryKeyedStore<CampaignName, Campaign>,
}

impl InMemoryCampaignRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CampaignRepository for InMemoryCampaignRepository {
    fn get(&self, name: &CampaignName) -> DomainResult<Campaign> {
        self.store
            .get(name)?
            .ok_or_else(|| DomainError::not_found("Campaign not found"))
    }

    fn create(&self, campaign: Campaign) -> DomainResult<()> {
        if !self.store.insert_new(campaign.id().clone(), campaign)? {
            return Err(DomainError::already_exists("Campaign already exist"));
        }
        Ok(())
    }

    fn save(&self, campaign: Campaign) -> DomainResult<()> {
        if !self.store.contains(campaign.id())? {
            return Err(DomainError::not_found("Campaign not found"));
        }
        self.store.upsert(campaign.id().clone(), campaign)
    }

    fn exists(&self, name: &CampaignName) -> DomainResult<bool> {
        self.store.contains(name)
    }

    fn all(&self) -> DomainResult<Vec<Campaign>> {
        self.store.values()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    store: InMemoryKeyedStore<OrderId, Order>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: Order) -> DomainResult<()> {
        if !self.store.insert_new(*order.id(), order)? {
            return Err(DomainError::already_exists("Order already exist"));
        }
        Ok(())
    }

    fn count(&self) -> DomainResult<usize> {
        self.store.len()
    }
}
