//! Command execution session.
//!
//! `RetailEngine` owns the simulated clock, the repositories and the event
//! bus. Every operation follows the same pipeline:
//!
//! ```text
//! validate primitives
//!   ↓
//! load aggregates (owned copies)
//!   ↓
//! decide (pure `handle` / plan functions, no mutation)
//!   ↓
//! persist (order first, then aggregates)
//!   ↓
//! publish committed events
//! ```
//!
//! A failure before the persist step leaves storage untouched. Mutating
//! operations take `&mut self`, so one command runs to completion before the
//! next starts.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use retailsim_campaigns::{Campaign, CampaignCommand, CampaignEvent, CreateCampaign, plan_tick};
use retailsim_core::{
    Aggregate, AggregateRoot, CampaignName, Code, DomainError, Duration, Entity, OrderId, Price,
    PriceManipulationLimit, Quantity, SimulatedClock, Stock, TargetSalesCount,
};
use retailsim_events::{Event, EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use retailsim_products::{AttachCampaign, CreateProduct, Product, ProductCommand, ProductEvent, RecordDemand};
use retailsim_sales::{Order, plan_order};

use crate::repository::{
    CampaignRepository, InMemoryCampaignRepository, InMemoryOrderRepository,
    InMemoryProductRepository, OrderRepository, ProductRepository,
};

pub const PRODUCT_AGGREGATE: &str = "products.product";
pub const CAMPAIGN_AGGREGATE: &str = "campaigns.campaign";
pub const ORDER_AGGREGATE: &str = "sales.order";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Publication failed after the state change was saved.
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl EngineError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(err) => Some(err),
            EngineError::Publish(_) => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

pub type EnvelopeBus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;

/// Single-node retail session.
#[derive(Debug)]
pub struct RetailEngine<
    P = InMemoryProductRepository,
    C = InMemoryCampaignRepository,
    O = InMemoryOrderRepository,
    B = EnvelopeBus,
> {
    clock: SimulatedClock,
    products: P,
    campaigns: C,
    orders: O,
    bus: B,
}

impl RetailEngine {
    /// A fresh session on in-memory storage, clock at hour 0.
    pub fn in_memory() -> Self {
        Self::new(
            InMemoryProductRepository::new(),
            InMemoryCampaignRepository::new(),
            InMemoryOrderRepository::new(),
            Arc::new(InMemoryEventBus::new()),
        )
    }
}

impl Default for RetailEngine {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<P, C, O, B> RetailEngine<P, C, O, B> {
    pub fn new(products: P, campaigns: C, orders: O, bus: B) -> Self {
        Self {
            clock: SimulatedClock::new(),
            products,
            campaigns,
            orders,
            bus,
        }
    }

    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    pub fn products(&self) -> &P {
        &self.products
    }

    pub fn campaigns(&self) -> &C {
        &self.campaigns
    }

    pub fn orders(&self) -> &O {
        &self.orders
    }
}

impl<P, C, O, B> RetailEngine<P, C, O, B>
where
    P: ProductRepository,
    C: CampaignRepository,
    O: OrderRepository,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Subscribe to every envelope published from now on.
    pub fn subscribe(&self) -> Subscription<EventEnvelope<JsonValue>> {
        self.bus.subscribe()
    }

    pub fn create_product(&mut self, code: &str, price: f64, stock: i64) -> EngineResult<Product> {
        let result = self.try_create_product(code, price, stock);
        rejected("create_product", result)
    }

    /// Look a product up. Every lookup counts as one unit of demand.
    pub fn get_product_info(&mut self, code: &str) -> EngineResult<Product> {
        let result = self.try_get_product_info(code);
        rejected("get_product_info", result)
    }

    pub fn place_order(&mut self, code: &str, quantity: i64) -> EngineResult<Order> {
        let result = self.try_place_order(code, quantity);
        rejected("place_order", result)
    }

    pub fn create_campaign(
        &mut self,
        name: &str,
        code: &str,
        duration: i64,
        limit: i64,
        target_sales_count: i64,
    ) -> EngineResult<Campaign> {
        let result = self.try_create_campaign(name, code, duration, limit, target_sales_count);
        rejected("create_campaign", result)
    }

    pub fn get_campaign_info(&self, name: &str) -> EngineResult<Campaign> {
        let result = self.try_get_campaign_info(name);
        rejected("get_campaign_info", result)
    }

    /// Advance the simulated clock by `hours`, counting down every campaign and
    /// repricing the products of those still running.
    ///
    /// Every campaign's product is resolved and every step is planned before
    /// anything is saved; one unresolvable campaign aborts the whole advance
    /// and leaves the clock where it was.
    pub fn advance_time(&mut self, hours: i64) -> EngineResult<SimulatedClock> {
        let result = self.try_advance_time(hours);
        rejected("advance_time", result)
    }

    fn try_create_product(&mut self, code: &str, price: f64, stock: i64) -> EngineResult<Product> {
        let code = Code::new(code)?;
        let price = Price::new(price)?;
        let stock = Stock::new(stock)?;

        let mut product = Product::empty(code.clone());
        let events = product.execute(&ProductCommand::CreateProduct(CreateProduct {
            code: code.clone(),
            price,
            stock,
        }))?;
        self.products.create(product.clone())?;

        tracing::info!(code = %code, price = price.value(), stock = stock.value(), "product created");
        self.publish(PRODUCT_AGGREGATE, code.as_str(), product.version(), &events)?;
        Ok(product)
    }

    fn try_get_product_info(&mut self, code: &str) -> EngineResult<Product> {
        let code = Code::new(code)?;
        let mut product = self.products.get(&code)?;

        let events = product.execute(&ProductCommand::RecordDemand(RecordDemand {
            units: Quantity::new(1)?,
        }))?;
        self.products.save(product.clone())?;

        tracing::debug!(code = %code, demand = product.total_demand(), "product looked up");
        self.publish(PRODUCT_AGGREGATE, code.as_str(), product.version(), &events)?;
        Ok(product)
    }

    fn try_get_campaign_info(&self, name: &str) -> EngineResult<Campaign> {
        let name = CampaignName::new(name)?;
        Ok(self.campaigns.get(&name)?)
    }

    fn try_place_order(&mut self, code: &str, quantity: i64) -> EngineResult<Order> {
        let code = Code::new(code)?;
        let quantity = Quantity::new(quantity)?;

        let mut product = self.products.get(&code)?;
        let mut campaign = match product.campaign() {
            Some(name) => Some(self.campaigns.get(name)?),
            None => None,
        };

        let plan = plan_order(
            OrderId::new(),
            &product,
            campaign.as_ref(),
            quantity,
            self.clock.now(),
        )?;
        tracing::debug!(
            code = %code,
            product_events = plan.product_events.len(),
            campaign_events = plan.campaign_events.len(),
            "order planned"
        );

        self.orders.create(plan.order.clone())?;

        plan.apply(&mut product, campaign.as_mut());
        self.products.save(product.clone())?;
        if let Some(campaign) = &campaign {
            if !plan.campaign_events.is_empty() {
                self.campaigns.save(campaign.clone())?;
            }
        }

        tracing::info!(
            order_id = %plan.order.id(),
            code = %code,
            quantity = quantity.value(),
            stock = product.stock(),
            "order placed"
        );
        if plan.ends_campaign() {
            tracing::info!(code = %code, "campaign target reached");
        }

        self.publish(ORDER_AGGREGATE, &plan.order.key(), 1, &[plan.order.placed()])?;
        self.publish(PRODUCT_AGGREGATE, code.as_str(), product.version(), &plan.product_events)?;
        if let Some(campaign) = &campaign {
            self.publish(
                CAMPAIGN_AGGREGATE,
                campaign.name().as_str(),
                campaign.version(),
                &plan.campaign_events,
            )?;
        }

        Ok(plan.order)
    }

    fn try_create_campaign(
        &mut self,
        name: &str,
        code: &str,
        duration: i64,
        limit: i64,
        target_sales_count: i64,
    ) -> EngineResult<Campaign> {
        let name = CampaignName::new(name)?;
        if self.campaigns.exists(&name)? {
            return Err(DomainError::already_exists("Campaign already exist").into());
        }

        let code = Code::new(code)?;
        let mut product = self.products.get(&code)?;

        let duration = Duration::new(duration)?;
        let price_manipulation_limit = PriceManipulationLimit::new(limit)?;
        let target_sales_count = TargetSalesCount::new(target_sales_count)?;

        let mut campaign = Campaign::empty(name.clone());
        let campaign_events = campaign.handle(&CampaignCommand::CreateCampaign(CreateCampaign {
            name: name.clone(),
            product: code.clone(),
            duration,
            price_manipulation_limit,
            target_sales_count,
            product_stock: Stock::new(product.stock())?,
        }))?;
        let product_events = product.handle(&ProductCommand::AttachCampaign(AttachCampaign {
            campaign: name.clone(),
        }))?;

        campaign.apply_all(&campaign_events);
        product.apply_all(&product_events);
        self.campaigns.create(campaign.clone())?;
        self.products.save(product.clone())?;

        tracing::info!(
            name = %name,
            code = %code,
            duration = duration.value(),
            limit = price_manipulation_limit.value(),
            target = target_sales_count.value(),
            "campaign created"
        );
        self.publish(CAMPAIGN_AGGREGATE, name.as_str(), campaign.version(), &campaign_events)?;
        self.publish(PRODUCT_AGGREGATE, code.as_str(), product.version(), &product_events)?;
        Ok(campaign)
    }

    fn try_advance_time(&mut self, hours: i64) -> EngineResult<SimulatedClock> {
        let hours =
            Duration::new(hours).map_err(|_| DomainError::validation("Hour must be positive"))?;
        let next_clock = self.clock.advanced_by(hours);

        let campaigns = self.campaigns.all()?;
        if campaigns.is_empty() {
            return Err(DomainError::business_rule("No campaign found").into());
        }

        // Working copies: nothing below touches storage until every plan succeeded.
        let mut products: BTreeMap<Code, Product> = BTreeMap::new();
        let mut changed: Vec<(Campaign, Vec<CampaignEvent>, Vec<ProductEvent>)> = Vec::new();

        for mut campaign in campaigns {
            let code = campaign
                .product_code()
                .cloned()
                .ok_or_else(|| DomainError::business_rule("Campaign does not have product"))?;
            let product = match products.entry(code.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let product = self.products.get(&code).map_err(|err| {
                        if err.is_not_found() {
                            DomainError::business_rule("Campaign does not have product")
                        } else {
                            err
                        }
                    })?;
                    entry.insert(product)
                }
            };

            let plan = plan_tick(&campaign, product, hours)?;
            if plan.is_empty() {
                continue;
            }
            tracing::debug!(
                name = %campaign.name(),
                code = %code,
                ends = plan.ends_campaign(),
                "campaign tick planned"
            );
            plan.apply(&mut campaign, product);
            changed.push((campaign, plan.campaign_events, plan.product_events));
        }

        for (campaign, _, _) in &changed {
            self.campaigns.save(campaign.clone())?;
        }
        for product in products.values() {
            self.products.save(product.clone())?;
        }
        self.clock = next_clock;

        tracing::info!(
            hours = hours.value(),
            elapsed = self.clock.elapsed_hours(),
            campaigns = changed.len(),
            "time advanced"
        );

        for (campaign, campaign_events, product_events) in &changed {
            self.publish(
                CAMPAIGN_AGGREGATE,
                campaign.name().as_str(),
                campaign.version(),
                campaign_events,
            )?;
            if let Some(code) = campaign.product_code() {
                let version = products.get(code).map(|p| p.version()).unwrap_or(0);
                self.publish(PRODUCT_AGGREGATE, code.as_str(), version, product_events)?;
            }
        }

        Ok(self.clock)
    }

    /// Wrap `events` in envelopes and publish them.
    ///
    /// `version` is the aggregate version after the last of `events` was
    /// applied; sequence numbers count back from it.
    fn publish<E>(
        &self,
        aggregate_type: &str,
        aggregate_key: &str,
        version: u64,
        events: &[E],
    ) -> EngineResult<()>
    where
        E: Event + Serialize,
    {
        let first = version.saturating_sub(events.len() as u64);
        for (offset, event) in events.iter().enumerate() {
            let envelope = EventEnvelope::from_typed(
                aggregate_type,
                aggregate_key,
                first + offset as u64 + 1,
                self.clock.now(),
                event,
            )
            .map_err(|e| EngineError::Publish(e.to_string()))?;
            self.bus
                .publish(envelope)
                .map_err(|e| EngineError::Publish(format!("{e:?}")))?;
        }
        Ok(())
    }
}

fn rejected<T>(operation: &'static str, result: EngineResult<T>) -> EngineResult<T> {
    if let Err(err) = &result {
        tracing::warn!(operation, error = %err, "command rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailsim_core::Status;

    #[test]
    fn create_product_validates_before_storing() {
        let mut engine = RetailEngine::in_memory();
        assert!(engine.create_product("", 1.0, 1).is_err());
        assert!(engine.create_product("P1", 0.0, 1).is_err());
        assert!(engine.create_product("P1", 1.0, -1).is_err());
        assert!(engine.get_product_info("P1").is_err());
    }

    #[test]
    fn duplicate_product_is_already_exists() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        let err = engine.create_product("P1", 50.0, 5).unwrap_err();
        assert_eq!(err.to_string(), "Product already exist");
    }

    #[test]
    fn product_info_counts_demand() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        engine.get_product_info("P1").unwrap();
        let product = engine.get_product_info("P1").unwrap();
        assert_eq!(product.total_demand(), 2);
    }

    #[test]
    fn campaign_requires_existing_product() {
        let mut engine = RetailEngine::in_memory();
        let err = engine.create_campaign("C1", "P1", 10, 20, 5).unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn duplicate_campaign_name_is_rejected() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        engine.create_product("P2", 100.0, 100).unwrap();
        engine.create_campaign("C1", "P1", 10, 20, 5).unwrap();
        let err = engine.create_campaign("C1", "P2", 10, 20, 5).unwrap_err();
        assert_eq!(err.to_string(), "Campaign already exist");
    }

    #[test]
    fn second_active_campaign_on_product_is_rejected() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        engine.create_campaign("C1", "P1", 10, 20, 5).unwrap();
        let err = engine.create_campaign("C2", "P1", 10, 20, 5).unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::BusinessRule(_))));
        assert!(engine.get_campaign_info("C2").is_err());
    }

    #[test]
    fn campaign_target_above_stock_is_rejected() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 10).unwrap();
        let err = engine.create_campaign("C1", "P1", 10, 20, 11).unwrap_err();
        assert_eq!(err.to_string(), "Target sales count must be less than stock");
        let product = engine.get_product_info("P1").unwrap();
        assert!(product.campaign().is_none());
    }

    #[test]
    fn new_campaign_allowed_after_previous_ended() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        engine.create_campaign("C1", "P1", 1, 20, 5).unwrap();
        engine.advance_time(1).unwrap();
        engine.create_campaign("C2", "P1", 5, 20, 5).unwrap();
        assert_eq!(engine.get_campaign_info("C1").unwrap().status(), Status::Ended);
        assert_eq!(engine.get_campaign_info("C2").unwrap().status(), Status::Active);
    }

    #[test]
    fn advance_time_without_campaigns_fails_and_keeps_clock() {
        let mut engine = RetailEngine::in_memory();
        let err = engine.advance_time(3).unwrap_err();
        assert_eq!(err.to_string(), "No campaign found");
        assert_eq!(engine.clock().elapsed_hours(), 0);
    }

    #[test]
    fn advance_time_rejects_non_positive_hours() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        engine.create_campaign("C1", "P1", 10, 20, 5).unwrap();
        let err = engine.advance_time(0).unwrap_err();
        assert_eq!(err.to_string(), "Hour must be positive");
    }

    #[test]
    fn order_is_stored_once_placed() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        let order = engine.place_order("P1", 10).unwrap();
        assert_eq!(order.quantity().value(), 10);
        assert_eq!(engine.orders().count().unwrap(), 1);

        assert!(engine.place_order("P1", 1000).is_err());
        assert_eq!(engine.orders().count().unwrap(), 1);
    }

    #[test]
    fn committed_events_are_published_with_sequence_numbers() {
        let mut engine = RetailEngine::in_memory();
        let sub = engine.subscribe();

        engine.create_product("P1", 100.0, 100).unwrap();
        engine.get_product_info("P1").unwrap();

        let envelopes = sub.drain();
        assert_eq!(envelopes.len(), 2);
        assert_eq!(envelopes[0].event_type(), "products.product.created");
        assert_eq!(envelopes[0].sequence_number(), 1);
        assert_eq!(envelopes[1].event_type(), "products.product.demand_recorded");
        assert_eq!(envelopes[1].sequence_number(), 2);
        assert_eq!(envelopes[1].aggregate_key(), "P1");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn invalid_campaign_name_is_logged_as_rejected() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let engine = RetailEngine::in_memory();

        let err = tracing::subscriber::with_default(subscriber, || {
            engine.get_campaign_info("").unwrap_err()
        });
        assert!(err.domain().is_some_and(DomainError::is_validation));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("command rejected"), "{output}");
        assert!(output.contains("get_campaign_info"), "{output}");
    }

    #[test]
    fn rejected_commands_publish_nothing() {
        let mut engine = RetailEngine::in_memory();
        engine.create_product("P1", 100.0, 100).unwrap();
        let sub = engine.subscribe();

        assert!(engine.place_order("P1", 500).is_err());
        assert!(sub.drain().is_empty());
    }
}
