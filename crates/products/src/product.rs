use serde::{Deserialize, Serialize};

use retailsim_core::{
    Aggregate, AggregateRoot, CampaignName, Code, Demand, DomainError, Price,
    PriceManipulationLimit, Quantity, Stock,
};
use retailsim_events::Event;

use crate::pricing;

/// Aggregate root: Product.
///
/// Holds the live price and stock, the snapshot taken at creation, the
/// cumulative demand counter and the name of at most one attached campaign.
/// The campaign itself lives in its own repository and is resolved by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    code: Code,
    price: f64,
    stock: i64,
    initial_price: f64,
    initial_stock: i64,
    total_demand: i64,
    campaign: Option<CampaignName>,
    version: u64,
    created: bool,
}

impl Product {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(code: Code) -> Self {
        Self {
            code,
            price: 0.0,
            stock: 0,
            initial_price: 0.0,
            initial_stock: 0,
            total_demand: 0,
            campaign: None,
            version: 0,
            created: false,
        }
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    pub fn initial_stock(&self) -> i64 {
        self.initial_stock
    }

    pub fn total_demand(&self) -> i64 {
        self.total_demand
    }

    /// Name of the campaign currently attached, if any.
    pub fn campaign(&self) -> Option<&CampaignName> {
        self.campaign.as_ref()
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// The live price as a validated primitive.
    pub fn unit_price(&self) -> Result<Price, DomainError> {
        Price::new(self.price)
    }
}

impl AggregateRoot for Product {
    type Id = Code;

    fn id(&self) -> &Self::Id {
        &self.code
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub code: Code,
    pub price: Price,
    pub stock: Stock,
}

/// Command: SellStock. Takes units off the shelf and counts them as demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellStock {
    pub quantity: Quantity,
}

/// Command: RecordDemand. Counts interest that did not (yet) turn into a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDemand {
    pub units: Quantity,
}

/// Command: AttachCampaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachCampaign {
    pub campaign: CampaignName,
}

/// Command: DetachCampaign. Restores the initial price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachCampaign {
    pub campaign: CampaignName,
}

/// Command: Reprice. Applies the demand formula within `limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reprice {
    pub limit: PriceManipulationLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductCommand {
    CreateProduct(CreateProduct),
    SellStock(SellStock),
    RecordDemand(RecordDemand),
    AttachCampaign(AttachCampaign),
    DetachCampaign(DetachCampaign),
    Reprice(Reprice),
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub code: Code,
    pub price: Price,
    pub stock: Stock,
}

/// Event: StockSold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSold {
    pub code: Code,
    pub quantity: Quantity,
    pub remaining: Stock,
    pub total_demand: Demand,
}

/// Event: DemandRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecorded {
    pub code: Code,
    pub units: Quantity,
    pub total_demand: Demand,
}

/// Event: CampaignAttached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignAttached {
    pub code: Code,
    pub campaign: CampaignName,
}

/// Event: CampaignDetached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDetached {
    pub code: Code,
    pub campaign: CampaignName,
    pub restored_price: Price,
}

/// Event: PriceChanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChanged {
    pub code: Code,
    pub from: f64,
    pub to: Price,
    pub sales_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    StockSold(StockSold),
    DemandRecorded(DemandRecorded),
    CampaignAttached(CampaignAttached),
    CampaignDetached(CampaignDetached),
    PriceChanged(PriceChanged),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated(_) => "products.product.created",
            ProductEvent::StockSold(_) => "products.product.stock_sold",
            ProductEvent::DemandRecorded(_) => "products.product.demand_recorded",
            ProductEvent::CampaignAttached(_) => "products.product.campaign_attached",
            ProductEvent::CampaignDetached(_) => "products.product.campaign_detached",
            ProductEvent::PriceChanged(_) => "products.product.price_changed",
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductCreated(e) => {
                self.code = e.code.clone();
                self.price = e.price.value();
                self.stock = e.stock.value();
                self.initial_price = e.price.value();
                self.initial_stock = e.stock.value();
                self.total_demand = 0;
                self.campaign = None;
                self.created = true;
            }
            ProductEvent::StockSold(e) => {
                self.stock = e.remaining.value();
                self.total_demand = e.total_demand.value();
            }
            ProductEvent::DemandRecorded(e) => {
                self.total_demand = e.total_demand.value();
            }
            ProductEvent::CampaignAttached(e) => {
                self.campaign = Some(e.campaign.clone());
            }
            ProductEvent::CampaignDetached(e) => {
                self.campaign = None;
                self.price = e.restored_price.value();
            }
            ProductEvent::PriceChanged(e) => {
                self.price = e.to.value();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::CreateProduct(cmd) => self.handle_create(cmd),
            ProductCommand::SellStock(cmd) => self.handle_sell(cmd),
            ProductCommand::RecordDemand(cmd) => self.handle_record_demand(cmd),
            ProductCommand::AttachCampaign(cmd) => self.handle_attach(cmd),
            ProductCommand::DetachCampaign(cmd) => self.handle_detach(cmd),
            ProductCommand::Reprice(cmd) => self.handle_reprice(cmd),
        }
    }
}

impl Product {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found("Product not found"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("product already exists"));
        }
        if cmd.code != self.code {
            return Err(DomainError::invariant("product code mismatch"));
        }

        Ok(vec![ProductEvent::ProductCreated(ProductCreated {
            code: cmd.code.clone(),
            price: cmd.price,
            stock: cmd.stock,
        })])
    }

    fn handle_sell(&self, cmd: &SellStock) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_created()?;

        let requested = cmd.quantity.value();
        if self.stock < requested {
            return Err(DomainError::insufficient_stock(requested, self.stock));
        }
        let remaining = Stock::new(self.stock - requested)?;
        let total_demand = self.demand_after(cmd.quantity)?;

        Ok(vec![ProductEvent::StockSold(StockSold {
            code: self.code.clone(),
            quantity: cmd.quantity,
            remaining,
            total_demand,
        })])
    }

    fn handle_record_demand(&self, cmd: &RecordDemand) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_created()?;

        let total_demand = self.demand_after(cmd.units)?;

        Ok(vec![ProductEvent::DemandRecorded(DemandRecorded {
            code: self.code.clone(),
            units: cmd.units,
            total_demand,
        })])
    }

    fn demand_after(&self, units: Quantity) -> Result<Demand, DomainError> {
        let total = self
            .total_demand
            .checked_add(units.value())
            .ok_or_else(|| DomainError::validation("Demand is out of range"))?;
        Demand::new(total)
    }

    fn handle_attach(&self, cmd: &AttachCampaign) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_created()?;

        if let Some(current) = &self.campaign {
            return Err(DomainError::business_rule(format!(
                "Product already has an active campaign ({current})"
            )));
        }

        Ok(vec![ProductEvent::CampaignAttached(CampaignAttached {
            code: self.code.clone(),
            campaign: cmd.campaign.clone(),
        })])
    }

    fn handle_detach(&self, cmd: &DetachCampaign) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_created()?;

        if self.campaign.as_ref() != Some(&cmd.campaign) {
            return Err(DomainError::invariant(format!(
                "campaign {} is not attached to product {}",
                cmd.campaign, self.code
            )));
        }

        Ok(vec![ProductEvent::CampaignDetached(CampaignDetached {
            code: self.code.clone(),
            campaign: cmd.campaign.clone(),
            restored_price: Price::new(self.initial_price)?,
        })])
    }

    fn handle_reprice(&self, cmd: &Reprice) -> Result<Vec<ProductEvent>, DomainError> {
        self.ensure_created()?;

        let Some(new_price) = pricing::demand_price(
            self.initial_price,
            self.initial_stock,
            self.stock,
            self.total_demand,
            cmd.limit.value(),
        ) else {
            tracing::debug!(code = %self.code, stock = self.stock, demand = self.total_demand, "repricing skipped");
            return Ok(vec![]);
        };

        let to = Price::new(new_price).map_err(|_| {
            DomainError::validation(format!(
                "Invalid price: repricing {} would set {new_price:.2}",
                self.code
            ))
        })?;

        if to.value() == self.price {
            return Ok(vec![]);
        }

        let sales_rate =
            pricing::sales_rate(self.initial_stock, self.stock, self.total_demand).unwrap_or(0.0);

        Ok(vec![ProductEvent::PriceChanged(PriceChanged {
            code: self.code.clone(),
            from: self.price,
            to,
            sales_rate,
        })])
    }
}
