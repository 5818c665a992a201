use serde::{Deserialize, Serialize};

use retailsim_core::{
    Aggregate, AggregateRoot, CampaignName, Code, DomainError, Duration, Price,
    PriceManipulationLimit, Quantity, Status, Stock, TargetSalesCount,
};
use retailsim_events::Event;

/// Aggregate root: Campaign.
///
/// The campaign refers to its product by code only; the engine resolves the
/// product through its repository when it needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    name: CampaignName,
    product: Option<Code>,
    duration: i64,
    remaining_hours: i64,
    price_manipulation_limit: i64,
    target_sales_count: i64,
    total_sales: i64,
    average_item_price: f64,
    status: Status,
    version: u64,
    created: bool,
}

impl Campaign {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(name: CampaignName) -> Self {
        Self {
            name,
            product: None,
            duration: 0,
            remaining_hours: 0,
            price_manipulation_limit: 0,
            target_sales_count: 0,
            total_sales: 0,
            average_item_price: 0.0,
            status: Status::Active,
            version: 0,
            created: false,
        }
    }

    pub fn name(&self) -> &CampaignName {
        &self.name
    }

    /// Code of the product the campaign was created for.
    pub fn product_code(&self) -> Option<&Code> {
        self.product.as_ref()
    }

    /// Duration the campaign was created with, in hours.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Hours left before the campaign ends on its own.
    pub fn remaining_hours(&self) -> i64 {
        self.remaining_hours
    }

    pub fn price_manipulation_limit(&self) -> i64 {
        self.price_manipulation_limit
    }

    pub fn target_sales_count(&self) -> i64 {
        self.target_sales_count
    }

    pub fn total_sales(&self) -> i64 {
        self.total_sales
    }

    pub fn average_item_price(&self) -> f64 {
        self.average_item_price
    }

    /// Revenue attributed to the campaign.
    pub fn turnover(&self) -> f64 {
        self.total_sales as f64 * self.average_item_price
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.created && self.status.is_active()
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for Campaign {
    type Id = CampaignName;

    fn id(&self) -> &Self::Id {
        &self.name
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateCampaign.
///
/// `product_stock` is the product's stock at creation time; the target may not
/// exceed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub name: CampaignName,
    pub product: Code,
    pub duration: Duration,
    pub price_manipulation_limit: PriceManipulationLimit,
    pub target_sales_count: TargetSalesCount,
    pub product_stock: Stock,
}

/// Command: RecordSales. Counts the campaign-attributable part of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSales {
    pub quantity: Quantity,
    pub unit_price: Price,
}

/// Command: ElapseTime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapseTime {
    pub hours: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CampaignCommand {
    CreateCampaign(CreateCampaign),
    RecordSales(RecordSales),
    ElapseTime(ElapseTime),
}

/// Why a campaign was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    TargetReached,
    DurationElapsed,
}

/// Event: CampaignCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCreated {
    pub name: CampaignName,
    pub product: Code,
    pub duration: Duration,
    pub price_manipulation_limit: PriceManipulationLimit,
    pub target_sales_count: TargetSalesCount,
}

/// Event: SalesRecorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecorded {
    pub name: CampaignName,
    pub counted: Quantity,
    pub unit_price: Price,
    pub total_sales: i64,
    pub average_item_price: f64,
}

/// Event: DurationElapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationElapsed {
    pub name: CampaignName,
    pub hours: Duration,
    pub remaining_hours: i64,
}

/// Event: CampaignEnded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignEnded {
    pub name: CampaignName,
    pub reason: EndReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CampaignEvent {
    CampaignCreated(CampaignCreated),
    SalesRecorded(SalesRecorded),
    DurationElapsed(DurationElapsed),
    CampaignEnded(CampaignEnded),
}

impl CampaignEvent {
    pub fn is_end(&self) -> bool {
        matches!(self, CampaignEvent::CampaignEnded(_))
    }
}

impl Event for CampaignEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CampaignEvent::CampaignCreated(_) => "campaigns.campaign.created",
            CampaignEvent::SalesRecorded(_) => "campaigns.campaign.sales_recorded",
            CampaignEvent::DurationElapsed(_) => "campaigns.campaign.duration_elapsed",
            CampaignEvent::CampaignEnded(_) => "campaigns.campaign.ended",
        }
    }
}

impl Aggregate for Campaign {
    type Command = CampaignCommand;
    type Event = CampaignEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CampaignEvent::CampaignCreated(e) => {
                self.name = e.name.clone();
                self.product = Some(e.product.clone());
                self.duration = e.duration.value();
                self.remaining_hours = e.duration.value();
                self.price_manipulation_limit = e.price_manipulation_limit.value();
                self.target_sales_count = e.target_sales_count.value();
                self.total_sales = 0;
                self.average_item_price = 0.0;
                self.status = Status::Active;
                self.created = true;
            }
            CampaignEvent::SalesRecorded(e) => {
                self.total_sales = e.total_sales;
                self.average_item_price = e.average_item_price;
            }
            CampaignEvent::DurationElapsed(e) => {
                self.remaining_hours = e.remaining_hours;
            }
            CampaignEvent::CampaignEnded(_) => {
                self.status = Status::Ended;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CampaignCommand::CreateCampaign(cmd) => self.handle_create(cmd),
            CampaignCommand::RecordSales(cmd) => self.handle_record_sales(cmd),
            CampaignCommand::ElapseTime(cmd) => self.handle_elapse(cmd),
        }
    }
}

impl Campaign {
    fn ensure_active(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found("Campaign not found"));
        }
        if !self.status.is_active() {
            return Err(DomainError::invariant(format!(
                "campaign {} has ended",
                self.name
            )));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateCampaign) -> Result<Vec<CampaignEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("campaign already exists"));
        }
        if cmd.name != self.name {
            return Err(DomainError::invariant("campaign name mismatch"));
        }
        if cmd.target_sales_count.value() > cmd.product_stock.value() {
            return Err(DomainError::business_rule(
                "Target sales count must be less than stock",
            ));
        }

        Ok(vec![CampaignEvent::CampaignCreated(CampaignCreated {
            name: cmd.name.clone(),
            product: cmd.product.clone(),
            duration: cmd.duration,
            price_manipulation_limit: cmd.price_manipulation_limit,
            target_sales_count: cmd.target_sales_count,
        })])
    }

    fn handle_record_sales(&self, cmd: &RecordSales) -> Result<Vec<CampaignEvent>, DomainError> {
        self.ensure_active()?;

        let quantity = cmd.quantity.value();
        let remaining = self.target_sales_count - (quantity + self.total_sales);
        let target_reached = remaining <= 0;
        let counted = if target_reached {
            self.target_sales_count - self.total_sales
        } else {
            quantity
        };
        let counted = Quantity::new(counted)?;

        let before = self.total_sales;
        let after = before + counted.value();
        let unit_price = cmd.unit_price.value();
        let average_item_price = if before == 0 {
            unit_price
        } else {
            (self.average_item_price * before as f64 + unit_price * counted.value() as f64)
                / after as f64
        };

        let mut events = vec![CampaignEvent::SalesRecorded(SalesRecorded {
            name: self.name.clone(),
            counted,
            unit_price: cmd.unit_price,
            total_sales: after,
            average_item_price,
        })];
        if target_reached {
            events.push(CampaignEvent::CampaignEnded(CampaignEnded {
                name: self.name.clone(),
                reason: EndReason::TargetReached,
            }));
        }
        Ok(events)
    }

    fn handle_elapse(&self, cmd: &ElapseTime) -> Result<Vec<CampaignEvent>, DomainError> {
        self.ensure_active()?;

        let remaining_hours = (self.remaining_hours - cmd.hours.value()).max(0);

        let mut events = vec![CampaignEvent::DurationElapsed(DurationElapsed {
            name: self.name.clone(),
            hours: cmd.hours,
            remaining_hours,
        })];
        if remaining_hours == 0 {
            events.push(CampaignEvent::CampaignEnded(CampaignEnded {
                name: self.name.clone(),
                reason: EndReason::DurationElapsed,
            }));
        }
        Ok(events)
    }
}
