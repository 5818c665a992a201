//! One time-advance step for a single campaign and its product.
//!
//! Planning is pure: it decides the events for both aggregates without
//! touching either, so the engine can plan every campaign first and only
//! apply once all plans succeeded.

use retailsim_core::{Aggregate, DomainError, Duration, PriceManipulationLimit};
use retailsim_products::{DetachCampaign, Product, ProductCommand, ProductEvent, Reprice};

use crate::campaign::{Campaign, CampaignCommand, CampaignEvent, ElapseTime};

/// Events decided for one campaign/product pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickPlan {
    pub campaign_events: Vec<CampaignEvent>,
    pub product_events: Vec<ProductEvent>,
}

impl TickPlan {
    pub fn is_empty(&self) -> bool {
        self.campaign_events.is_empty() && self.product_events.is_empty()
    }

    /// True when this step closes the campaign.
    pub fn ends_campaign(&self) -> bool {
        self.campaign_events.iter().any(CampaignEvent::is_end)
    }

    pub fn apply(&self, campaign: &mut Campaign, product: &mut Product) {
        campaign.apply_all(&self.campaign_events);
        product.apply_all(&self.product_events);
    }
}

/// Decide what `hours` of simulated time do to `campaign` and its `product`.
///
/// - An ended campaign is left alone.
/// - A campaign whose countdown reaches zero ends; its product is detached and
///   returns to its initial price, without repricing this cycle.
/// - Otherwise the countdown shrinks and the product is repriced within the
///   campaign's manipulation limit.
pub fn plan_tick(
    campaign: &Campaign,
    product: &Product,
    hours: Duration,
) -> Result<TickPlan, DomainError> {
    if !campaign.is_active() {
        return Ok(TickPlan::default());
    }
    if campaign.product_code() != Some(product.code()) {
        return Err(DomainError::invariant(format!(
            "campaign {} does not belong to product {}",
            campaign.name(),
            product.code()
        )));
    }

    let campaign_events = campaign.handle(&CampaignCommand::ElapseTime(ElapseTime { hours }))?;
    let ended = campaign_events.iter().any(CampaignEvent::is_end);

    let product_events = if ended {
        if product.campaign() == Some(campaign.name()) {
            product.handle(&ProductCommand::DetachCampaign(DetachCampaign {
                campaign: campaign.name().clone(),
            }))?
        } else {
            vec![]
        }
    } else {
        let limit = PriceManipulationLimit::new(campaign.price_manipulation_limit())?;
        product.handle(&ProductCommand::Reprice(Reprice { limit }))?
    };

    Ok(TickPlan {
        campaign_events,
        product_events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailsim_core::{
        CampaignName, Code, Price, Quantity, Status, Stock, TargetSalesCount,
    };
    use retailsim_products::{AttachCampaign, CreateProduct, RecordDemand, SellStock};

    use crate::campaign::{CreateCampaign, RecordSales};

    fn setup(duration: i64, stock: i64) -> (Campaign, Product) {
        let code = Code::new("P1").unwrap();
        let name = CampaignName::new("C1").unwrap();

        let mut product = Product::empty(code.clone());
        product
            .execute(&ProductCommand::CreateProduct(CreateProduct {
                code: code.clone(),
                price: Price::new(100.0).unwrap(),
                stock: Stock::new(stock).unwrap(),
            }))
            .unwrap();

        let mut campaign = Campaign::empty(name.clone());
        campaign
            .execute(&CampaignCommand::CreateCampaign(CreateCampaign {
                name: name.clone(),
                product: code,
                duration: Duration::new(duration).unwrap(),
                price_manipulation_limit: PriceManipulationLimit::new(20).unwrap(),
                target_sales_count: TargetSalesCount::new(stock).unwrap(),
                product_stock: Stock::new(stock).unwrap(),
            }))
            .unwrap();
        product
            .execute(&ProductCommand::AttachCampaign(AttachCampaign { campaign: name }))
            .unwrap();

        (campaign, product)
    }

    fn hours(h: i64) -> Duration {
        Duration::new(h).unwrap()
    }

    #[test]
    fn expiring_campaign_detaches_and_restores_price() {
        let (mut campaign, mut product) = setup(1, 100);
        product
            .execute(&ProductCommand::RecordDemand(RecordDemand {
                units: Quantity::new(1).unwrap(),
            }))
            .unwrap();

        let plan = plan_tick(&campaign, &product, hours(1)).unwrap();
        assert!(plan.ends_campaign());
        plan.apply(&mut campaign, &mut product);

        assert_eq!(campaign.status(), Status::Ended);
        assert_eq!(campaign.remaining_hours(), 0);
        assert!(product.campaign().is_none());
        assert_eq!(product.price(), 100.0);
    }

    #[test]
    fn running_campaign_reprices_product() {
        let (mut campaign, mut product) = setup(10, 100);
        product
            .execute(&ProductCommand::SellStock(SellStock {
                quantity: Quantity::new(50).unwrap(),
            }))
            .unwrap();

        let plan = plan_tick(&campaign, &product, hours(1)).unwrap();
        assert!(!plan.ends_campaign());
        plan.apply(&mut campaign, &mut product);

        assert_eq!(campaign.remaining_hours(), 9);
        assert_eq!(product.price(), 120.0);
    }

    #[test]
    fn ended_campaign_plans_nothing() {
        let (mut campaign, product) = setup(10, 100);
        campaign
            .execute(&CampaignCommand::RecordSales(RecordSales {
                quantity: Quantity::new(100).unwrap(),
                unit_price: Price::new(100.0).unwrap(),
            }))
            .unwrap();
        assert_eq!(campaign.status(), Status::Ended);

        let plan = plan_tick(&campaign, &product, hours(3)).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn planning_does_not_mutate() {
        let (campaign, product) = setup(2, 100);
        let (c, p) = (campaign.clone(), product.clone());
        let _ = plan_tick(&campaign, &product, hours(5)).unwrap();
        assert_eq!(campaign, c);
        assert_eq!(product, p);
    }

    #[test]
    fn mismatched_product_is_rejected() {
        let (campaign, _) = setup(2, 100);
        let other_code = Code::new("P2").unwrap();
        let mut other = Product::empty(other_code.clone());
        other
            .execute(&ProductCommand::CreateProduct(CreateProduct {
                code: other_code,
                price: Price::new(5.0).unwrap(),
                stock: Stock::new(5).unwrap(),
            }))
            .unwrap();

        let err = plan_tick(&campaign, &other, hours(1)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }
}
