//! Order fulfillment decision.
//!
//! `plan_order` decides every event a purchase causes on the product and on
//! its attached campaign, without touching either aggregate. The caller
//! stores the order first and applies the plan only once storage accepted it.

use chrono::{DateTime, Utc};

use retailsim_campaigns::{Campaign, CampaignCommand, CampaignEvent, RecordSales};
use retailsim_core::{Aggregate, DomainError, OrderId, Quantity};
use retailsim_products::{DetachCampaign, Product, ProductCommand, ProductEvent, SellStock};

use crate::order::Order;

/// Everything a single order decides.
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentPlan {
    pub order: Order,
    pub product_events: Vec<ProductEvent>,
    pub campaign_events: Vec<CampaignEvent>,
}

impl FulfillmentPlan {
    /// True when the order closes the product's campaign by reaching its target.
    pub fn ends_campaign(&self) -> bool {
        self.campaign_events.iter().any(CampaignEvent::is_end)
    }

    pub fn apply(&self, product: &mut Product, campaign: Option<&mut Campaign>) {
        product.apply_all(&self.product_events);
        if let Some(campaign) = campaign {
            campaign.apply_all(&self.campaign_events);
        }
    }
}

/// Decide the effects of ordering `quantity` units of `product`.
///
/// `campaign` is the campaign currently attached to the product, if any. Only
/// an active campaign counts the sale; once the order reaches the campaign
/// target the overflow is an ordinary sale, the campaign ends and the product
/// is detached from it at its initial price.
pub fn plan_order(
    order_id: OrderId,
    product: &Product,
    campaign: Option<&Campaign>,
    quantity: Quantity,
    placed_at: DateTime<Utc>,
) -> Result<FulfillmentPlan, DomainError> {
    let mut product_events =
        product.handle(&ProductCommand::SellStock(SellStock { quantity }))?;
    let unit_price = product.unit_price()?;

    let order = Order::new(
        order_id,
        product.code().clone(),
        quantity,
        unit_price,
        placed_at,
    );

    let Some(campaign) = campaign.filter(|c| c.is_active()) else {
        return Ok(FulfillmentPlan {
            order,
            product_events,
            campaign_events: vec![],
        });
    };

    if product.campaign() != Some(campaign.name()) {
        return Err(DomainError::invariant(format!(
            "campaign {} is not attached to product {}",
            campaign.name(),
            product.code()
        )));
    }

    let campaign_events = campaign.handle(&CampaignCommand::RecordSales(RecordSales {
        quantity,
        unit_price,
    }))?;

    if campaign_events.iter().any(CampaignEvent::is_end) {
        let mut preview = product.clone();
        preview.apply_all(&product_events);
        product_events.extend(preview.handle(&ProductCommand::DetachCampaign(
            DetachCampaign {
                campaign: campaign.name().clone(),
            },
        ))?);
    }

    Ok(FulfillmentPlan {
        order,
        product_events,
        campaign_events,
    })
}
