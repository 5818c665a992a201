//! Campaigns domain module.
//!
//! A campaign is a time- and target-bounded promotion attached to one product.
//! It tracks campaign-attributable sales separately from ordinary sales and
//! caps how far the product price may swing while it is active.

pub mod campaign;
pub mod tick;

pub use campaign::{
    Campaign, CampaignCommand, CampaignCreated, CampaignEnded, CampaignEvent, CreateCampaign,
    DurationElapsed, ElapseTime, EndReason, RecordSales, SalesRecorded,
};
pub use tick::{TickPlan, plan_tick};
