//! Response lines for successful commands.

use retailsim_campaigns::Campaign;
use retailsim_core::SimulatedClock;
use retailsim_products::Product;
use retailsim_sales::Order;

pub fn product_created(product: &Product) -> String {
    format!(
        "Product created; code {}, price {:.1}, stock {}",
        product.code(),
        product.price(),
        product.stock()
    )
}

pub fn product_info(product: &Product) -> String {
    format!(
        "Product {} info; price {:.1}, stock {}",
        product.code(),
        product.price(),
        product.stock()
    )
}

pub fn order_created(order: &Order) -> String {
    format!(
        "Order created; product {}, quantity {}",
        order.product(),
        order.quantity()
    )
}

pub fn campaign_created(campaign: &Campaign) -> String {
    let product = campaign
        .product_code()
        .map(|code| code.as_str())
        .unwrap_or_default();
    format!(
        "Campaign created; name {}, product {}, duration {}, limit {}, target sales count {}",
        campaign.name(),
        product,
        campaign.duration(),
        campaign.price_manipulation_limit(),
        campaign.target_sales_count()
    )
}

pub fn campaign_info(campaign: &Campaign) -> String {
    format!(
        "Campaign {} info; Status {}, Target Sales {}, Total Sales {}, Turnover {:.1}, Average Item Price {:.1}",
        campaign.name(),
        campaign.status(),
        campaign.target_sales_count(),
        campaign.total_sales(),
        campaign.turnover(),
        campaign.average_item_price()
    )
}

pub fn time(clock: &SimulatedClock) -> String {
    format!("Time is {clock}")
}
