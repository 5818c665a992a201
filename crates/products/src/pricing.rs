//! Demand-driven repricing.
//!
//! The signal is the share of cumulative demand that converted into sales:
//!
//! ```text
//! sell_count   = initial_stock - stock
//! sales_rate   = sell_count / total_demand * 100
//! price_change = (sales_rate - 50) * limit / 50
//! new_price    = initial_price + price_change
//! ```
//!
//! A 50% conversion keeps the initial price; full conversion adds `limit`,
//! zero conversion subtracts it.

/// Percentage of cumulative demand that turned into sales.
///
/// `None` when nothing was ever requested: the rate is undefined and callers
/// skip repricing.
pub fn sales_rate(initial_stock: i64, stock: i64, total_demand: i64) -> Option<f64> {
    if total_demand <= 0 {
        return None;
    }
    let sell_count = (initial_stock - stock) as f64;
    Some(sell_count / total_demand as f64 * 100.0)
}

/// Price the formula yields for the given product state, or `None` when no
/// repricing applies (sold out, or no demand recorded yet).
///
/// The result is not validated; a non-positive value is the caller's problem.
pub fn demand_price(
    initial_price: f64,
    initial_stock: i64,
    stock: i64,
    total_demand: i64,
    limit: i64,
) -> Option<f64> {
    if stock == 0 {
        return None;
    }
    let rate = sales_rate(initial_stock, stock, total_demand)?;
    let price_change = (rate - 50.0) * limit as f64 / 50.0;
    Some(initial_price + price_change)
}
