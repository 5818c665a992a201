//! Command parsing.

use std::str::FromStr;

use thiserror::Error;

use retailsim_infra::EngineError;

/// Failure of a single interpreted command.
///
/// Parse failures carry the operator-facing message; engine failures show the
/// domain error text unchanged.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command not found")]
    CommandNotFound,
    #[error("Invalid parameters")]
    InvalidParameters,
    #[error("Price must be float")]
    PriceMustBeFloat,
    #[error("Stock must be integer")]
    StockMustBeInteger,
    #[error("Quantity must be integer")]
    QuantityMustBeInteger,
    #[error("Duration must be integer")]
    DurationMustBeInteger,
    #[error("Limit must be integer")]
    LimitMustBeInteger,
    #[error("Target sales must be integer")]
    TargetSalesMustBeInteger,
    #[error("Hour must be integer")]
    HourMustBeInteger,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A parsed interpreter command with raw (not yet validated) arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateProduct {
        code: String,
        price: f64,
        stock: i64,
    },
    GetProductInfo {
        code: String,
    },
    CreateOrder {
        code: String,
        quantity: i64,
    },
    CreateCampaign {
        name: String,
        code: String,
        duration: i64,
        limit: i64,
        target_sales_count: i64,
    },
    GetCampaignInfo {
        name: String,
    },
    IncreaseTime {
        hours: i64,
    },
}

impl Command {
    /// Parse a tokenized line: the command name followed by its parameters.
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let Some((name, params)) = args.split_first() else {
            return Err(CommandError::CommandNotFound);
        };

        match *name {
            "create_product" => {
                let [code, price, stock] = exact::<3>(params)?;
                Ok(Command::CreateProduct {
                    code: code.to_string(),
                    price: number(price, CommandError::PriceMustBeFloat)?,
                    stock: number(stock, CommandError::StockMustBeInteger)?,
                })
            }
            "get_product_info" => {
                let [code] = exact::<1>(params)?;
                Ok(Command::GetProductInfo {
                    code: code.to_string(),
                })
            }
            "create_order" => {
                let [code, quantity] = exact::<2>(params)?;
                Ok(Command::CreateOrder {
                    code: code.to_string(),
                    quantity: number(quantity, CommandError::QuantityMustBeInteger)?,
                })
            }
            "create_campaign" => {
                let [name, code, duration, limit, target] = exact::<5>(params)?;
                Ok(Command::CreateCampaign {
                    name: name.to_string(),
                    code: code.to_string(),
                    duration: number(duration, CommandError::DurationMustBeInteger)?,
                    limit: number(limit, CommandError::LimitMustBeInteger)?,
                    target_sales_count: number(target, CommandError::TargetSalesMustBeInteger)?,
                })
            }
            "get_campaign_info" => {
                let [name] = exact::<1>(params)?;
                Ok(Command::GetCampaignInfo {
                    name: name.to_string(),
                })
            }
            "increase_time" => {
                let [hours] = exact::<1>(params)?;
                Ok(Command::IncreaseTime {
                    hours: number(hours, CommandError::HourMustBeInteger)?,
                })
            }
            _ => Err(CommandError::CommandNotFound),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateProduct { .. } => "create_product",
            Command::GetProductInfo { .. } => "get_product_info",
            Command::CreateOrder { .. } => "create_order",
            Command::CreateCampaign { .. } => "create_campaign",
            Command::GetCampaignInfo { .. } => "get_campaign_info",
            Command::IncreaseTime { .. } => "increase_time",
        }
    }
}

fn exact<'a, const N: usize>(params: &[&'a str]) -> Result<[&'a str; N], CommandError> {
    <[&'a str; N]>::try_from(params).map_err(|_| CommandError::InvalidParameters)
}

fn number<T: FromStr>(raw: &str, err: CommandError) -> Result<T, CommandError> {
    raw.parse().map_err(|_| err)
}
