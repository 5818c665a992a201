use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retailsim_core::{Code, Entity, OrderId, Price, Quantity};
use retailsim_events::Event;

/// A fulfilled purchase of one product.
///
/// Orders are write-only audit records: they are stored once and never read
/// back by the pricing or campaign logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    product: Code,
    quantity: Quantity,
    /// Live product price when the order was placed.
    unit_price: Price,
    placed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: OrderId,
        product: Code,
        quantity: Quantity,
        unit_price: Price,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product,
            quantity,
            unit_price,
            placed_at,
        }
    }

    pub fn product(&self) -> &Code {
        &self.product
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    pub fn total(&self) -> f64 {
        self.unit_price.value() * self.quantity.value() as f64
    }

    /// The event announcing this order once it has been stored.
    pub fn placed(&self) -> OrderPlaced {
        OrderPlaced {
            order_id: self.id,
            product: self.product.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub product: Code,
    pub quantity: Quantity,
    pub unit_price: Price,
}

impl Event for OrderPlaced {
    fn event_type(&self) -> &'static str {
        "sales.order.placed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_price_times_quantity() {
        let order = Order::new(
            OrderId::new(),
            Code::new("P1").unwrap(),
            Quantity::new(3).unwrap(),
            Price::new(12.5).unwrap(),
            DateTime::<Utc>::default(),
        );
        assert_eq!(order.total(), 37.5);
    }

    #[test]
    fn placed_event_carries_order_identity() {
        let id = OrderId::new();
        let order = Order::new(
            id,
            Code::new("P1").unwrap(),
            Quantity::new(1).unwrap(),
            Price::new(1.0).unwrap(),
            DateTime::<Utc>::default(),
        );
        let placed = order.placed();
        assert_eq!(placed.order_id, id);
        assert_eq!(order.id(), &id);
        assert_eq!(placed.event_type(), "sales.order.placed");
    }
}
