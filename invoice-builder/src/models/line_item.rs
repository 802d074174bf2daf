use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

fn compute_amount(quantity: Decimal, unit_price: Decimal) -> Decimal {
    (quantity * unit_price).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// One line of an invoice draft.
///
/// The amount is always quantity times unit price rounded half away from
/// zero to cents, so it can only change through the setters. The sort
/// order is assigned at construction and never recomputed; the draft's
/// display order is the collection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    amount: Decimal,
    sort_order: i32,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        sort_order: i32,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            amount: compute_amount(quantity, unit_price),
            sort_order,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.amount = compute_amount(self.quantity, self.unit_price);
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.amount = compute_amount(self.quantity, self.unit_price);
    }
}
