//! Money arithmetic for carts and orders.
//!
//! All amounts are `rust_decimal::Decimal` carried at two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Regional VAT applied to every order subtotal (16%).
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// Smallest price a product may carry.
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price of one line: `unit_price * quantity`.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    round_money(unit_price * Decimal::from(quantity))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

impl OrderTotals {
    /// Computes totals from `(unit_price, quantity)` lines.
    ///
    /// `total = subtotal + tax + shipping - discount`, with tax rounded to
    /// cents before it is added.
    pub fn compute<I>(lines: I, shipping_cost: Decimal, discount_amount: Decimal) -> Self
    where
        I: IntoIterator<Item = (Decimal, i32)>,
    {
        let subtotal = lines
            .into_iter()
            .map(|(price, quantity)| line_total(price, quantity))
            .fold(Decimal::ZERO, |acc, line| acc + line);
        let subtotal = round_money(subtotal);
        let tax_amount = round_money(subtotal * TAX_RATE);
        let shipping_cost = round_money(shipping_cost);
        let discount_amount = round_money(discount_amount);
        let total_amount = subtotal + tax_amount + shipping_cost - discount_amount;

        Self {
            subtotal,
            tax_amount,
            shipping_cost,
            discount_amount,
            total_amount,
        }
    }
}
