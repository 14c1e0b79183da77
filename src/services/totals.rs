use rust_decimal::Decimal;

use crate::dto::cart::CartLine;

/// Order total: sum of price_per_unit * quantity over the lines, rounded to
/// two places. An empty cart totals zero; the cart page and the order payload
/// both go through here so the two can never disagree.
pub fn order_total(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price_per_unit * Decimal::from(line.quantity))
        .sum::<Decimal>()
        .round_dp(2)
}
