use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Flat cart line: an item joined with its game name. This is both what the
/// cart page renders and what an order payload item looks like on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartLine {
    pub name: String,
    #[schema(value_type = String)]
    pub price_per_unit: Decimal,
    pub game_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub is_empty: bool,
}
