use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Identity record mirrored from the identity provider; never mutated here.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog entry; read-only to the cart workflow. A game without a price
/// entry is treated as costing zero.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[schema(value_type = Option<String>)]
    pub price_per_unit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Cart line. The price is snapshotted when the game is first added and is
/// not refreshed on later catalog price changes.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub game_id: i64,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price_per_unit: Decimal,
    pub created_at: DateTime<Utc>,
}
