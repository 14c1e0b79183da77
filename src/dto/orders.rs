use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::cart::CartLine;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCustomer {
    pub customer_id: i64,
    pub email: String,
    pub name: String,
}

/// Wire body for `POST /api/order/add/` on the order service. Built from the
/// cart at submission time and discarded afterwards; nothing here is
/// persisted locally.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderPayload {
    pub items: Vec<CartLine>,
    pub order_customer: OrderCustomer,
    #[schema(value_type = String)]
    pub total: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderSubmitted {
    pub order_id: i64,
}

/// Past orders as returned by the order service; summaries are opaque to
/// this service and passed through to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderHistory {
    #[schema(value_type = Vec<Object>)]
    pub orders: Vec<serde_json::Value>,
}
