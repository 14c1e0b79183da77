//! Client for the external order-processing service.
//!
//! Every call carries a static `Authorization: Token <token>` header and a
//! bounded timeout, both fixed at construction from [`OrderServiceConfig`].
//! The client only talks to the remote; it never touches local cart state.
//! Emptying the cart after a confirmed submission is the caller's job, so the
//! network effect and the local effect commit independently.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use thiserror::Error;

use crate::config::OrderServiceConfig;
use crate::dto::cart::CartLine;
use crate::dto::orders::{OrderCustomer, OrderPayload, OrderSubmitted};
use crate::models::User;
use crate::services::totals;

#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// Transport-level failure: timeout, connection refused, DNS.
    #[error("order service unreachable: {0}")]
    Unavailable(#[source] reqwest::Error),

    /// The service answered with something other than the success status.
    #[error("order service rejected the request: status {status}")]
    Rejected { status: u16, body: String },

    /// The service answered successfully but the body was not what the
    /// contract promises.
    #[error("order service response could not be parsed: {0}")]
    Parse(String),
}

#[derive(Clone)]
pub struct OrderServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderServiceClient {
    pub fn new(config: &OrderServiceConfig) -> Result<Self, OrderServiceError> {
        let mut headers = HeaderMap::new();
        let mut auth_value =
            HeaderValue::from_str(&format!("Token {}", config.auth_token))
                .map_err(|e| OrderServiceError::Parse(format!("invalid auth token: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert("Authorization", auth_value);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(OrderServiceError::Unavailable)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Assemble the wire payload for a user's cart. Pure; does no I/O.
    pub fn build_payload(user: &User, lines: &[CartLine]) -> OrderPayload {
        OrderPayload {
            items: lines.to_vec(),
            order_customer: OrderCustomer {
                customer_id: user.id,
                email: user.email.clone(),
                name: format!("{} {}", user.first_name, user.last_name),
            },
            total: totals::order_total(lines),
        }
    }

    /// Submit an order. Success is strictly HTTP 201 with an `order_id` body;
    /// everything else is a rejection.
    pub async fn submit(&self, payload: &OrderPayload) -> Result<i64, OrderServiceError> {
        let url = format!("{}/api/order/add/", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(OrderServiceError::Unavailable)?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(OrderServiceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: OrderSubmitted = response
            .json()
            .await
            .map_err(|e| OrderServiceError::Parse(e.to_string()))?;
        Ok(created.order_id)
    }

    /// Fetch a customer's past orders. Summaries are opaque JSON, passed
    /// through untouched.
    pub async fn list_orders(
        &self,
        customer_id: i64,
    ) -> Result<Vec<serde_json::Value>, OrderServiceError> {
        let url = format!(
            "{}/api/customer/{}/orders/get/",
            self.base_url, customer_id
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(OrderServiceError::Unavailable)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OrderServiceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OrderServiceError::Parse(e.to_string()))
    }
}

impl std::fmt::Debug for OrderServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderServiceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn user() -> User {
        User {
            id: 42,
            email: "alice@example.com".into(),
            first_name: "Alice".into(),
            last_name: "Doe".into(),
            created_at: Utc::now(),
        }
    }

    fn line(name: &str, price: &str, game_id: i64, quantity: i32) -> CartLine {
        CartLine {
            name: name.to_string(),
            price_per_unit: price.parse().unwrap(),
            game_id,
            quantity,
        }
    }

    #[test]
    fn payload_totals_the_lines() {
        let payload =
            OrderServiceClient::build_payload(&user(), &[line("Chess", "9.99", 7, 3)]);
        assert_eq!(payload.total, "29.97".parse::<Decimal>().unwrap());
        assert_eq!(payload.order_customer.customer_id, 42);
        assert_eq!(payload.order_customer.name, "Alice Doe");
    }

    #[test]
    fn payload_for_empty_cart_totals_zero() {
        let payload = OrderServiceClient::build_payload(&user(), &[]);
        assert_eq!(payload.total, Decimal::ZERO);
        assert!(payload.items.is_empty());
    }

    #[test]
    fn payload_wire_shape_uses_named_fields() {
        let payload =
            OrderServiceClient::build_payload(&user(), &[line("Chess", "9.99", 7, 3)]);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["items"][0]["name"], "Chess");
        assert_eq!(value["items"][0]["price_per_unit"], "9.99");
        assert_eq!(value["items"][0]["game_id"], 7);
        assert_eq!(value["items"][0]["quantity"], 3);
        assert_eq!(value["order_customer"]["customer_id"], 42);
        assert_eq!(value["order_customer"]["email"], "alice@example.com");
        assert_eq!(value["total"], "29.97");
    }
}
