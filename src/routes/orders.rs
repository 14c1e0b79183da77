use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::orders::{OrderHistory, OrderSubmitted},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/submit", post(submit_order))
}

#[utoipa::path(
    post,
    path = "/api/orders/submit",
    responses(
        (status = 200, description = "Order accepted by the order service", body = ApiResponse<OrderSubmitted>),
        (status = 400, description = "Cart is empty"),
        (status = 502, description = "Order service rejected the order"),
        (status = 503, description = "Order service unreachable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn submit_order(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderSubmitted>>> {
    let response = order_service::submit_order(&state, &user).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Past orders; empty with a warning message when the order service is down", body = ApiResponse<OrderHistory>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderHistory>>> {
    let response = order_service::order_history(&state, &user).await?;
    Ok(Json(response))
}
