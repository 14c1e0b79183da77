use crate::{
    audit::log_audit,
    dto::orders::{OrderHistory, OrderSubmitted},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    order_client::OrderServiceClient,
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

/// Submit the user's cart to the order service. The cart is emptied only
/// after the remote confirms the order with 201; any failure leaves the
/// items in place so the user can retry.
pub async fn submit_order(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderSubmitted>> {
    let cart = cart_service::get_or_create_cart(&state.pool, user.user_id).await?;
    let lines = cart_service::get_item_lines(&state.pool, &cart).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let customer = find_user(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let payload = OrderServiceClient::build_payload(&customer, &lines);

    let order_id = match state.orders.submit(&payload).await {
        Ok(order_id) => order_id,
        Err(err) => {
            tracing::warn!(error = %err, user_id = user.user_id, "order submission failed");
            return Err(err.into());
        }
    };

    cart_service::empty_cart(&state.pool, &cart).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_submitted",
        Some("carts"),
        Some(serde_json::json!({ "order_id": order_id, "total": payload.total })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        format!("We received your order! ORDER ID: {order_id}"),
        OrderSubmitted { order_id },
        Some(Meta::empty()),
    ))
}

/// Past orders for the current user. Any remote failure degrades to an empty
/// list with a warning message rather than an error, so the page still
/// renders.
pub async fn order_history(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderHistory>> {
    match state.orders.list_orders(user.user_id).await {
        Ok(orders) => {
            let meta = Meta::new(orders.len() as i64);
            Ok(ApiResponse::success("OK", OrderHistory { orders }, Some(meta)))
        }
        Err(err) => {
            tracing::warn!(error = %err, user_id = user.user_id, "could not retrieve orders");
            Ok(ApiResponse::success(
                "Unfortunately, we could not retrieve your orders. Try again later.",
                OrderHistory { orders: Vec::new() },
                Some(Meta::empty()),
            ))
        }
    }
}

async fn find_user(state: &AppState, user_id: i64) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(user)
}
