use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    audit::log_audit,
    dto::cart::CartView,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    services::{
        cart_service::{self, AddOutcome},
        totals,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart))
        .route("/add/{game_id}", post(add_to_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current cart with computed total", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let cart = cart_service::get_or_create_cart(&state.pool, user.user_id).await?;
    let lines = cart_service::get_item_lines(&state.pool, &cart).await?;

    let total = totals::order_total(&lines);
    let meta = Meta::new(lines.len() as i64);
    let data = CartView {
        is_empty: lines.is_empty(),
        total,
        items: lines,
    };

    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/cart/add/{game_id}",
    params(
        ("game_id" = i64, Path, description = "Catalog id of the game to add")
    ),
    responses(
        (status = 200, description = "Item created or quantity incremented", body = ApiResponse<CartItem>),
        (status = 404, description = "Unknown game id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<i64>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let game = cart_service::find_game(&state.pool, game_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let cart = cart_service::get_or_create_cart(&state.pool, user.user_id).await?;
    let (item, outcome) = cart_service::add_or_increment(&state.pool, &cart, &game).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "game_id": game_id, "quantity": item.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    // The added-to-cart notice is only shown when an existing item is
    // incremented, matching the storefront's established behavior.
    let message = match outcome {
        AddOutcome::Incremented => {
            format!("The game {} has been added to your cart", game.name)
        }
        AddOutcome::Inserted => "OK".to_string(),
    };

    Ok(Json(ApiResponse::success(message, item, None)))
}
