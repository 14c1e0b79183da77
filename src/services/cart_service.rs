use rust_decimal::Decimal;

use crate::{
    db::DbPool,
    dto::cart::CartLine,
    error::AppResult,
    models::{Cart, CartItem, Game},
};

/// Whether an add created the item or bumped an existing one. The two paths
/// produce different user-visible messages.
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    Incremented,
}

/// Return the user's cart, creating it on first access. The upsert keys on
/// the carts.user_id unique constraint, so concurrent first accesses resolve
/// to the same row and the call is idempotent.
pub async fn get_or_create_cart(pool: &DbPool, user_id: i64) -> AppResult<Cart> {
    let cart = sqlx::query_as::<_, Cart>(
        r#"
        INSERT INTO carts (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(cart)
}

pub async fn get_items(pool: &DbPool, cart: &Cart) -> AppResult<Vec<CartItem>> {
    let items = sqlx::query_as::<_, CartItem>("SELECT * FROM cart_items WHERE cart_id = $1")
        .bind(cart.id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_item(pool: &DbPool, cart: &Cart, game_id: i64) -> AppResult<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE cart_id = $1 AND game_id = $2",
    )
    .bind(cart.id)
    .bind(game_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Cart items joined with their game names, in the flat shape the cart page
/// and the order payload both use.
pub async fn get_item_lines(pool: &DbPool, cart: &Cart) -> AppResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT g.name, ci.price_per_unit, ci.game_id, ci.quantity
        FROM cart_items ci
        JOIN games g ON g.id = ci.game_id
        WHERE ci.cart_id = $1
        "#,
    )
    .bind(cart.id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

/// Add a game to the cart, or bump its quantity by one if it is already
/// there. Both statements move the quantity in SQL, never in process, so two
/// concurrent adds of the same game cannot lose an increment; the insert's
/// ON CONFLICT arm covers the window where both requests miss the UPDATE.
///
/// The unit price is snapshotted from the game at add time (no price entry
/// means zero) and is not refreshed by later increments.
pub async fn add_or_increment(
    pool: &DbPool,
    cart: &Cart,
    game: &Game,
) -> AppResult<(CartItem, AddOutcome)> {
    let updated = sqlx::query_as::<_, CartItem>(
        r#"
        UPDATE cart_items
        SET quantity = quantity + 1
        WHERE cart_id = $1 AND game_id = $2
        RETURNING *
        "#,
    )
    .bind(cart.id)
    .bind(game.id)
    .fetch_optional(pool)
    .await?;

    if let Some(item) = updated {
        return Ok((item, AddOutcome::Incremented));
    }

    let price = game.price_per_unit.unwrap_or(Decimal::ZERO);
    let item = sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (cart_id, game_id, quantity, price_per_unit)
        VALUES ($1, $2, 1, $3)
        ON CONFLICT (cart_id, game_id)
        DO UPDATE SET quantity = cart_items.quantity + 1
        RETURNING *
        "#,
    )
    .bind(cart.id)
    .bind(game.id)
    .bind(price)
    .fetch_one(pool)
    .await?;

    let outcome = if item.quantity == 1 {
        AddOutcome::Inserted
    } else {
        AddOutcome::Incremented
    };
    Ok((item, outcome))
}

/// Remove every item from the cart. The cart row itself survives for reuse.
pub async fn empty_cart(pool: &DbPool, cart: &Cart) -> AppResult<()> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart.id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_game(pool: &DbPool, game_id: i64) -> AppResult<Option<Game>> {
    let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
        .bind(game_id)
        .fetch_optional(pool)
        .await?;
    Ok(game)
}
