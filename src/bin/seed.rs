use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rust_decimal::Decimal;

use game_store_api::{config::AppConfig, db::create_pool, middleware::auth::Claims};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "player@example.com", "Pat", "Player").await?;
    seed_games(&pool).await?;

    let token = demo_token(user_id)?;
    println!("Seed completed. User ID: {user_id}");
    println!("Demo bearer token: {token}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<i64> {
    let (user_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, first_name, last_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET first_name = EXCLUDED.first_name,
                                          last_name = EXCLUDED.last_name
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_games(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let games: Vec<(&str, Option<Decimal>)> = vec![
        ("Chess Master 3000", Some("9.99".parse()?)),
        ("Galaxy Raiders", Some("24.50".parse()?)),
        ("Dungeon Depths", Some("14.00".parse()?)),
        // No price entry yet; snapshots as zero when added to a cart.
        ("Puzzle Sampler", None),
    ];

    for (name, price) in games {
        sqlx::query(
            r#"
            INSERT INTO games (name, price_per_unit)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded games");
    Ok(())
}

fn demo_token(user_id: i64) -> anyhow::Result<String> {
    let secret = std::env::var("JWT_SECRET")?;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::days(30)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
