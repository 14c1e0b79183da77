use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;

use game_store_api::{
    config::OrderServiceConfig,
    db::{DbPool, create_pool},
    dto::cart::CartLine,
    error::AppError,
    middleware::auth::AuthUser,
    models::{Game, User},
    order_client::{OrderServiceClient, OrderServiceError},
    services::{cart_service, order_service},
    state::AppState,
};

// Submission flow against an in-process stand-in for the order service: the
// cart is emptied only on a confirmed 201, every failure leaves it intact,
// and order listing degrades to empty instead of failing.

const TEST_TOKEN: &str = "secret-token";

fn mock_router(submit_status: StatusCode, list_status: StatusCode) -> Router {
    Router::new()
        .route(
            "/api/order/add/",
            post(move |headers: HeaderMap, Json(_body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                if auth != format!("Token {TEST_TOKEN}") {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "bad token"})));
                }
                if submit_status == StatusCode::CREATED {
                    (StatusCode::CREATED, Json(json!({"order_id": 77})))
                } else {
                    (submit_status, Json(json!({"detail": "boom"})))
                }
            }),
        )
        .route(
            "/api/customer/{id}/orders/get/",
            get(move |Path(_id): Path<i64>| async move {
                if list_status == StatusCode::OK {
                    (StatusCode::OK, Json(json!([{"id": 1, "total": "29.97"}])))
                } else {
                    (list_status, Json(json!({"detail": "unavailable"})))
                }
            }),
        )
}

async fn spawn_mock(router: Router) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            eprintln!("mock order service stopped: {err}");
        }
    });
    Ok(addr)
}

fn client_for(addr: SocketAddr) -> OrderServiceClient {
    OrderServiceClient::new(&OrderServiceConfig {
        base_url: format!("http://{addr}"),
        auth_token: TEST_TOKEN.to_string(),
        timeout: Duration::from_secs(2),
    })
    .expect("client construction")
}

fn demo_user() -> User {
    User {
        id: 42,
        email: "alice@example.com".into(),
        first_name: "Alice".into(),
        last_name: "Doe".into(),
        created_at: Utc::now(),
    }
}

fn chess_line() -> CartLine {
    CartLine {
        name: "Chess".into(),
        price_per_unit: "9.99".parse().unwrap(),
        game_id: 7,
        quantity: 3,
    }
}

#[tokio::test]
async fn submit_returns_order_id_on_created() -> anyhow::Result<()> {
    let addr = spawn_mock(mock_router(StatusCode::CREATED, StatusCode::OK)).await?;
    let client = client_for(addr);

    let payload = OrderServiceClient::build_payload(&demo_user(), &[chess_line()]);
    let order_id = client.submit(&payload).await?;
    assert_eq!(order_id, 77);
    Ok(())
}

#[tokio::test]
async fn submit_maps_non_created_status_to_rejected() -> anyhow::Result<()> {
    let addr = spawn_mock(mock_router(
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::OK,
    ))
    .await?;
    let client = client_for(addr);

    let payload = OrderServiceClient::build_payload(&demo_user(), &[chess_line()]);
    let err = client.submit(&payload).await.unwrap_err();
    match err {
        OrderServiceError::Rejected { status, .. } => assert_eq!(status, 500),
        other => panic!("expected Rejected, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn transport_failure_maps_to_unavailable() -> anyhow::Result<()> {
    // Bind then drop to get a port with nothing listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = client_for(addr);
    let payload = OrderServiceClient::build_payload(&demo_user(), &[chess_line()]);
    let err = client.submit(&payload).await.unwrap_err();
    assert!(
        matches!(err, OrderServiceError::Unavailable(_)),
        "expected Unavailable, got {err:?}"
    );
    Ok(())
}

#[tokio::test]
async fn list_orders_maps_service_unavailable_to_rejected() -> anyhow::Result<()> {
    let addr = spawn_mock(mock_router(
        StatusCode::CREATED,
        StatusCode::SERVICE_UNAVAILABLE,
    ))
    .await?;
    let client = client_for(addr);

    let err = client.list_orders(42).await.unwrap_err();
    match err {
        OrderServiceError::Rejected { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Rejected, got {other:?}"),
    }
    Ok(())
}

// DB-backed controller flow below; skipped when no database is configured.

async fn setup_pool() -> anyhow::Result<Option<DbPool>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Some(pool))
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn create_user(pool: &DbPool, tag: &str) -> anyhow::Result<i64> {
    let email = format!("{tag}-{}@example.com", unique_suffix());
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (email, first_name, last_name) VALUES ($1, 'Test', 'User') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn create_game(pool: &DbPool, tag: &str, price: &str) -> anyhow::Result<Game> {
    let name = format!("{tag}-{}", unique_suffix());
    let game = sqlx::query_as::<_, Game>(
        "INSERT INTO games (name, price_per_unit) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(price.parse::<Decimal>()?)
    .fetch_one(pool)
    .await?;
    Ok(game)
}

#[tokio::test]
async fn successful_submit_empties_the_cart() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let addr = spawn_mock(mock_router(StatusCode::CREATED, StatusCode::OK)).await?;
    let state = AppState {
        pool: pool.clone(),
        orders: client_for(addr),
    };

    let user_id = create_user(&pool, "submit-ok").await?;
    let game = create_game(&pool, "submit-ok-game", "9.99").await?;
    let cart = cart_service::get_or_create_cart(&pool, user_id).await?;
    cart_service::add_or_increment(&pool, &cart, &game).await?;

    let auth = AuthUser { user_id };
    let response = order_service::submit_order(&state, &auth).await?;
    assert_eq!(response.data.unwrap().order_id, 77);
    assert!(response.message.contains("ORDER ID: 77"));

    let items = cart_service::get_items(&pool, &cart).await?;
    assert!(items.is_empty(), "cart should be emptied after a confirmed 201");
    Ok(())
}

#[tokio::test]
async fn failed_submit_preserves_the_cart() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let addr = spawn_mock(mock_router(
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::OK,
    ))
    .await?;
    let state = AppState {
        pool: pool.clone(),
        orders: client_for(addr),
    };

    let user_id = create_user(&pool, "submit-fail").await?;
    let game = create_game(&pool, "submit-fail-game", "9.99").await?;
    let cart = cart_service::get_or_create_cart(&pool, user_id).await?;
    cart_service::add_or_increment(&pool, &cart, &game).await?;
    cart_service::add_or_increment(&pool, &cart, &game).await?;

    let auth = AuthUser { user_id };
    let err = order_service::submit_order(&state, &auth).await.unwrap_err();
    assert!(
        matches!(err, AppError::OrderService(OrderServiceError::Rejected { .. })),
        "expected remote rejection, got {err:?}"
    );

    let items = cart_service::get_items(&pool, &cart).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2, "cart must be unchanged after a failed submit");
    Ok(())
}

#[tokio::test]
async fn submitting_an_empty_cart_is_a_bad_request() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let addr = spawn_mock(mock_router(StatusCode::CREATED, StatusCode::OK)).await?;
    let state = AppState {
        pool: pool.clone(),
        orders: client_for(addr),
    };

    let user_id = create_user(&pool, "submit-empty").await?;
    let auth = AuthUser { user_id };
    let err = order_service::submit_order(&state, &auth).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn order_history_degrades_to_empty_on_remote_failure() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let addr = spawn_mock(mock_router(
        StatusCode::CREATED,
        StatusCode::SERVICE_UNAVAILABLE,
    ))
    .await?;
    let state = AppState {
        pool: pool.clone(),
        orders: client_for(addr),
    };

    let user_id = create_user(&pool, "history").await?;
    let auth = AuthUser { user_id };

    let response = order_service::order_history(&state, &auth).await?;
    assert!(response.message.contains("could not retrieve your orders"));
    assert!(response.data.unwrap().orders.is_empty());
    Ok(())
}

#[tokio::test]
async fn order_history_passes_summaries_through() -> anyhow::Result<()> {
    let Some(pool) = setup_pool().await? else {
        return Ok(());
    };
    let addr = spawn_mock(mock_router(StatusCode::CREATED, StatusCode::OK)).await?;
    let state = AppState {
        pool: pool.clone(),
        orders: client_for(addr),
    };

    let user_id = create_user(&pool, "history-ok").await?;
    let auth = AuthUser { user_id };

    let response = order_service::order_history(&state, &auth).await?;
    assert_eq!(response.message, "OK");
    let orders = response.data.unwrap().orders;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["total"], "29.97");
    Ok(())
}
