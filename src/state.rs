use crate::db::DbPool;
use crate::order_client::OrderServiceClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orders: OrderServiceClient,
}
