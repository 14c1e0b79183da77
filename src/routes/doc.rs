use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartLine, CartView},
        orders::{OrderCustomer, OrderHistory, OrderPayload, OrderSubmitted},
    },
    models::{Cart, CartItem, Game, User},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::view_cart,
        cart::add_to_cart,
        orders::submit_order,
        orders::list_orders
    ),
    components(
        schemas(
            User,
            Game,
            Cart,
            CartItem,
            CartLine,
            CartView,
            OrderCustomer,
            OrderPayload,
            OrderSubmitted,
            OrderHistory,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CartItem>,
            ApiResponse<OrderSubmitted>,
            ApiResponse<OrderHistory>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order submission and history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
