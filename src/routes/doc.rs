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
        orders::{CheckoutRequest, CheckoutResponse, OrderList, Receiver},
        products::{AdjustStockRequest, CreateProductRequest, ProductList, UpdateProductRequest},
        shops::DeleteShopResult,
    },
    entity::{accounts::AccountType, orders::OrderStatus},
    models::{Order, Product, Shop},
    response::{ApiResponse, Meta},
    routes::{health, operator, orders, params, products, shops},
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
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::adjust_stock,
        orders::checkout,
        orders::list_my_orders,
        orders::list_shop_orders,
        orders::get_order,
        orders::pay_order,
        orders::ship_order,
        orders::confirm_receipt,
        orders::cancel_order,
        shops::my_shop,
        operator::delete_shop
    ),
    components(
        schemas(
            AccountType,
            OrderStatus,
            Order,
            Product,
            Shop,
            Receiver,
            CheckoutRequest,
            CheckoutResponse,
            OrderList,
            CreateProductRequest,
            AdjustStockRequest,
            UpdateProductRequest,
            ProductList,
            DeleteShopResult,
            params::Pagination,
            params::OrderListQuery,
            params::ProductListQuery,
            params::ProductSortBy,
            params::SortOrder,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Order>,
            ApiResponse<Shop>,
            ApiResponse<OrderList>,
            ApiResponse<ProductList>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<DeleteShopResult>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product and stock endpoints"),
        (name = "Orders", description = "Checkout and order lifecycle endpoints"),
        (name = "Shops", description = "Shop endpoints"),
        (name = "Operator", description = "Marketplace operator endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
