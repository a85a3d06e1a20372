use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList},
    entity::accounts::AccountType,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, current_shop, ensure_account_type},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::{order_service, shop_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout))
        .route("/mine", get(list_my_orders))
        .route("/shop", get(list_shop_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/payment", post(pay_order))
        .route("/{id}/shipment", post(ship_order))
        .route("/{id}/receipt", post(confirm_receipt))
        .route("/{id}/cancel", post(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout cart into orders", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Empty cart, invalid quantity or nothing purchasable"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    ensure_account_type(&user, AccountType::Customer)?;

    let order_id = order_service::create_order_from_cart(
        &state,
        user.account_id,
        payload.items,
        payload.receiver,
    )
    .await?
    .ok_or_else(|| AppError::BadRequest("No purchasable items in cart".into()))?;

    Ok(Json(ApiResponse::success(
        "Checkout success",
        CheckoutResponse { order_id },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/mine",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Orders placed by the caller", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let (orders, meta) =
        order_service::list_customer_orders(&state, user.account_id, &query).await?;
    let items = orders.into_iter().map(Order::from).collect();
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/orders/shop",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Orders of the caller's shop", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_shop_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let shop = current_shop(&state, &user).await?;
    let (orders, meta) = order_service::list_shop_orders(&state, shop.id, &query).await?;
    let items = orders.into_iter().map(Order::from).collect();
    Ok(Json(ApiResponse::success("Ok", OrderList { items }, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = order_service::get_order(&state, id)
        .await?
        .ok_or(AppError::NotFound)?;

    let visible = order.customer_id == user.account_id
        || match order.shop_id {
            Some(shop_id) => shop_service::find_active_shop_by_owner(&state.orm, user.account_id)
                .await?
                .is_some_and(|shop| shop.id == shop_id),
            None => false,
        };
    // Other people's orders are reported as missing.
    if !visible {
        return Err(AppError::NotFound);
    }

    Ok(Json(ApiResponse::success("OK", Order::from(order), Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/payment",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Payment recorded"),
        (status = 400, description = "Order cannot be paid"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let paid = order_service::process_payment(&state, id).await?;
    transition_response(paid, "Payment recorded", "Payment failed")
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/shipment",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order shipped"),
        (status = 400, description = "Order cannot be shipped"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn ship_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let shop = current_shop(&state, &user).await?;
    let shipped = order_service::process_shipment(&state, id, shop.id).await?;
    transition_response(shipped, "Order shipped", "Shipment failed")
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/receipt",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Receipt confirmed"),
        (status = 400, description = "Receipt cannot be confirmed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn confirm_receipt(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let confirmed = order_service::confirm_receipt(&state, id, user.account_id).await?;
    transition_response(confirmed, "Receipt confirmed", "Receipt confirmation failed")
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 400, description = "Only unpaid or unshipped orders can be cancelled"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let cancelled = order_service::cancel_order(&state, id, user.account_id).await?;
    transition_response(
        cancelled,
        "Order cancelled",
        "Only unpaid or unshipped orders can be cancelled",
    )
}

fn transition_response(
    applied: bool,
    success: &str,
    failure: &str,
) -> AppResult<Json<ApiResponse<()>>> {
    if applied {
        Ok(Json(ApiResponse::message_only(success)))
    } else {
        Err(AppError::BadRequest(failure.to_string()))
    }
}
