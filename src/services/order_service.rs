use chrono::Utc;
use sea_orm::sea_query::{LockType, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CartItems, Receiver},
    entity::{
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
            OrderStatus,
        },
        products::Entity as Products,
        shops::Entity as Shops,
    },
    error::{AppError, AppResult},
    response::Meta,
    routes::params::{OrderListQuery, SortOrder},
    services::inventory_service,
    state::AppState,
};

/// Turns a cart into one order row per purchasable line.
///
/// Lines whose product no longer exists are skipped. Every row is stamped with
/// the shop of the first product that resolved and shares one `created_at`.
/// Returns the id of the first row written, or `None` when nothing resolved.
pub async fn create_order_from_cart(
    state: &AppState,
    customer_id: Uuid,
    cart: CartItems,
    receiver: Receiver,
) -> AppResult<Option<Uuid>> {
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    if cart.values().any(|&quantity| quantity <= 0) {
        return Err(AppError::BadRequest("Cart has invalid quantity".into()));
    }

    let txn = state.orm.begin().await?;
    let placed_at = Utc::now();

    let mut stamped_shop: Option<Uuid> = None;
    let mut order_ids: Vec<Uuid> = Vec::with_capacity(cart.len());

    for (&product_id, &quantity) in &cart {
        let Some(product) = Products::find_by_id(product_id).one(&txn).await? else {
            tracing::debug!(%product_id, "cart references unknown product, skipping");
            continue;
        };

        let total_amount = product
            .price
            .checked_mul(i64::from(quantity))
            .ok_or_else(|| AppError::BadRequest("Order total is out of range".into()))?;

        if !inventory_service::deduct_stock_unchecked(&txn, product.id, quantity).await? {
            tracing::warn!(%product_id, "product vanished during checkout, skipping");
            continue;
        }
        let shop_id = *stamped_shop.get_or_insert(product.shop_id);

        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            shop_id: Set(Some(shop_id)),
            product_id: Set(product.id),
            quantity: Set(quantity),
            price_at_purchase: Set(product.price),
            total_amount: Set(total_amount),
            status: Set(OrderStatus::PendingPayment),
            receiver_name: Set(receiver.name.clone()),
            receiver_phone: Set(receiver.phone.clone()),
            receiver_address: Set(receiver.address.clone()),
            created_at: Set(placed_at.into()),
            updated_at: Set(placed_at.into()),
        }
        .insert(&txn)
        .await?;

        order_ids.push(order.id);
    }

    txn.commit().await?;

    let first_order_id = order_ids.first().copied();
    match first_order_id {
        Some(order_id) => {
            tracing::info!(%customer_id, %order_id, lines = order_ids.len(), "checkout completed");
            audit::record(
                &state.orm,
                Some(customer_id),
                "checkout",
                "orders",
                serde_json::json!({ "order_ids": order_ids }),
            )
            .await;
        }
        None => tracing::info!(%customer_id, "checkout produced no orders"),
    }

    Ok(first_order_id)
}

/// PENDING_PAYMENT -> PENDING_SHIPMENT.
pub async fn process_payment(state: &AppState, order_id: Uuid) -> AppResult<bool> {
    let txn = state.orm.begin().await?;

    let Some(order) = find_order_for_update(&txn, order_id).await? else {
        return Ok(false);
    };
    if order.status != OrderStatus::PendingPayment {
        return Ok(false);
    }

    let customer_id = order.customer_id;
    apply_status(&txn, order, OrderStatus::PendingShipment).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(customer_id),
        "order_paid",
        "orders",
        serde_json::json!({ "order_id": order_id }),
    )
    .await;
    Ok(true)
}

/// PENDING_SHIPMENT -> PENDING_RECEIPT, only for the shop the order belongs to.
pub async fn process_shipment(state: &AppState, order_id: Uuid, shop_id: Uuid) -> AppResult<bool> {
    let txn = state.orm.begin().await?;

    let Some(order) = find_order_for_update(&txn, order_id).await? else {
        return Ok(false);
    };
    if order.shop_id != Some(shop_id) || order.status != OrderStatus::PendingShipment {
        return Ok(false);
    }

    let shipped_by = Shops::find_by_id(shop_id)
        .one(&txn)
        .await?
        .map(|shop| shop.owner_id);
    apply_status(&txn, order, OrderStatus::PendingReceipt).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        shipped_by,
        "order_shipped",
        "orders",
        serde_json::json!({ "order_id": order_id, "shop_id": shop_id }),
    )
    .await;
    Ok(true)
}

/// PENDING_RECEIPT -> COMPLETED, only for the purchasing customer.
pub async fn confirm_receipt(
    state: &AppState,
    order_id: Uuid,
    customer_id: Uuid,
) -> AppResult<bool> {
    let txn = state.orm.begin().await?;

    let Some(order) = find_order_for_update(&txn, order_id).await? else {
        return Ok(false);
    };
    if order.customer_id != customer_id || order.status != OrderStatus::PendingReceipt {
        return Ok(false);
    }

    apply_status(&txn, order, OrderStatus::Completed).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(customer_id),
        "order_received",
        "orders",
        serde_json::json!({ "order_id": order_id }),
    )
    .await;
    Ok(true)
}

/// Cancels an order that has not shipped yet.
///
/// Stock goes back to the product only when the order was already paid
/// (PENDING_SHIPMENT). Cancelling an unpaid order leaves stock untouched even
/// though checkout deducted it.
pub async fn cancel_order(state: &AppState, order_id: Uuid, customer_id: Uuid) -> AppResult<bool> {
    let txn = state.orm.begin().await?;

    let Some(order) = find_order_for_update(&txn, order_id).await? else {
        return Ok(false);
    };
    if order.customer_id != customer_id || !order.status.can_transition_to(OrderStatus::Cancelled) {
        return Ok(false);
    }

    let prior_status = order.status;
    let (product_id, quantity) = (order.product_id, order.quantity);

    if prior_status == OrderStatus::PendingShipment {
        let restored = inventory_service::restore_stock(&txn, product_id, quantity).await?;
        if !restored {
            tracing::warn!(%order_id, %product_id, "product missing, stock not restored");
        }
    }

    apply_status(&txn, order, OrderStatus::Cancelled).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(customer_id),
        "order_cancelled",
        "orders",
        serde_json::json!({ "order_id": order_id, "prior_status": prior_status }),
    )
    .await;
    Ok(true)
}

pub async fn get_order(state: &AppState, order_id: Uuid) -> AppResult<Option<OrderModel>> {
    Ok(Orders::find_by_id(order_id).one(&state.orm).await?)
}

pub async fn list_customer_orders(
    state: &AppState,
    customer_id: Uuid,
    query: &OrderListQuery,
) -> AppResult<(Vec<OrderModel>, Meta)> {
    list_orders(state, OrderCol::CustomerId.eq(customer_id), query).await
}

pub async fn list_shop_orders(
    state: &AppState,
    shop_id: Uuid,
    query: &OrderListQuery,
) -> AppResult<(Vec<OrderModel>, Meta)> {
    list_orders(state, OrderCol::ShopId.eq(shop_id), query).await
}

async fn list_orders(
    state: &AppState,
    owner: SimpleExpr,
    query: &OrderListQuery,
) -> AppResult<(Vec<OrderModel>, Meta)> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(owner);
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    Ok((orders, Meta::new(page, limit, total)))
}

async fn find_order_for_update<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> AppResult<Option<OrderModel>> {
    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(conn)
        .await?;
    Ok(order)
}

async fn apply_status<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
    next: OrderStatus,
) -> AppResult<OrderModel> {
    debug_assert!(order.status.can_transition_to(next));
    let (order_id, from) = (order.id, order.status);

    let mut active: OrderActive = order.into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(conn).await?;

    tracing::info!(%order_id, ?from, to = ?next, "order status changed");
    Ok(order)
}
