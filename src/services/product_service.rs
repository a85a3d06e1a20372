use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{AdjustStockRequest, CreateProductRequest, UpdateProductRequest},
    entity::{
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        shops::{Column as ShopCol, Entity as Shops, Model as ShopModel},
    },
    error::{AppError, AppResult},
    response::Meta,
    routes::params::{ProductListQuery, ProductSortBy, SortOrder},
    services::inventory_service,
    state::AppState,
};

/// Catalogue of products that can be bought: on sale and owned by a live shop.
pub async fn list_on_sale_products(
    state: &AppState,
    query: &ProductListQuery,
) -> AppResult<(Vec<ProductModel>, Meta)> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all()
        .add(Column::IsOnSale.eq(true))
        .add(ShopCol::IsDeleted.eq(false));

    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(Column::Name.contains(search))
                .add(Column::Description.contains(search)),
        );
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().inner_join(Shops).filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let products = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    Ok((products, Meta::new(page, limit, total)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn create_product(
    state: &AppState,
    shop: &ShopModel,
    payload: CreateProductRequest,
) -> AppResult<ProductModel> {
    validate_listing(Some(payload.price), Some(payload.stock))?;

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop.id),
        category_id: Set(payload.category_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        is_on_sale: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        Some(shop.owner_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(product)
}

/// Edits a product of the caller's shop. Supplied price and stock follow the
/// same rules as on creation. Existing orders keep their price snapshot.
pub async fn update_product(
    state: &AppState,
    shop: &ShopModel,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ProductModel> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.shop_id != shop.id {
        return Err(AppError::Forbidden);
    }
    validate_listing(payload.price, payload.stock)?;

    let mut active: ActiveModel = existing.into();
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(is_on_sale) = payload.is_on_sale {
        active.is_on_sale = Set(is_on_sale);
    }
    let product = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(shop.owner_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(product)
}

/// Manual stock correction by the owning shop, routed through the checked
/// ledger operations.
pub async fn adjust_stock(
    state: &AppState,
    shop: &ShopModel,
    id: Uuid,
    payload: AdjustStockRequest,
) -> AppResult<ProductModel> {
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if product.shop_id != shop.id {
        return Err(AppError::Forbidden);
    }

    let quantity = payload
        .delta
        .checked_abs()
        .ok_or_else(|| AppError::BadRequest("delta is out of range".into()))?;
    if payload.delta > 0 {
        if !inventory_service::restore_stock(&txn, id, quantity).await? {
            return Err(AppError::NotFound);
        }
    } else if !inventory_service::deduct_stock(&txn, id, quantity).await? {
        return Err(AppError::BadRequest("Insufficient stock".into()));
    }

    let updated = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(shop.owner_id),
        "inventory_adjust",
        "products",
        serde_json::json!({ "product_id": id, "delta": payload.delta }),
    )
    .await;

    Ok(updated)
}

fn validate_listing(price: Option<i64>, stock: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|price| price <= 0) {
        return Err(AppError::BadRequest("price must be greater than 0".into()));
    }
    if stock.is_some_and(|stock| stock < 0) {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }
    Ok(())
}
