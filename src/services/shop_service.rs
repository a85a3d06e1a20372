use std::fmt;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    entity::{
        accounts::{ActiveModel as AccountActive, Entity as Accounts},
        orders::{Column as OrderCol, Entity as Orders},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        shops::{self, ActiveModel as ShopActive, Column as ShopCol, Entity as Shops, Model as ShopModel},
    },
    error::AppResult,
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteShopOutcome {
    Deleted,
    NotFound,
    AlreadyDeleted,
    Failed(String),
}

impl fmt::Display for DeleteShopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteShopOutcome::Deleted => f.write_str("deleted"),
            DeleteShopOutcome::NotFound => f.write_str("not found"),
            DeleteShopOutcome::AlreadyDeleted => f.write_str("already deleted"),
            DeleteShopOutcome::Failed(detail) => write!(f, "failed: {detail}"),
        }
    }
}

/// The live shop owned by `owner_id`, if any.
pub async fn find_active_shop_by_owner<C: ConnectionTrait>(
    conn: &C,
    owner_id: Uuid,
) -> AppResult<Option<ShopModel>> {
    let shop = Shops::find()
        .filter(ShopCol::OwnerId.eq(owner_id))
        .filter(ShopCol::IsDeleted.eq(false))
        .one(conn)
        .await?;
    Ok(shop)
}

/// Soft-deletes a shop together with its owning account.
///
/// Products are taken off sale and orders lose their shop reference; nothing
/// is hard-deleted. Detaching orders runs in a savepoint whose failure is
/// logged and ignored, so a `Deleted` outcome can leave orders still pointing
/// at the deleted shop. Any other failure rolls everything back.
pub async fn delete_shop(state: &AppState, shop_id: Uuid) -> DeleteShopOutcome {
    let outcome = match run_delete_cascade(state, shop_id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(%shop_id, error = %err, "shop deletion failed");
            DeleteShopOutcome::Failed(err.to_string())
        }
    };

    if outcome == DeleteShopOutcome::Deleted {
        audit::record(
            &state.orm,
            None,
            "shop_delete",
            "shops",
            serde_json::json!({ "shop_id": shop_id }),
        )
        .await;
    }
    outcome
}

async fn run_delete_cascade(state: &AppState, shop_id: Uuid) -> Result<DeleteShopOutcome, DbErr> {
    let txn = state.orm.begin().await?;

    let Some(shop) = Shops::find_by_id(shop_id).one(&txn).await? else {
        return Ok(DeleteShopOutcome::NotFound);
    };
    if shop.is_deleted {
        return Ok(DeleteShopOutcome::AlreadyDeleted);
    }

    let delisted = delist_products(&txn, shop_id).await?;
    detach_orders(&txn, shop_id).await?;

    let deleted_at = Utc::now().timestamp_millis();
    let owner_id = shop.owner_id;
    let original_name = shop.name.clone();

    let mut active: ShopActive = shop.into();
    active.is_deleted = Set(true);
    active.name = Set(shops::tombstone_name(&original_name, deleted_at));
    active.update(&txn).await?;

    match Accounts::find_by_id(owner_id).one(&txn).await? {
        Some(owner) => {
            let original_username = owner.username.clone();
            let mut active: AccountActive = owner.into();
            active.is_deleted = Set(true);
            active.username = Set(shops::tombstone_name(&original_username, deleted_at));
            active.update(&txn).await?;
        }
        None => tracing::warn!(%shop_id, %owner_id, "shop owner account missing"),
    }

    txn.commit().await?;

    tracing::info!(%shop_id, shop = %original_name, delisted, "shop deleted");
    Ok(DeleteShopOutcome::Deleted)
}

async fn delist_products(txn: &DatabaseTransaction, shop_id: Uuid) -> Result<usize, DbErr> {
    let products = Products::find()
        .filter(ProdCol::ShopId.eq(shop_id))
        .all(txn)
        .await?;

    let count = products.len();
    for product in products {
        let mut active: ProductActive = product.into();
        active.is_on_sale = Set(false);
        active.update(txn).await?;
    }
    Ok(count)
}

/// Bulk-clears the shop reference on its orders inside a savepoint. A failing
/// update is logged and swallowed; only savepoint bookkeeping errors propagate.
async fn detach_orders(txn: &DatabaseTransaction, shop_id: Uuid) -> Result<(), DbErr> {
    let savepoint = txn.begin().await?;

    let detached = Orders::update_many()
        .col_expr(OrderCol::ShopId, Expr::value(Option::<Uuid>::None))
        .filter(OrderCol::ShopId.eq(shop_id))
        .exec(&savepoint)
        .await;

    match detached {
        Ok(result) => {
            savepoint.commit().await?;
            tracing::debug!(%shop_id, orders = result.rows_affected, "orders detached from shop");
        }
        Err(err) => {
            tracing::error!(%shop_id, error = %err, "detaching orders failed, continuing shop deletion");
            savepoint.rollback().await?;
        }
    }
    Ok(())
}
