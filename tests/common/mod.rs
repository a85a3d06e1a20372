#![allow(dead_code)]

use axum_marketplace_api::{
    db::{create_orm_conn, run_migrations},
    dto::orders::Receiver,
    entity::{
        accounts::{AccountType, ActiveModel as AccountActive, Entity as Accounts, Model as AccountModel},
        orders::{Entity as Orders, Model as OrderModel},
        products::{ActiveModel as ProductActive, Entity as Products, Model as ProductModel},
        shops::{ActiveModel as ShopActive, Entity as Shops, Model as ShopModel},
    },
    state::AppState,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

/// Fresh in-memory database with the production migrations applied.
/// A single pooled connection keeps every query on the same database.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:", 1).await?;
    run_migrations(&orm).await?;
    Ok(AppState {
        orm,
        jwt_secret: JWT_SECRET.to_string(),
    })
}

pub async fn create_account(
    state: &AppState,
    username: &str,
    account_type: AccountType,
) -> anyhow::Result<Uuid> {
    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        account_type: Set(account_type),
        is_deleted: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(account.id)
}

pub async fn create_shop(state: &AppState, name: &str, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let shop = ShopActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        owner_id: Set(owner_id),
        is_deleted: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(shop.id)
}

/// Shop account plus its shop; returns `(owner_id, shop_id)`.
pub async fn create_seller(state: &AppState, name: &str) -> anyhow::Result<(Uuid, Uuid)> {
    let owner_id = create_account(state, &format!("{name}_owner"), AccountType::Shop).await?;
    let shop_id = create_shop(state, name, owner_id).await?;
    Ok((owner_id, shop_id))
}

pub async fn create_product(
    state: &AppState,
    shop_id: Uuid,
    price: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        category_id: Set(Uuid::new_v4()),
        name: Set("Test Widget".into()),
        description: Set(Some("A product for testing".into())),
        price: Set(price),
        stock: Set(stock),
        is_on_sale: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

pub fn receiver() -> Receiver {
    Receiver {
        name: "Ada".into(),
        phone: "555-0100".into(),
        address: "Zhejiang Hangzhou Xihu 1 Wensan Road".into(),
    }
}

pub async fn product(state: &AppState, id: Uuid) -> anyhow::Result<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product {id} missing"))
}

pub async fn order(state: &AppState, id: Uuid) -> anyhow::Result<OrderModel> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("order {id} missing"))
}

pub async fn shop(state: &AppState, id: Uuid) -> anyhow::Result<ShopModel> {
    Shops::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("shop {id} missing"))
}

pub async fn account(state: &AppState, id: Uuid) -> anyhow::Result<AccountModel> {
    Accounts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("account {id} missing"))
}
