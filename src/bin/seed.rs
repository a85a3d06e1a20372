use axum_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        accounts::{self, AccountType, ActiveModel as AccountActive, Entity as Accounts},
        products::{self, ActiveModel as ProductActive, Entity as Products},
        shops::{ActiveModel as ShopActive, Model as ShopModel},
    },
    middleware::auth::issue_token,
    services::shop_service::find_active_shop_by_owner,
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,axum_marketplace_api=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url, 1).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let operator_id = ensure_account(&orm, "operator", AccountType::Operator).await?;
    let seller_id = ensure_account(&orm, "ferris_goods", AccountType::Shop).await?;
    let customer_id = ensure_account(&orm, "customer", AccountType::Customer).await?;

    let shop = ensure_shop(&orm, "Ferris Goods", seller_id).await?;
    seed_products(&orm, &shop).await?;

    // Login is handled elsewhere; print ready-made tokens for local testing.
    for (name, id, account_type) in [
        ("operator", operator_id, AccountType::Operator),
        ("shop", seller_id, AccountType::Shop),
        ("customer", customer_id, AccountType::Customer),
    ] {
        let token = issue_token(&config.jwt_secret, id, account_type, Duration::hours(24))?;
        println!("{name} ({id}): Bearer {token}");
    }
    Ok(())
}

async fn ensure_account(
    orm: &DatabaseConnection,
    username: &str,
    account_type: AccountType,
) -> anyhow::Result<Uuid> {
    let existing = Accounts::find()
        .filter(accounts::Column::Username.eq(username))
        .filter(accounts::Column::IsDeleted.eq(false))
        .one(orm)
        .await?;
    if let Some(account) = existing {
        return Ok(account.id);
    }

    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_owned()),
        account_type: Set(account_type),
        is_deleted: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    tracing::info!(username, ?account_type, "seeded account");
    Ok(account.id)
}

async fn ensure_shop(
    orm: &DatabaseConnection,
    name: &str,
    owner_id: Uuid,
) -> anyhow::Result<ShopModel> {
    if let Some(shop) = find_active_shop_by_owner(orm, owner_id).await? {
        return Ok(shop);
    }

    let shop = ShopActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        owner_id: Set(owner_id),
        is_deleted: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    tracing::info!(name, "seeded shop");
    Ok(shop)
}

async fn seed_products(orm: &DatabaseConnection, shop: &ShopModel) -> anyhow::Result<()> {
    let category_id = Uuid::new_v4();
    let catalogue = [
        ("Axum Hoodie", "Warm hoodie for Rustaceans", 5500, 50),
        ("Ferris Mug", "Coffee tastes better with Ferris", 1200, 100),
        ("Rust Sticker Pack", "Decorate your laptop", 500, 200),
        ("E-book: Async Rust", "Learn async Rust patterns", 2500, 75),
    ];

    for (name, description, price, stock) in catalogue {
        let exists = Products::find()
            .filter(products::Column::ShopId.eq(shop.id))
            .filter(products::Column::Name.eq(name))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        ProductActive {
            id: Set(Uuid::new_v4()),
            shop_id: Set(shop.id),
            category_id: Set(category_id),
            name: Set(name.to_owned()),
            description: Set(Some(description.to_owned())),
            price: Set(price),
            stock: Set(stock),
            is_on_sale: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    tracing::info!(shop = %shop.name, "seeded products");
    Ok(())
}
