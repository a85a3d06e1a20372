mod common;

use std::collections::BTreeMap;

use axum_marketplace_api::{
    entity::{
        accounts::AccountType,
        audit_logs::{Column as AuditCol, Entity as AuditLogs},
        orders::OrderStatus,
    },
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};
use common::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

struct Fixture {
    state: AppState,
    customer: Uuid,
    owner_id: Uuid,
    shop_id: Uuid,
    product_id: Uuid,
    order_id: Uuid,
}

/// Shop S owns P (stock 10, price 999); customer C has checked out `{P: 2}`.
async fn checked_out() -> anyhow::Result<Fixture> {
    let state = setup_state().await?;
    let customer = create_account(&state, "customer", AccountType::Customer).await?;
    let (owner_id, shop_id) = create_seller(&state, "Shop S").await?;
    let product_id = create_product(&state, shop_id, 999, 10).await?;
    let order_id = order_service::create_order_from_cart(
        &state,
        customer,
        BTreeMap::from([(product_id, 2)]),
        receiver(),
    )
    .await?
    .expect("an order id");

    Ok(Fixture {
        state,
        customer,
        owner_id,
        shop_id,
        product_id,
        order_id,
    })
}

#[tokio::test]
async fn order_moves_from_payment_to_completion() -> anyhow::Result<()> {
    let f = checked_out().await?;

    assert!(order_service::process_payment(&f.state, f.order_id).await?);
    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::PendingShipment);

    assert!(order_service::process_shipment(&f.state, f.order_id, f.shop_id).await?);
    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::PendingReceipt);

    assert!(!order_service::cancel_order(&f.state, f.order_id, f.customer).await?);
    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::PendingReceipt);

    assert!(order_service::confirm_receipt(&f.state, f.order_id, f.customer).await?);
    let completed = order(&f.state, f.order_id).await?;
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.updated_at >= completed.created_at);

    assert_eq!(product(&f.state, f.product_id).await?.stock, 8);
    Ok(())
}

#[tokio::test]
async fn cancelling_a_paid_order_restores_stock() -> anyhow::Result<()> {
    let f = checked_out().await?;
    assert!(order_service::process_payment(&f.state, f.order_id).await?);

    assert!(order_service::cancel_order(&f.state, f.order_id, f.customer).await?);

    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::Cancelled);
    assert_eq!(product(&f.state, f.product_id).await?.stock, 10);
    Ok(())
}

#[tokio::test]
async fn cancelling_an_unpaid_order_leaves_stock_alone() -> anyhow::Result<()> {
    let f = checked_out().await?;

    assert!(order_service::cancel_order(&f.state, f.order_id, f.customer).await?);

    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::Cancelled);
    assert_eq!(product(&f.state, f.product_id).await?.stock, 8);
    Ok(())
}

#[tokio::test]
async fn transitions_require_the_matching_source_status() -> anyhow::Result<()> {
    let f = checked_out().await?;

    assert!(!order_service::process_shipment(&f.state, f.order_id, f.shop_id).await?);
    assert!(!order_service::confirm_receipt(&f.state, f.order_id, f.customer).await?);

    assert!(order_service::process_payment(&f.state, f.order_id).await?);
    assert!(!order_service::process_payment(&f.state, f.order_id).await?);
    assert!(!order_service::confirm_receipt(&f.state, f.order_id, f.customer).await?);

    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::PendingShipment);
    Ok(())
}

#[tokio::test]
async fn terminal_orders_accept_no_further_transitions() -> anyhow::Result<()> {
    let f = checked_out().await?;
    assert!(order_service::cancel_order(&f.state, f.order_id, f.customer).await?);

    assert!(!order_service::process_payment(&f.state, f.order_id).await?);
    assert!(!order_service::process_shipment(&f.state, f.order_id, f.shop_id).await?);
    assert!(!order_service::confirm_receipt(&f.state, f.order_id, f.customer).await?);
    assert!(!order_service::cancel_order(&f.state, f.order_id, f.customer).await?);

    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::Cancelled);
    assert_eq!(product(&f.state, f.product_id).await?.stock, 8);
    Ok(())
}

#[tokio::test]
async fn transitions_reject_the_wrong_actor() -> anyhow::Result<()> {
    let f = checked_out().await?;
    let stranger = create_account(&f.state, "stranger", AccountType::Customer).await?;
    let (_, other_shop) = create_seller(&f.state, "Other Shop").await?;

    assert!(!order_service::cancel_order(&f.state, f.order_id, stranger).await?);

    assert!(order_service::process_payment(&f.state, f.order_id).await?);
    assert!(!order_service::process_shipment(&f.state, f.order_id, other_shop).await?);
    assert!(!order_service::cancel_order(&f.state, f.order_id, stranger).await?);

    assert!(order_service::process_shipment(&f.state, f.order_id, f.shop_id).await?);
    assert!(!order_service::confirm_receipt(&f.state, f.order_id, stranger).await?);

    assert_eq!(order(&f.state, f.order_id).await?.status, OrderStatus::PendingReceipt);
    Ok(())
}

#[tokio::test]
async fn unknown_orders_are_rejected() -> anyhow::Result<()> {
    let f = checked_out().await?;
    let missing = Uuid::new_v4();

    assert!(!order_service::process_payment(&f.state, missing).await?);
    assert!(!order_service::process_shipment(&f.state, missing, f.shop_id).await?);
    assert!(!order_service::confirm_receipt(&f.state, missing, f.customer).await?);
    assert!(!order_service::cancel_order(&f.state, missing, f.customer).await?);
    Ok(())
}

#[tokio::test]
async fn order_listings_are_scoped_to_customer_and_shop() -> anyhow::Result<()> {
    let f = checked_out().await?;
    let other = create_account(&f.state, "other", AccountType::Customer).await?;
    let query = OrderListQuery::default();

    let (mine, meta) = order_service::list_customer_orders(&f.state, f.customer, &query).await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(meta.total, Some(1));

    let (theirs, _) = order_service::list_customer_orders(&f.state, other, &query).await?;
    assert!(theirs.is_empty());

    let (shop_orders, _) = order_service::list_shop_orders(&f.state, f.shop_id, &query).await?;
    assert_eq!(shop_orders.len(), 1);
    assert_eq!(shop_orders[0].id, f.order_id);
    Ok(())
}

#[tokio::test]
async fn shipment_is_audited_under_the_shop_owner() -> anyhow::Result<()> {
    let f = checked_out().await?;
    assert!(order_service::process_payment(&f.state, f.order_id).await?);
    assert!(order_service::process_shipment(&f.state, f.order_id, f.shop_id).await?);

    let entry = AuditLogs::find()
        .filter(AuditCol::Action.eq("order_shipped"))
        .one(&f.state.orm)
        .await?
        .expect("a shipment audit row");
    assert_eq!(entry.account_id, Some(f.owner_id));
    Ok(())
}
