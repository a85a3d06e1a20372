mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use axum_marketplace_api::{
    entity::accounts::AccountType, middleware::auth::issue_token, routes::create_app,
    state::AppState,
};
use chrono::Duration;
use common::*;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn token_for(account_id: Uuid, account_type: AccountType) -> anyhow::Result<String> {
    Ok(issue_token(JWT_SECRET, account_id, account_type, Duration::hours(1))?)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

async fn app_with_state() -> anyhow::Result<(Router, AppState)> {
    let state = setup_state().await?;
    Ok((create_app(state.clone()), state))
}

#[tokio::test]
async fn health_endpoint_is_public() -> anyhow::Result<()> {
    let (app, _) = app_with_state().await?;

    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "up");
    Ok(())
}

#[tokio::test]
async fn order_endpoints_require_a_token() -> anyhow::Result<()> {
    let (app, _) = app_with_state().await?;
    let uri = format!("/api/orders/{}/payment", Uuid::new_v4());

    let (status, _) = send(&app, "POST", &uri, None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", &uri, Some("not-a-token"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn order_lifecycle_over_http() -> anyhow::Result<()> {
    let (app, state) = app_with_state().await?;
    let customer = create_account(&state, "customer", AccountType::Customer).await?;
    let (owner_id, shop_id) = create_seller(&state, "Shop S").await?;
    let product_id = create_product(&state, shop_id, 999, 10).await?;
    let customer_token = token_for(customer, AccountType::Customer)?;
    let shop_token = token_for(owner_id, AccountType::Shop)?;

    let checkout = json!({
        "items": { product_id.to_string(): 2 },
        "receiver": { "name": "Ada", "phone": "555-0100", "address": "1 Wensan Road" }
    });
    let (status, body) =
        send(&app, "POST", "/api/orders", Some(&customer_token), Some(checkout)).await?;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["data"]["order_id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing order id"))?
        .to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/shipment"),
        Some(&shop_token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for (step, token) in [
        ("payment", &customer_token),
        ("shipment", &shop_token),
        ("receipt", &customer_token),
    ] {
        let uri = format!("/api/orders/{order_id}/{step}");
        let (status, _) = send(&app, "POST", &uri, Some(token), None).await?;
        assert_eq!(status, StatusCode::OK, "{step} should succeed");
    }

    let uri = format!("/api/orders/{order_id}");
    let (status, body) = send(&app, "GET", &uri, Some(&customer_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["total_amount"], 1998);

    let (status, body) = send(&app, "GET", &uri, Some(&shop_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 2);

    assert_eq!(product(&state, product_id).await?.stock, 8);
    Ok(())
}

#[tokio::test]
async fn checkout_is_for_customers_only() -> anyhow::Result<()> {
    let (app, state) = app_with_state().await?;
    let (owner_id, shop_id) = create_seller(&state, "Shop S").await?;
    let product_id = create_product(&state, shop_id, 999, 10).await?;
    let shop_token = token_for(owner_id, AccountType::Shop)?;

    let checkout = json!({
        "items": { product_id.to_string(): 1 },
        "receiver": { "name": "Ada", "phone": "555-0100", "address": "1 Wensan Road" }
    });
    let (status, _) = send(&app, "POST", "/api/orders", Some(&shop_token), Some(checkout)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(product(&state, product_id).await?.stock, 10);
    Ok(())
}

#[tokio::test]
async fn operator_deletes_shops() -> anyhow::Result<()> {
    let (app, state) = app_with_state().await?;
    let operator = create_account(&state, "operator", AccountType::Operator).await?;
    let customer = create_account(&state, "customer", AccountType::Customer).await?;
    let (_, shop_id) = create_seller(&state, "Shop S").await?;
    let uri = format!("/api/operator/shops/{shop_id}");

    let customer_token = token_for(customer, AccountType::Customer)?;
    let (status, _) = send(&app, "DELETE", &uri, Some(&customer_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!shop(&state, shop_id).await?.is_deleted);

    let operator_token = token_for(operator, AccountType::Operator)?;
    let (status, body) = send(&app, "DELETE", &uri, Some(&operator_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "deleted");

    let (status, body) = send(&app, "DELETE", &uri, Some(&operator_token), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["outcome"], "already deleted");
    Ok(())
}

#[tokio::test]
async fn catalogue_is_public_and_hides_deleted_shops() -> anyhow::Result<()> {
    let (app, state) = app_with_state().await?;
    let (_, shop_id) = create_seller(&state, "Shop S").await?;
    let product_id = create_product(&state, shop_id, 999, 10).await?;

    let (status, body) = send(&app, "GET", "/api/products", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["id"], product_id.to_string());
    assert_eq!(body["meta"]["total"], 1);

    let operator = create_account(&state, "operator", AccountType::Operator).await?;
    let operator_token = token_for(operator, AccountType::Operator)?;
    let uri = format!("/api/operator/shops/{shop_id}");
    let (status, _) = send(&app, "DELETE", &uri, Some(&operator_token), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/products", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
    Ok(())
}
