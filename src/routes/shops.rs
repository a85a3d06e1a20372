use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult,
    middleware::auth::{AuthUser, current_shop},
    models::Shop,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/mine", get(my_shop))
}

#[utoipa::path(
    get,
    path = "/api/shops/mine",
    responses(
        (status = 200, description = "The caller's live shop", body = ApiResponse<Shop>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn my_shop(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let shop = current_shop(&state, &user).await?;
    Ok(Json(ApiResponse::success("Shop", Shop::from(shop), Some(Meta::empty()))))
}
