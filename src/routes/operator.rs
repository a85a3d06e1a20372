use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
};
use uuid::Uuid;

use crate::{
    dto::shops::DeleteShopResult,
    error::AppResult,
    middleware::auth::{AuthUser, ensure_operator},
    response::{ApiResponse, Meta},
    services::shop_service::{self, DeleteShopOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/shops/{id}", delete(delete_shop))
}

#[utoipa::path(
    delete,
    path = "/api/operator/shops/{id}",
    params(("id" = Uuid, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Shop deleted", body = ApiResponse<DeleteShopResult>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Shop not found"),
        (status = 409, description = "Shop already deleted"),
        (status = 500, description = "Deletion failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Operator"
)]
pub async fn delete_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiResponse<DeleteShopResult>>)> {
    ensure_operator(&user)?;

    let outcome = shop_service::delete_shop(&state, id).await;
    let status = match outcome {
        DeleteShopOutcome::Deleted => StatusCode::OK,
        DeleteShopOutcome::NotFound => StatusCode::NOT_FOUND,
        DeleteShopOutcome::AlreadyDeleted => StatusCode::CONFLICT,
        DeleteShopOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = outcome.to_string();
    let body = ApiResponse::success(
        message.clone(),
        DeleteShopResult {
            shop_id: id,
            outcome: message,
        },
        Some(Meta::empty()),
    );
    Ok((status, Json(body)))
}
