use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::{accounts::AccountType, shops::Model as ShopModel},
    error::{AppError, AppResult},
    services::shop_service,
    state::AppState,
};

/// Identity of the caller, resolved from the bearer token at the edge and
/// handed to the services explicitly.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub account_type: AccountType,
}

pub fn ensure_account_type(user: &AuthUser, account_type: AccountType) -> Result<(), AppError> {
    if user.account_type != account_type {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_operator(user: &AuthUser) -> Result<(), AppError> {
    ensure_account_type(user, AccountType::Operator)
}

/// The live shop run by a shop account.
pub async fn current_shop(state: &AppState, user: &AuthUser) -> AppResult<ShopModel> {
    ensure_account_type(user, AccountType::Shop)?;
    shop_service::find_active_shop_by_owner(&state.orm, user.account_id)
        .await?
        .ok_or(AppError::Forbidden)
}

pub fn issue_token(
    secret: &str,
    account_id: Uuid,
    account_type: AccountType,
    ttl: Duration,
) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account_id.to_string(),
        account_type,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected bearer token");
            AppError::Unauthorized
        })?;

        let account_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            account_id,
            account_type: decoded.claims.account_type,
        })
    }
}
