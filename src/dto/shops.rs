use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteShopResult {
    pub shop_id: Uuid,
    pub outcome: String,
}
