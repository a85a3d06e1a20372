use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

/// Product id -> requested quantity.
pub type CartItems = BTreeMap<Uuid, i32>;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Receiver {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[schema(value_type = Object)]
    pub items: CartItems,
    pub receiver: Receiver,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
