use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    orders::{Model as OrderModel, OrderStatus},
    products::Model as ProductModel,
    shops::Model as ShopModel,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub is_on_sale: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_at_purchase: i64,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShopModel> for Shop {
    fn from(model: ShopModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner_id: model.owner_id,
            is_deleted: model.is_deleted,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<ProductModel> for Product {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            is_on_sale: model.is_on_sale,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<OrderModel> for Order {
    fn from(model: OrderModel) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            shop_id: model.shop_id,
            product_id: model.product_id,
            quantity: model.quantity,
            price_at_purchase: model.price_at_purchase,
            total_amount: model.total_amount,
            status: model.status,
            receiver_name: model.receiver_name,
            receiver_phone: model.receiver_phone,
            receiver_address: model.receiver_address,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
