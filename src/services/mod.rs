pub mod inventory_service;
pub mod order_service;
pub mod product_service;
pub mod shop_service;
