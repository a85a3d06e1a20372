pub mod accounts;
pub mod audit_logs;
pub mod orders;
pub mod products;
pub mod shops;

pub use accounts::Entity as Accounts;
pub use audit_logs::Entity as AuditLogs;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use shops::Entity as Shops;
