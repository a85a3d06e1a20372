use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub is_deleted: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::OwnerId",
        to = "super::accounts::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Longest shop name or account username the schema stores, in characters.
pub const NAME_MAX_CHARS: usize = 255;

const TOMBSTONE_PREFIX: &str = "deleted_";

/// Name a deleted row is renamed to so the original becomes reusable.
///
/// The original is cut short when needed so the result fits `NAME_MAX_CHARS`.
pub fn tombstone_name(original: &str, deleted_at_millis: i64) -> String {
    let suffix = format!("_{deleted_at_millis}");
    let budget = NAME_MAX_CHARS.saturating_sub(TOMBSTONE_PREFIX.len() + suffix.len());
    let kept: String = original.chars().take(budget).collect();
    format!("{TOMBSTONE_PREFIX}{kept}{suffix}")
}
