//! Visitor counter (single type)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "visitor_counts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub count: i64,
    /// 追加写入的 `[{count, timestamp}, ...]`
    pub history: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
