//! About section (single type)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "about_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub heading: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub resume_url: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
