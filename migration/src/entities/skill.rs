//! Skill entity
//!
//! `hours` / `minutes` 由 wakatime_stats 汇总得出，不应直接写入。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    /// 0-100
    pub level: i32,
    pub icon: Option<String>,
    pub hours: i64,
    pub minutes: i32,
    pub skill_year_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub published_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::skill_year::Entity",
        from = "Column::SkillYearId",
        to = "super::skill_year::Column::Id",
        on_delete = "SetNull"
    )]
    SkillYear,
    #[sea_orm(has_many = "super::wakatime_stat::Entity")]
    WakatimeStats,
}

impl Related<super::skill_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SkillYear.def()
    }
}

impl Related<super::wakatime_stat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WakatimeStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
