//! 访客计数与 WakaTime 统计表迁移

use sea_orm_migration::prelude::*;

use crate::m20261019_000002_skills::Skill;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisitorCount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisitorCount::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VisitorCount::Count)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(VisitorCount::History).json().not_null())
                    .col(
                        ColumnDef::new(VisitorCount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisitorCount::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WakatimeStat::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WakatimeStat::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WakatimeStat::SkillId).integer().not_null())
                    .col(ColumnDef::new(WakatimeStat::Date).date().not_null())
                    .col(
                        ColumnDef::new(WakatimeStat::Seconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WakatimeStat::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WakatimeStat::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wakatime_stats_skill")
                            .from(WakatimeStat::Table, WakatimeStat::SkillId)
                            .to(Skill::Table, Skill::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (skill_id, date) 唯一，upsert 依赖此约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wakatime_stats_skill_date")
                    .table(WakatimeStat::Table)
                    .col(WakatimeStat::SkillId)
                    .col(WakatimeStat::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_wakatime_stats_skill_date")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(WakatimeStat::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VisitorCount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VisitorCount {
    #[sea_orm(iden = "visitor_counts")]
    Table,
    Id,
    Count,
    History,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WakatimeStat {
    #[sea_orm(iden = "wakatime_stats")]
    Table,
    Id,
    SkillId,
    Date,
    Seconds,
    CreatedAt,
    UpdatedAt,
}
