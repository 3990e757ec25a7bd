//! 技能与年份表迁移

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SkillYear::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SkillYear::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SkillYear::Year)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SkillYear::Label).string().null())
                    .col(
                        ColumnDef::new(SkillYear::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SkillYear::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SkillYear::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Skill::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Skill::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Skill::Name).string().not_null())
                    .col(ColumnDef::new(Skill::Category).string().null())
                    .col(ColumnDef::new(Skill::Level).integer().not_null().default(0))
                    .col(ColumnDef::new(Skill::Icon).string().null())
                    .col(
                        ColumnDef::new(Skill::Hours)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Skill::Minutes).integer().not_null().default(0))
                    .col(ColumnDef::new(Skill::SkillYearId).integer().null())
                    .col(
                        ColumnDef::new(Skill::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Skill::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Skill::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_skills_skill_year")
                            .from(Skill::Table, Skill::SkillYearId)
                            .to(SkillYear::Table, SkillYear::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_skills_skill_year_id")
                    .table(Skill::Table)
                    .col(Skill::SkillYearId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_skills_skill_year_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skill::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SkillYear::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum SkillYear {
    #[sea_orm(iden = "skill_years")]
    Table,
    Id,
    Year,
    Label,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Skill {
    #[sea_orm(iden = "skills")]
    Table,
    Id,
    Name,
    Category,
    Level,
    Icon,
    Hours,
    Minutes,
    SkillYearId,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}
