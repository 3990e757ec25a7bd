//! 基础内容表迁移
//!
//! 创建 hero_sections / about_sections / experiences / feedbacks

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HeroSection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HeroSection::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HeroSection::Title).string().not_null())
                    .col(ColumnDef::new(HeroSection::Subtitle).string().null())
                    .col(ColumnDef::new(HeroSection::Description).text().null())
                    .col(ColumnDef::new(HeroSection::CtaLabel).string().null())
                    .col(ColumnDef::new(HeroSection::CtaUrl).string().null())
                    .col(ColumnDef::new(HeroSection::AvatarUrl).string().null())
                    .col(
                        ColumnDef::new(HeroSection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HeroSection::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AboutSection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AboutSection::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AboutSection::Heading).string().not_null())
                    .col(ColumnDef::new(AboutSection::Body).text().not_null())
                    .col(ColumnDef::new(AboutSection::ResumeUrl).string().null())
                    .col(ColumnDef::new(AboutSection::Location).string().null())
                    .col(
                        ColumnDef::new(AboutSection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AboutSection::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Experience::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Experience::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Experience::Company).string().not_null())
                    .col(ColumnDef::new(Experience::Role).string().not_null())
                    .col(ColumnDef::new(Experience::Location).string().null())
                    .col(ColumnDef::new(Experience::StartDate).date().not_null())
                    .col(ColumnDef::new(Experience::EndDate).date().null())
                    .col(ColumnDef::new(Experience::Description).text().null())
                    .col(
                        ColumnDef::new(Experience::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Experience::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Experience::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Experience::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedback::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedback::Name).string().not_null())
                    .col(ColumnDef::new(Feedback::Email).string().null())
                    .col(ColumnDef::new(Feedback::Message).text().not_null())
                    .col(ColumnDef::new(Feedback::Rating).integer().not_null())
                    .col(
                        ColumnDef::new(Feedback::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedback::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Feedback::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 反馈列表按发布时间过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedbacks_published_at")
                    .table(Feedback::Table)
                    .col(Feedback::PublishedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_feedbacks_published_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Experience::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AboutSection::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HeroSection::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum HeroSection {
    #[sea_orm(iden = "hero_sections")]
    Table,
    Id,
    Title,
    Subtitle,
    Description,
    CtaLabel,
    CtaUrl,
    AvatarUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AboutSection {
    #[sea_orm(iden = "about_sections")]
    Table,
    Id,
    Heading,
    Body,
    ResumeUrl,
    Location,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Experience {
    #[sea_orm(iden = "experiences")]
    Table,
    Id,
    Company,
    Role,
    Location,
    StartDate,
    EndDate,
    Description,
    SortOrder,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}

#[derive(DeriveIden)]
enum Feedback {
    #[sea_orm(iden = "feedbacks")]
    Table,
    Id,
    Name,
    Email,
    Message,
    Rating,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}
