//! Skill years and skills

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use super::{SeaOrmStorage, resolve_published_at};
use crate::errors::{PortfolioError, Result};
use crate::storage::models::{Page, Skill, SkillInput, SkillYear, SkillYearInput};

use migration::entities::{skill, skill_year};

impl SeaOrmStorage {
    // ============ skill years ============

    pub async fn list_skill_years(
        &self,
        page: u64,
        page_size: u64,
        include_drafts: bool,
    ) -> Result<Page<SkillYear>> {
        let mut query = skill_year::Entity::find();
        if !include_drafts {
            query = query.filter(skill_year::Column::PublishedAt.is_not_null());
        }
        let paginator = query
            .order_by_desc(skill_year::Column::Year)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok(Page::new(
            models.into_iter().map(SkillYear::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    pub async fn get_skill_year(&self, id: i32, include_drafts: bool) -> Result<SkillYear> {
        skill_year::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .filter(|m| include_drafts || m.published_at.is_some())
            .map(SkillYear::from)
            .ok_or_else(|| PortfolioError::not_found(format!("skill year {} not found", id)))
    }

    pub async fn create_skill_year(&self, input: SkillYearInput) -> Result<SkillYear> {
        self.ensure_year_unique(input.year, None).await?;

        let now = Utc::now();
        let model = skill_year::ActiveModel {
            year: Set(input.year),
            label: Set(input.label),
            created_at: Set(now),
            updated_at: Set(now),
            published_at: Set(resolve_published_at(
                Some(input.publish.unwrap_or(true)),
                None,
                now,
            )),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Skill year created: {}", model.year);
        Ok(SkillYear::from(model))
    }

    pub async fn update_skill_year(&self, id: i32, input: SkillYearInput) -> Result<SkillYear> {
        let existing = skill_year::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PortfolioError::not_found(format!("skill year {} not found", id)))?;
        self.ensure_year_unique(input.year, Some(id)).await?;

        let now = Utc::now();
        let published_at = resolve_published_at(input.publish, existing.published_at, now);
        let mut active = existing.into_active_model();
        active.year = Set(input.year);
        active.label = Set(input.label);
        active.published_at = Set(published_at);
        active.updated_at = Set(now);

        Ok(SkillYear::from(active.update(&self.db).await?))
    }

    pub async fn delete_skill_year(&self, id: i32) -> Result<()> {
        let result = skill_year::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(PortfolioError::not_found(format!(
                "skill year {} not found",
                id
            )));
        }
        info!("Skill year deleted: {}", id);
        Ok(())
    }

    async fn ensure_year_unique(&self, year: i32, except_id: Option<i32>) -> Result<()> {
        let clash = skill_year::Entity::find()
            .filter(skill_year::Column::Year.eq(year))
            .one(&self.db)
            .await?;
        match clash {
            Some(m) if Some(m.id) != except_id => Err(PortfolioError::conflict(format!(
                "skill year {} already exists",
                year
            ))),
            _ => Ok(()),
        }
    }

    // ============ skills ============

    pub async fn list_skills(
        &self,
        page: u64,
        page_size: u64,
        include_drafts: bool,
    ) -> Result<Page<Skill>> {
        let mut query = skill::Entity::find();
        if !include_drafts {
            query = query.filter(skill::Column::PublishedAt.is_not_null());
        }
        let paginator = query
            .order_by_desc(skill::Column::Hours)
            .order_by_desc(skill::Column::Minutes)
            .order_by_asc(skill::Column::Name)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let year_ids: Vec<i32> = models.iter().filter_map(|m| m.skill_year_id).collect();
        let years = self.load_skill_years(&year_ids, include_drafts).await?;

        let items = models
            .into_iter()
            .map(|m| {
                let year = m.skill_year_id.and_then(|id| years.get(&id).cloned());
                Skill::from_parts(m, year)
            })
            .collect();

        Ok(Page::new(items, page, page_size, total))
    }

    pub async fn get_skill(&self, id: i32, include_drafts: bool) -> Result<Skill> {
        let (model, year) = skill::Entity::find_by_id(id)
            .find_also_related(skill_year::Entity)
            .one(&self.db)
            .await?
            .filter(|(m, _)| include_drafts || m.published_at.is_some())
            .ok_or_else(|| PortfolioError::not_found(format!("skill {} not found", id)))?;
        let year = year.filter(|y| include_drafts || y.published_at.is_some());
        Ok(Skill::from_parts(model, year))
    }

    pub async fn create_skill(&self, input: SkillInput) -> Result<Skill> {
        self.ensure_skill_year_exists(input.skill_year_id).await?;

        let now = Utc::now();
        let model = skill::ActiveModel {
            name: Set(input.name),
            category: Set(input.category),
            level: Set(input.level.unwrap_or(0)),
            icon: Set(input.icon),
            hours: Set(0),
            minutes: Set(0),
            skill_year_id: Set(input.skill_year_id),
            created_at: Set(now),
            updated_at: Set(now),
            published_at: Set(resolve_published_at(
                Some(input.publish.unwrap_or(true)),
                None,
                now,
            )),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Skill created: {} (id={})", model.name, model.id);
        self.get_skill(model.id, true).await
    }

    /// 更新技能元数据；hours/minutes 只由 wakatime 统计驱动
    pub async fn update_skill(&self, id: i32, input: SkillInput) -> Result<Skill> {
        let existing = skill::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PortfolioError::not_found(format!("skill {} not found", id)))?;
        self.ensure_skill_year_exists(input.skill_year_id).await?;

        let now = Utc::now();
        let published_at = resolve_published_at(input.publish, existing.published_at, now);
        let level = input.level.unwrap_or(existing.level);
        let mut active = existing.into_active_model();
        active.name = Set(input.name);
        active.category = Set(input.category);
        active.level = Set(level);
        active.icon = Set(input.icon);
        active.skill_year_id = Set(input.skill_year_id);
        active.published_at = Set(published_at);
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        self.get_skill(id, true).await
    }

    pub async fn delete_skill(&self, id: i32) -> Result<()> {
        let result = skill::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(PortfolioError::not_found(format!("skill {} not found", id)));
        }
        info!("Skill deleted: {}", id);
        Ok(())
    }

    async fn ensure_skill_year_exists(&self, skill_year_id: Option<i32>) -> Result<()> {
        let Some(id) = skill_year_id else {
            return Ok(());
        };
        let found = skill_year::Entity::find_by_id(id).one(&self.db).await?;
        if found.is_none() {
            return Err(PortfolioError::validation(format!(
                "skill_year_id {} does not exist",
                id
            )));
        }
        Ok(())
    }

    /// 公开读取时草稿年份不展开
    async fn load_skill_years(
        &self,
        ids: &[i32],
        include_drafts: bool,
    ) -> Result<HashMap<i32, skill_year::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut query =
            skill_year::Entity::find().filter(skill_year::Column::Id.is_in(ids.iter().copied()));
        if !include_drafts {
            query = query.filter(skill_year::Column::PublishedAt.is_not_null());
        }
        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(|m| (m.id, m)).collect())
    }
}
