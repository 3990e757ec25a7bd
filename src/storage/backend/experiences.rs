use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use super::{SeaOrmStorage, resolve_published_at};
use crate::errors::{PortfolioError, Result};
use crate::storage::models::{Experience, ExperienceInput, Page};

use migration::entities::experience;

impl SeaOrmStorage {
    /// sort_order 升序，其次按开始日期倒序
    pub async fn list_experiences(
        &self,
        page: u64,
        page_size: u64,
        include_drafts: bool,
    ) -> Result<Page<Experience>> {
        let mut query = experience::Entity::find();
        if !include_drafts {
            query = query.filter(experience::Column::PublishedAt.is_not_null());
        }
        let paginator = query
            .order_by_asc(experience::Column::SortOrder)
            .order_by_desc(experience::Column::StartDate)
            .order_by_asc(experience::Column::Id)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok(Page::new(
            models.into_iter().map(Experience::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    pub async fn get_experience(&self, id: i32, include_drafts: bool) -> Result<Experience> {
        experience::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .filter(|m| include_drafts || m.published_at.is_some())
            .map(Experience::from)
            .ok_or_else(|| PortfolioError::not_found(format!("experience {} not found", id)))
    }

    pub async fn create_experience(&self, input: ExperienceInput) -> Result<Experience> {
        let now = Utc::now();
        let model = experience::ActiveModel {
            company: Set(input.company),
            role: Set(input.role),
            location: Set(input.location),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            description: Set(input.description),
            sort_order: Set(input.sort_order.unwrap_or(0)),
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

        info!("Experience created: {} at {}", model.role, model.company);
        Ok(Experience::from(model))
    }

    pub async fn update_experience(&self, id: i32, input: ExperienceInput) -> Result<Experience> {
        let existing = experience::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PortfolioError::not_found(format!("experience {} not found", id)))?;

        let now = Utc::now();
        let published_at = resolve_published_at(input.publish, existing.published_at, now);
        let sort_order = input.sort_order.unwrap_or(existing.sort_order);
        let mut active = existing.into_active_model();
        active.company = Set(input.company);
        active.role = Set(input.role);
        active.location = Set(input.location);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.description = Set(input.description);
        active.sort_order = Set(sort_order);
        active.published_at = Set(published_at);
        active.updated_at = Set(now);

        Ok(Experience::from(active.update(&self.db).await?))
    }

    pub async fn delete_experience(&self, id: i32) -> Result<()> {
        let result = experience::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(PortfolioError::not_found(format!(
                "experience {} not found",
                id
            )));
        }
        info!("Experience deleted: {}", id);
        Ok(())
    }
}
