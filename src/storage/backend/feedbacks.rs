use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::{SeaOrmStorage, resolve_published_at};
use crate::errors::{PortfolioError, Result};
use crate::storage::models::{Feedback, FeedbackInput, FeedbackStats, Page};

use migration::entities::feedback;

impl SeaOrmStorage {
    /// 最新的在前
    pub async fn list_feedbacks(
        &self,
        page: u64,
        page_size: u64,
        include_drafts: bool,
    ) -> Result<Page<Feedback>> {
        let mut query = feedback::Entity::find();
        if !include_drafts {
            query = query.filter(feedback::Column::PublishedAt.is_not_null());
        }
        let paginator = query
            .order_by_desc(feedback::Column::CreatedAt)
            .order_by_desc(feedback::Column::Id)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok(Page::new(
            models.into_iter().map(Feedback::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    pub async fn get_feedback(&self, id: i32, include_drafts: bool) -> Result<Feedback> {
        feedback::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .filter(|m| include_drafts || m.published_at.is_some())
            .map(Feedback::from)
            .ok_or_else(|| PortfolioError::not_found(format!("feedback {} not found", id)))
    }

    pub async fn create_feedback(&self, input: FeedbackInput) -> Result<Feedback> {
        let now = Utc::now();
        let model = feedback::ActiveModel {
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.filter(|e| !e.trim().is_empty())),
            message: Set(input.message.trim().to_string()),
            rating: Set(input.rating),
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

        info!("Feedback received: id={} rating={}", model.id, model.rating);
        Ok(Feedback::from(model))
    }

    /// 站长审核：整体替换内容，`publish` 省略时保持当前状态
    pub async fn update_feedback(&self, id: i32, input: FeedbackInput) -> Result<Feedback> {
        let existing = feedback::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PortfolioError::not_found(format!("feedback {} not found", id)))?;

        let now = Utc::now();
        let published_at = resolve_published_at(input.publish, existing.published_at, now);
        let mut active = existing.into_active_model();
        active.name = Set(input.name.trim().to_string());
        active.email = Set(input.email.filter(|e| !e.trim().is_empty()));
        active.message = Set(input.message.trim().to_string());
        active.rating = Set(input.rating);
        active.published_at = Set(published_at);
        active.updated_at = Set(now);

        let model = active.update(&self.db).await?;
        info!(
            "Feedback updated: id={} published={}",
            model.id,
            model.published_at.is_some()
        );
        Ok(Feedback::from(model))
    }

    pub async fn delete_feedback(&self, id: i32) -> Result<()> {
        let result = feedback::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(PortfolioError::not_found(format!(
                "feedback {} not found",
                id
            )));
        }
        info!("Feedback deleted: {}", id);
        Ok(())
    }

    /// 只统计已发布的反馈
    pub async fn feedback_stats(&self) -> Result<FeedbackStats> {
        let ratings: Vec<i32> = feedback::Entity::find()
            .select_only()
            .column(feedback::Column::Rating)
            .filter(feedback::Column::PublishedAt.is_not_null())
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;

        Ok(FeedbackStats::from_ratings(&ratings))
    }
}
