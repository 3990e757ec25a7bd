//! Daily wakatime stats and the skill totals derived from them

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::info;

use super::{SeaOrmStorage, retry};
use crate::errors::{PortfolioError, Result};
use crate::storage::models::{Page, Skill, WakatimeStat, split_seconds};

use migration::entities::{skill, wakatime_stat};

/// 按该技能全部统计的总秒数重算 hours/minutes
async fn recompute_skill_time<C: ConnectionTrait>(
    conn: &C,
    skill_id: i32,
) -> std::result::Result<(), DbErr> {
    let seconds: Vec<i64> = wakatime_stat::Entity::find()
        .select_only()
        .column(wakatime_stat::Column::Seconds)
        .filter(wakatime_stat::Column::SkillId.eq(skill_id))
        .into_tuple::<i64>()
        .all(conn)
        .await?;
    let total: i64 = seconds.iter().sum();
    let (hours, minutes) = split_seconds(total);

    let existing = skill::Entity::find_by_id(skill_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("skill {} not found", skill_id)))?;

    let mut active = existing.into_active_model();
    active.hours = Set(hours);
    active.minutes = Set(minutes);
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}

impl SeaOrmStorage {
    /// 写入 (skill, date) 的秒数（已存在则覆盖），并重算技能总时长
    pub async fn upsert_wakatime_stat(
        &self,
        skill_id: i32,
        date: NaiveDate,
        seconds: i64,
    ) -> Result<Skill> {
        let exists = skill::Entity::find_by_id(skill_id).one(&self.db).await?;
        if exists.is_none() {
            return Err(PortfolioError::not_found(format!(
                "skill {} not found",
                skill_id
            )));
        }

        retry::with_retry("upsert_wakatime_stat", self.retry_config, || async {
            let now = Utc::now();
            let txn = self.db.begin().await?;

            let stat = wakatime_stat::ActiveModel {
                skill_id: Set(skill_id),
                date: Set(date),
                seconds: Set(seconds),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            wakatime_stat::Entity::insert(stat)
                .on_conflict(
                    OnConflict::columns([
                        wakatime_stat::Column::SkillId,
                        wakatime_stat::Column::Date,
                    ])
                    .update_columns([
                        wakatime_stat::Column::Seconds,
                        wakatime_stat::Column::UpdatedAt,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;

            recompute_skill_time(&txn, skill_id).await?;
            txn.commit().await
        })
        .await?;

        info!(
            "Wakatime stat saved: skill={} date={} seconds={}",
            skill_id, date, seconds
        );
        self.get_skill(skill_id, true).await
    }

    /// 按日期倒序
    pub async fn list_wakatime_stats(
        &self,
        skill_id: Option<i32>,
        page: u64,
        page_size: u64,
    ) -> Result<Page<WakatimeStat>> {
        let mut query = wakatime_stat::Entity::find();
        if let Some(id) = skill_id {
            query = query.filter(wakatime_stat::Column::SkillId.eq(id));
        }
        let paginator = query
            .order_by_desc(wakatime_stat::Column::Date)
            .order_by_asc(wakatime_stat::Column::SkillId)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok(Page::new(
            models.into_iter().map(WakatimeStat::from).collect(),
            page,
            page_size,
            total,
        ))
    }
}
