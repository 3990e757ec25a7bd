//! Visitor counter
//!
//! One row holds the running count plus an append-only history of
//! `{count, timestamp}` snapshots. Increments are read-then-write without a
//! lock, so two concurrent visits may both write the same count.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set};
use tracing::{debug, warn};

use super::{SeaOrmStorage, retry};
use crate::errors::Result;
use crate::storage::models::{VisitorCount, VisitorHistoryEntry};

use migration::entities::visitor_count;

fn parse_history(raw: &serde_json::Value) -> Vec<VisitorHistoryEntry> {
    match serde_json::from_value::<Vec<VisitorHistoryEntry>>(raw.clone()) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Visitor history is malformed, starting a new one: {}", e);
            Vec::new()
        }
    }
}

impl SeaOrmStorage {
    async fn find_visitor_row(&self) -> std::result::Result<Option<visitor_count::Model>, DbErr> {
        visitor_count::Entity::find()
            .order_by_asc(visitor_count::Column::Id)
            .one(&self.db)
            .await
    }

    /// 当前计数；尚无记录时为 0
    pub async fn get_visitor_count(&self) -> Result<VisitorCount> {
        let row = self.find_visitor_row().await?;
        Ok(match row {
            Some(m) => VisitorCount {
                count: m.count,
                updated_at: Some(m.updated_at),
            },
            None => VisitorCount {
                count: 0,
                updated_at: None,
            },
        })
    }

    /// 计数加一并追加一条历史记录；首次调用时创建记录
    pub async fn increment_visitor_count(&self) -> Result<VisitorCount> {
        let model = retry::with_retry("increment_visitor_count", self.retry_config, || async {
            let now = Utc::now();
            match self.find_visitor_row().await? {
                Some(existing) => {
                    let count = existing.count + 1;
                    let mut history = parse_history(&existing.history);
                    history.push(VisitorHistoryEntry {
                        count,
                        timestamp: now,
                    });

                    let mut active = existing.into_active_model();
                    active.count = Set(count);
                    active.history = Set(serde_json::to_value(&history)
                        .map_err(|e| DbErr::Custom(e.to_string()))?);
                    active.updated_at = Set(now);
                    active.update(&self.db).await
                }
                None => {
                    let history = vec![VisitorHistoryEntry {
                        count: 1,
                        timestamp: now,
                    }];
                    visitor_count::ActiveModel {
                        count: Set(1),
                        history: Set(serde_json::to_value(&history)
                            .map_err(|e| DbErr::Custom(e.to_string()))?),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&self.db)
                    .await
                }
            }
        })
        .await?;

        debug!("Visitor count incremented to {}", model.count);
        Ok(VisitorCount {
            count: model.count,
            updated_at: Some(model.updated_at),
        })
    }

    /// 最新的在前，最多 `limit` 条
    pub async fn visitor_history(&self, limit: usize) -> Result<Vec<VisitorHistoryEntry>> {
        let Some(row) = self.find_visitor_row().await? else {
            return Ok(Vec::new());
        };
        let mut history = parse_history(&row.history);
        history.reverse();
        history.truncate(limit);
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_accepts_snapshots() {
        let raw = serde_json::json!([
            {"count": 1, "timestamp": "2026-01-01T00:00:00Z"},
            {"count": 2, "timestamp": "2026-01-02T00:00:00Z"}
        ]);
        let history = parse_history(&raw);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].count, 2);
    }

    #[test]
    fn test_parse_history_tolerates_garbage() {
        assert!(parse_history(&serde_json::json!({"oops": true})).is_empty());
        assert!(parse_history(&serde_json::Value::Null).is_empty());
    }
}
