//! SeaORM storage backend
//!
//! Content tables live in SQLite, MySQL/MariaDB or PostgreSQL; the backend
//! is inferred from the database URL.

mod connection;
mod experiences;
mod feedbacks;
pub mod retry;
mod singles;
mod skills;
mod visitors;
mod wakatime;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{PortfolioError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(PortfolioError::database_config(format!(
            "cannot infer database type from URL: {} (expected sqlite://, mysql://, mariadb:// or postgres://)",
            database_url
        )))
    }
}

/// 计算写入后的 `published_at`
///
/// `None` 保留当前状态；新建记录时调用方传入 `Some(true)` 作为默认值。
pub(crate) fn resolve_published_at(
    publish: Option<bool>,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match publish {
        Some(true) => current.or(Some(now)),
        Some(false) => None,
        None => current,
    }
}

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(PortfolioError::database_config("database_url is empty"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config).await?
        } else {
            connect_generic(database_url, backend_name, config).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&storage.db).await?;

        info!("{} storage initialized", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 健康检查探针
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| PortfolioError::database_connection(e.to_string()))
    }

    pub async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| PortfolioError::database_connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("portfolio.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("sqlite://data/portfolio.db?mode=rwc").unwrap(),
            "sqlite"
        );
        assert_eq!(
            infer_backend_from_url("mariadb://u:p@localhost/pf").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://localhost/pf").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }

    #[test]
    fn test_resolve_published_at() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::days(3);

        assert_eq!(resolve_published_at(Some(true), None, now), Some(now));
        assert_eq!(
            resolve_published_at(Some(true), Some(earlier), now),
            Some(earlier)
        );
        assert_eq!(resolve_published_at(Some(false), Some(earlier), now), None);
        assert_eq!(resolve_published_at(None, Some(earlier), now), Some(earlier));
        assert_eq!(resolve_published_at(None, None, now), None);
    }
}
