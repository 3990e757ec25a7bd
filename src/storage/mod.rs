use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{Page, PageQuery};

pub struct StorageFactory;

impl StorageFactory {
    /// 使用全局配置创建存储
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        Self::create_with(&config.database).await
    }

    pub async fn create_with(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let database_url = &config.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type, config).await?;
        Ok(Arc::new(storage))
    }
}
