use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{CompletionRecord, SeaOrmStorage};
pub use models::{
    Bean, CatalogItem, CatalogKind, GlossaryTerm, MaterialCompletion, Role, StorageStats,
    Technique, Tool, User,
};

pub struct StorageFactory;

impl StorageFactory {
    /// 按全局配置创建存储（数据库类型从 URL 推断）
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        Self::create_with(&config.database).await
    }

    pub async fn create_with(config: &crate::config::DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let storage = SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}
