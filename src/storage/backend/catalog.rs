//! 目录条目读写
//!
//! 每条记录以 JSON 存放在 catalog_entries.payload，按自增 id 保持插入顺序。

use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::{info, warn};

use super::SeaOrmStorage;
use super::retry;
use crate::errors::{KopiError, Result};
use crate::storage::models::{CatalogItem, CatalogKind, StorageStats};

use migration::entities::{catalog_entry, material_completion, user};

fn decode_entry<T: CatalogItem>(model: catalog_entry::Model) -> Option<T> {
    match serde_json::from_str::<T>(&model.payload) {
        Ok(mut item) => {
            // 行上的 item_id 为准
            item.set_id(model.item_id);
            Some(item)
        }
        Err(e) => {
            warn!(
                "Skipping unreadable {} entry '{}': {}",
                model.collection, model.item_id, e
            );
            None
        }
    }
}

fn encode_entry<T: CatalogItem>(item: &T) -> Result<catalog_entry::ActiveModel> {
    use sea_orm::ActiveValue::{NotSet, Set};

    let now = Utc::now();
    Ok(catalog_entry::ActiveModel {
        id: NotSet,
        collection: Set(T::KIND.collection().to_string()),
        item_id: Set(item.id().to_string()),
        payload: Set(serde_json::to_string(item)?),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

fn by_kind(kind: CatalogKind) -> sea_orm::Condition {
    sea_orm::Condition::all().add(catalog_entry::Column::Collection.eq(kind.collection()))
}

impl SeaOrmStorage {
    /// 按插入顺序列出集合中的全部条目
    pub async fn list_items<T: CatalogItem>(&self) -> Result<Vec<T>> {
        let db = &self.db;
        let models = retry::with_retry(
            &format!("list_items({})", T::KIND),
            self.retry_config,
            || async {
                catalog_entry::Entity::find()
                    .filter(by_kind(T::KIND))
                    .order_by_asc(catalog_entry::Column::Id)
                    .all(db)
                    .await
            },
        )
        .await?;

        Ok(models.into_iter().filter_map(decode_entry).collect())
    }

    pub async fn get_item<T: CatalogItem>(&self, id: &str) -> Result<Option<T>> {
        let db = &self.db;
        let model = retry::with_retry(
            &format!("get_item({}, {})", T::KIND, id),
            self.retry_config,
            || async {
                catalog_entry::Entity::find()
                    .filter(by_kind(T::KIND))
                    .filter(catalog_entry::Column::ItemId.eq(id))
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model.and_then(decode_entry))
    }

    pub async fn item_exists(&self, kind: CatalogKind, id: &str) -> Result<bool> {
        let count = catalog_entry::Entity::find()
            .filter(by_kind(kind))
            .filter(catalog_entry::Column::ItemId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 插入新条目，id 已存在时返回 Conflict
    pub async fn insert_item<T: CatalogItem>(&self, item: &T) -> Result<()> {
        let active_model = encode_entry(item)?;
        match catalog_entry::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => {
                self.invalidate_count_cache();
                info!("{} entry created: {}", T::KIND, item.id());
                Ok(())
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                KopiError::conflict(format!("{} '{}' sudah ada", T::KIND, item.id())),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// 插入或覆盖条目（保留原行位置）
    pub async fn upsert_item<T: CatalogItem>(&self, item: &T) -> Result<()> {
        let active_model = encode_entry(item)?;
        catalog_entry::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    catalog_entry::Column::Collection,
                    catalog_entry::Column::ItemId,
                ])
                .update_columns([
                    catalog_entry::Column::Payload,
                    catalog_entry::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                KopiError::database_operation(format!(
                    "Upsert {} '{}' 失败: {}",
                    T::KIND,
                    item.id(),
                    e
                ))
            })?;

        self.invalidate_count_cache();
        Ok(())
    }

    pub async fn remove_item(&self, kind: CatalogKind, id: &str) -> Result<()> {
        let result = catalog_entry::Entity::delete_many()
            .filter(by_kind(kind))
            .filter(catalog_entry::Column::ItemId.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(KopiError::not_found(format!(
                "{} '{}' tidak ditemukan",
                kind, id
            )));
        }

        self.invalidate_count_cache();
        info!("{} entry deleted: {}", kind, id);
        Ok(())
    }

    /// 用给定条目整体替换集合（事务内）
    pub async fn replace_collection<T: CatalogItem>(&self, items: &[T]) -> Result<()> {
        let active_models = items
            .iter()
            .map(encode_entry)
            .collect::<Result<Vec<_>>>()?;

        let txn = self.db.begin().await?;

        catalog_entry::Entity::delete_many()
            .filter(by_kind(T::KIND))
            .exec(&txn)
            .await?;

        if !active_models.is_empty() {
            catalog_entry::Entity::insert_many(active_models)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        self.invalidate_count_cache();
        info!("{} collection replaced with {} entries", T::KIND, items.len());
        Ok(())
    }

    /// 集合条目数（带 COUNT 缓存）
    pub async fn count_items(&self, kind: CatalogKind) -> Result<u64> {
        let cache_key = format!("count:{}", kind.collection());
        if let Some(count) = self.count_cache.get(&cache_key) {
            return Ok(count);
        }

        let count = catalog_entry::Entity::find()
            .filter(by_kind(kind))
            .count(&self.db)
            .await?;
        self.count_cache.insert(cache_key, count);
        Ok(count)
    }

    pub async fn stats(&self) -> Result<StorageStats> {
        let users = match self.count_cache.get("count:users") {
            Some(c) => c,
            None => {
                let c = user::Entity::find().count(&self.db).await?;
                self.count_cache.insert("count:users".to_string(), c);
                c
            }
        };
        let completions = match self.count_cache.get("count:completions") {
            Some(c) => c,
            None => {
                let c = material_completion::Entity::find().count(&self.db).await?;
                self.count_cache.insert("count:completions".to_string(), c);
                c
            }
        };

        Ok(StorageStats {
            beans: self.count_items(CatalogKind::Beans).await?,
            techniques: self.count_items(CatalogKind::Techniques).await?,
            tools: self.count_items(CatalogKind::Tools).await?,
            glossary: self.count_items(CatalogKind::Glossary).await?,
            users,
            completions,
        })
    }
}
