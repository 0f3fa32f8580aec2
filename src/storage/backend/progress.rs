use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::model_to_completion;
use super::retry;
use crate::errors::Result;
use crate::storage::models::MaterialCompletion;

use migration::entities::material_completion;

/// 记录一次通过测验的结果
#[derive(Debug, Clone)]
pub struct CompletionRecord {
    pub completion: MaterialCompletion,
    /// 此前未完成
    pub newly_completed: bool,
}

impl SeaOrmStorage {
    pub async fn list_completions(&self, user_id: &str) -> Result<Vec<MaterialCompletion>> {
        let db = &self.db;
        let models = retry::with_retry("list_completions", self.retry_config, || async {
            material_completion::Entity::find()
                .filter(material_completion::Column::UserId.eq(user_id))
                .order_by_asc(material_completion::Column::CompletedAt)
                .all(db)
                .await
        })
        .await?;
        Ok(models.into_iter().map(model_to_completion).collect())
    }

    pub async fn list_all_completions(&self) -> Result<Vec<MaterialCompletion>> {
        let models = material_completion::Entity::find()
            .order_by_asc(material_completion::Column::UserId)
            .order_by_asc(material_completion::Column::CompletedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_completion).collect())
    }

    /// 标记材料完成；重复完成时只保留最高分，完成时间不变
    ///
    /// 插入与提分各为单条语句，不开事务
    pub async fn record_completion(
        &self,
        user_id: &str,
        material_id: &str,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<CompletionRecord> {
        use sea_orm::ActiveValue::Set;
        use sea_orm::sea_query::{Expr, OnConflict};

        let db = &self.db;

        let inserted = retry::with_retry("record_completion_insert", self.retry_config, || async {
            let active = material_completion::ActiveModel {
                user_id: Set(user_id.to_string()),
                material_id: Set(material_id.to_string()),
                score: Set(score),
                completed_at: Set(at),
            };
            material_completion::Entity::insert(active)
                .on_conflict(
                    OnConflict::columns([
                        material_completion::Column::UserId,
                        material_completion::Column::MaterialId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await?;
        let newly_completed = inserted > 0;

        if !newly_completed {
            retry::with_retry("record_completion_raise", self.retry_config, || async {
                material_completion::Entity::update_many()
                    .col_expr(material_completion::Column::Score, Expr::value(score))
                    .filter(material_completion::Column::UserId.eq(user_id))
                    .filter(material_completion::Column::MaterialId.eq(material_id))
                    .filter(material_completion::Column::Score.lt(score))
                    .exec(db)
                    .await
            })
            .await?;
        }

        let stored = retry::with_retry("record_completion_read", self.retry_config, || async {
            material_completion::Entity::find_by_id((
                user_id.to_string(),
                material_id.to_string(),
            ))
            .one(db)
            .await
        })
        .await?;

        // 行可能在两条语句之间被并发重置删除
        let completion = match stored {
            Some(model) => model_to_completion(model),
            None => MaterialCompletion {
                user_id: user_id.to_string(),
                material_id: material_id.to_string(),
                score,
                completed_at: at,
            },
        };

        if newly_completed {
            self.invalidate_count_cache();
        }
        debug!(
            "Completion recorded: user={} material={} score={:.1} new={}",
            user_id, material_id, completion.score, newly_completed
        );
        Ok(CompletionRecord {
            completion,
            newly_completed,
        })
    }

    /// 清空用户进度，返回删除条数
    pub async fn reset_progress(&self, user_id: &str) -> Result<u64> {
        let result = material_completion::Entity::delete_many()
            .filter(material_completion::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        self.invalidate_count_cache();
        Ok(result.rows_affected)
    }
}
